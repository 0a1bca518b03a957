use crate::error::{Result, TtsdkError};
use std::fmt;

/// Prebuilt SDK variant published on the listing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformToken {
    Win64,
    Win32,
    Ubuntu22X86_64,
    RaspbianArmhf,
}

impl PlatformToken {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformToken::Win64 => "win64",
            PlatformToken::Win32 => "win32",
            PlatformToken::Ubuntu22X86_64 => "ubuntu22_x86_64",
            PlatformToken::RaspbianArmhf => "raspbian_armhf",
        }
    }
}

impl fmt::Display for PlatformToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps an OS name, machine name and pointer width onto an SDK variant.
///
/// Accepts both Rust's `std::env::consts` spellings and the ones reported
/// by `uname`/Windows (`AMD64`, `Darwin`, `win32`).
pub fn resolve(os: &str, machine: &str, pointer_width: u32) -> Result<PlatformToken> {
    let os = os.to_ascii_lowercase();

    if matches!(os.as_str(), "windows" | "win32") {
        return if matches!(machine, "AMD64" | "x86_64" | "x86") {
            if pointer_width == 64 {
                Ok(PlatformToken::Win64)
            } else {
                Ok(PlatformToken::Win32)
            }
        } else {
            Err(TtsdkError::unsupported_platform(
                "Native Windows on ARM is not supported",
            ))
        };
    }

    if matches!(os.as_str(), "macos" | "darwin") {
        return Err(TtsdkError::unsupported_platform("Darwin is not supported"));
    }

    if matches!(machine, "AMD64" | "x86_64") {
        Ok(PlatformToken::Ubuntu22X86_64)
    } else if machine.contains("arm") {
        Ok(PlatformToken::RaspbianArmhf)
    } else {
        Err(TtsdkError::unsupported_platform(
            "Your architecture is not supported",
        ))
    }
}

/// Resolves the variant for the machine this binary runs on.
pub fn current() -> Result<PlatformToken> {
    let pointer_width = if cfg!(target_pointer_width = "64") {
        64
    } else {
        32
    };
    resolve(std::env::consts::OS, std::env::consts::ARCH, pointer_width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_windows_matrix() {
        assert_eq!(resolve("windows", "x86_64", 64).unwrap(), PlatformToken::Win64);
        assert_eq!(resolve("win32", "AMD64", 64).unwrap(), PlatformToken::Win64);
        assert_eq!(resolve("windows", "x86", 32).unwrap(), PlatformToken::Win32);
        assert_eq!(resolve("windows", "AMD64", 32).unwrap(), PlatformToken::Win32);
    }

    #[test]
    fn test_windows_on_arm_is_rejected() {
        let err = resolve("windows", "aarch64", 64).unwrap_err();
        assert_eq!(err.to_string(), "Native Windows on ARM is not supported");
        assert!(resolve("windows", "ARM64", 64).is_err());
    }

    #[test]
    fn test_darwin_is_rejected_for_every_arch() {
        for machine in ["x86_64", "arm64", "aarch64"] {
            let err = resolve("macos", machine, 64).unwrap_err();
            assert_eq!(err.to_string(), "Darwin is not supported");
        }
        assert!(resolve("Darwin", "x86_64", 64).is_err());
    }

    #[test]
    fn test_linux_matrix() {
        assert_eq!(
            resolve("linux", "x86_64", 64).unwrap(),
            PlatformToken::Ubuntu22X86_64
        );
        assert_eq!(
            resolve("linux", "AMD64", 64).unwrap(),
            PlatformToken::Ubuntu22X86_64
        );
        assert_eq!(resolve("linux", "armv7l", 32).unwrap(), PlatformToken::RaspbianArmhf);
        assert_eq!(resolve("freebsd", "arm", 32).unwrap(), PlatformToken::RaspbianArmhf);
    }

    #[test]
    fn test_unknown_linux_arch_is_rejected() {
        for machine in ["aarch64", "riscv64", "x86", "powerpc64"] {
            let err = resolve("linux", machine, 64).unwrap_err();
            assert!(matches!(err, TtsdkError::UnsupportedPlatform { .. }));
        }
    }

    #[test]
    fn test_token_strings() {
        assert_eq!(PlatformToken::Win64.to_string(), "win64");
        assert_eq!(PlatformToken::Ubuntu22X86_64.as_str(), "ubuntu22_x86_64");
        assert_eq!(PlatformToken::RaspbianArmhf.as_str(), "raspbian_armhf");
    }
}
