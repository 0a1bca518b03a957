use crate::core::config::Config;
use crate::core::extract::{self, ArchiveExtractor};
use crate::error::{Result, TtsdkError};
use crate::utils::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Moves the SDK libraries out of an extracted archive into the
/// implementation directory and tidies up afterwards.
pub struct Installer<'a, E: ArchiveExtractor + ?Sized> {
    config: &'a Config,
    extractor: &'a E,
}

impl<'a, E: ArchiveExtractor + ?Sized> Installer<'a, E> {
    pub fn new(config: &'a Config, extractor: &'a E) -> Self {
        Self { config, extractor }
    }

    /// Extracts the archive at the configured archive path into a fresh
    /// extraction directory.
    pub fn extract(&self) -> Result<()> {
        extract::extract_fresh(
            self.extractor,
            &self.config.archive_path(),
            &self.config.extract_dir(),
        )
    }

    /// The single directory the archive unpacked into.
    pub fn extracted_root(&self) -> Result<PathBuf> {
        let extract_dir = self.config.extract_dir();
        let entries = std::fs::read_dir(&extract_dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()?;

        match entries.as_slice() {
            [only] if only.is_dir() => Ok(only.clone()),
            _ => Err(TtsdkError::UnexpectedArchiveLayout {
                path: extract_dir,
                found: entries.len(),
            }),
        }
    }

    /// Replaces the implementation directory with the libraries found under
    /// `<root>/Library` and writes an empty package marker.
    pub fn move_libraries(&self) -> Result<()> {
        let library_root = self.extracted_root()?.join("Library");
        let implementation_dir = self.config.implementation_dir();
        fs::replace_dir(&implementation_dir)?;

        for name in &self.config.libraries {
            let source = library_root.join(name);
            if !source.exists() {
                warn!("{} not found in the SDK archive", source.display());
                continue;
            }
            debug!("Moving {} into {}", name, implementation_dir.display());
            fs::move_replacing(&source, &self.config.library_dir(name))?;
        }

        fs::replace_file(&self.config.marker_path(), b"")
    }

    /// Fails with the first library that did not make it into place.
    pub fn verify(&self) -> Result<()> {
        for name in &self.config.libraries {
            if !self.config.library_dir(name).exists() {
                return Err(TtsdkError::LibraryMissing { name: name.clone() });
            }
        }
        Ok(())
    }

    /// Removes the archive, the extraction directory and the SDK's test suite.
    pub fn clean(&self) -> Result<()> {
        fs::remove_path(&self.config.archive_path())?;
        fs::remove_path(&self.config.extract_dir())?;
        fs::remove_path(&self.config.test_dir())?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    use super::*;
    use std::cell::Cell;
    use std::path::Path;

    /// Lays out an SDK tree in the destination instead of unpacking anything.
    pub struct FakeSdk {
        pub libraries: Vec<&'static str>,
        pub calls: Cell<usize>,
    }

    impl FakeSdk {
        pub fn complete() -> Self {
            Self::with(vec!["TeamTalk_DLL", "TeamTalkPy"])
        }

        pub fn with(libraries: Vec<&'static str>) -> Self {
            Self {
                libraries,
                calls: Cell::new(0),
            }
        }
    }

    impl ArchiveExtractor for FakeSdk {
        fn extract(&self, archive: &Path, destination: &Path) -> Result<()> {
            assert!(archive.exists());
            self.calls.set(self.calls.get() + 1);
            let library = destination.join("tt5sdk_v5.15_ubuntu22_x86_64/Library");
            for name in &self.libraries {
                std::fs::create_dir_all(library.join(name))?;
            }
            if self.libraries.contains(&"TeamTalk_DLL") {
                std::fs::write(library.join("TeamTalk_DLL/libTeamTalk5.so"), b"ELF")?;
            }
            if self.libraries.contains(&"TeamTalkPy") {
                std::fs::create_dir_all(library.join("TeamTalkPy/test"))?;
                std::fs::write(library.join("TeamTalkPy/TeamTalk5.py"), b"# bindings")?;
                std::fs::write(library.join("TeamTalkPy/test/teamtalk_test.py"), b"")?;
            }
            Ok(())
        }
    }

    /// Behaves like a host without any 7-zip executable.
    pub struct MissingTool;

    impl ArchiveExtractor for MissingTool {
        fn extract(&self, _archive: &Path, _destination: &Path) -> Result<()> {
            Err(TtsdkError::ExtractorNotFound {
                tried: "7z".to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fakes::{FakeSdk, MissingTool};
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Config) {
        let temp = TempDir::new().unwrap();
        let config = Config::with_base_dir(temp.path());
        std::fs::write(config.archive_path(), b"7z archive").unwrap();
        (temp, config)
    }

    #[test]
    fn test_extract_recreates_directory() {
        let (_temp, config) = setup();
        std::fs::create_dir_all(config.extract_dir().join("previous_run")).unwrap();
        let sdk = FakeSdk::complete();
        let installer = Installer::new(&config, &sdk);

        installer.extract().unwrap();

        assert_eq!(sdk.calls.get(), 1);
        assert!(!config.extract_dir().join("previous_run").exists());
        assert_eq!(
            installer.extracted_root().unwrap(),
            config.extract_dir().join("tt5sdk_v5.15_ubuntu22_x86_64")
        );
    }

    #[test]
    fn test_move_libraries_replaces_implementation_dir() {
        let (_temp, config) = setup();
        std::fs::create_dir_all(config.library_dir("TeamTalkPy")).unwrap();
        std::fs::write(config.library_dir("TeamTalkPy").join("stale.py"), b"").unwrap();
        std::fs::write(config.marker_path(), b"import os").unwrap();
        let sdk = FakeSdk::complete();
        let installer = Installer::new(&config, &sdk);
        installer.extract().unwrap();

        installer.move_libraries().unwrap();

        assert!(config.library_dir("TeamTalk_DLL").join("libTeamTalk5.so").exists());
        assert!(config.library_dir("TeamTalkPy").join("TeamTalk5.py").exists());
        assert!(!config.library_dir("TeamTalkPy").join("stale.py").exists());
        assert_eq!(std::fs::metadata(config.marker_path()).unwrap().len(), 0);
        installer.verify().unwrap();
    }

    #[test]
    fn test_verify_reports_first_missing_library() {
        let (_temp, config) = setup();
        let sdk = FakeSdk::with(vec!["TeamTalk_DLL"]);
        let installer = Installer::new(&config, &sdk);
        installer.extract().unwrap();
        installer.move_libraries().unwrap();

        let err = installer.verify().unwrap_err();
        assert!(matches!(err, TtsdkError::LibraryMissing { ref name } if name == "TeamTalkPy"));
    }

    #[test]
    fn test_clean_removes_temporaries_and_tests() {
        let (_temp, config) = setup();
        let sdk = FakeSdk::complete();
        let installer = Installer::new(&config, &sdk);
        installer.extract().unwrap();
        installer.move_libraries().unwrap();
        assert!(config.test_dir().exists());

        installer.clean().unwrap();

        assert!(!config.archive_path().exists());
        assert!(!config.extract_dir().exists());
        assert!(!config.test_dir().exists());
        assert!(config.library_dir("TeamTalkPy").exists());
    }

    #[test]
    fn test_clean_tolerates_missing_test_dir() {
        let (_temp, config) = setup();
        let installer = Installer::new(&config, &MissingTool);
        std::fs::create_dir_all(config.library_dir("TeamTalkPy")).unwrap();

        installer.clean().unwrap();
        assert!(!config.archive_path().exists());
    }

    #[test]
    fn test_multiple_top_level_entries_are_rejected() {
        let (_temp, config) = setup();
        let installer = Installer::new(&config, &MissingTool);
        std::fs::create_dir_all(config.extract_dir().join("one")).unwrap();
        std::fs::create_dir_all(config.extract_dir().join("two")).unwrap();

        let err = installer.extracted_root().unwrap_err();
        assert!(matches!(
            err,
            TtsdkError::UnexpectedArchiveLayout { found: 2, .. }
        ));
    }

    #[test]
    fn test_single_file_is_not_a_root_directory() {
        let (_temp, config) = setup();
        let installer = Installer::new(&config, &MissingTool);
        std::fs::create_dir_all(config.extract_dir()).unwrap();
        std::fs::write(config.extract_dir().join("readme.txt"), b"").unwrap();

        assert!(matches!(
            installer.extracted_root(),
            Err(TtsdkError::UnexpectedArchiveLayout { found: 1, .. })
        ));
    }

    #[test]
    fn test_empty_extraction_is_rejected() {
        let (_temp, config) = setup();
        let installer = Installer::new(&config, &MissingTool);
        std::fs::create_dir_all(config.extract_dir()).unwrap();

        assert!(matches!(
            installer.move_libraries(),
            Err(TtsdkError::UnexpectedArchiveLayout { found: 0, .. })
        ));
        assert!(!config.implementation_dir().exists());
    }
}
