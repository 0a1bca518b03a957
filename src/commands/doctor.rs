use crate::core::{config::Config, extract, platform};
use crate::error::{Result, TtsdkError};

pub fn check_environment(config: &Config) -> Result<()> {
    println!("🔍 TeamTalk SDK installer - Environment Check");
    println!();

    let mut issues_found = 0;

    println!("🖥  Platform:");
    match platform::current() {
        Ok(token) => println!("  ✅ {token}"),
        Err(e) => {
            println!("  ❌ {e}");
            issues_found += 1;
        }
    }
    println!();

    println!("📦 Extractor:");
    match extract::find_seven_zip() {
        Ok(path) => println!("  ✅ {}", path.display()),
        Err(e) => {
            println!("  ❌ {e}");
            for line in e.remediation() {
                println!("     {line}");
            }
            issues_found += 1;
        }
    }
    println!();

    println!("📁 Directory Structure:");
    println!("  base directory: {:?}", config.base_dir);
    if config.base_dir.is_dir() {
        println!("    ✅ exists");
    } else {
        println!("    ❌ missing");
        issues_found += 1;
    }

    let problems = installation_problems(config);
    println!("  implementation: {:?}", config.implementation_dir());
    if problems.is_empty() {
        println!("    ✅ installed");
    } else {
        for problem in &problems {
            println!("    ❌ {problem}");
        }
        issues_found += problems.len();
    }

    for leftover in leftovers(config) {
        println!("    ⚠️  leftover from an unfinished run: {leftover}");
    }
    println!();

    if issues_found == 0 {
        println!("✅ Everything looks good");
        Ok(())
    } else {
        println!("Run 'ttsdk install' to (re)install the SDK");
        Err(TtsdkError::DoctorFailed {
            issues: issues_found,
        })
    }
}

/// What is missing from the implementation tree.
pub fn installation_problems(config: &Config) -> Vec<String> {
    if !config.implementation_dir().is_dir() {
        return vec![format!(
            "{} does not exist",
            config.implementation_dir().display()
        )];
    }

    let mut problems: Vec<String> = config
        .libraries
        .iter()
        .filter(|name| !config.library_dir(name).is_dir())
        .map(|name| format!("{name} is missing"))
        .collect();

    if !config.marker_path().is_file() {
        problems.push(format!("{} is missing", crate::core::config::MARKER_FILE_NAME));
    }
    problems
}

/// Temporary artifacts that a successful run would have removed.
pub fn leftovers(config: &Config) -> Vec<String> {
    [config.archive_path(), config.extract_dir()]
        .into_iter()
        .filter(|path| path.exists())
        .map(|path| path.display().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_missing_installation() {
        let temp = TempDir::new().unwrap();
        let config = Config::with_base_dir(temp.path());

        let problems = installation_problems(&config);
        assert_eq!(problems.len(), 1);
        assert!(problems[0].ends_with("does not exist"));
    }

    #[test]
    fn test_partial_installation() {
        let temp = TempDir::new().unwrap();
        let config = Config::with_base_dir(temp.path());
        std::fs::create_dir_all(config.library_dir("TeamTalk_DLL")).unwrap();

        assert_eq!(
            installation_problems(&config),
            vec!["TeamTalkPy is missing", "__init__.py is missing"]
        );
    }

    #[test]
    fn test_complete_installation() {
        let temp = TempDir::new().unwrap();
        let config = Config::with_base_dir(temp.path());
        for name in &config.libraries {
            std::fs::create_dir_all(config.library_dir(name)).unwrap();
        }
        std::fs::write(config.marker_path(), b"").unwrap();

        assert!(installation_problems(&config).is_empty());
        assert!(leftovers(&config).is_empty());
    }

    #[test]
    fn test_leftovers() {
        let temp = TempDir::new().unwrap();
        let config = Config::with_base_dir(temp.path());
        std::fs::write(config.archive_path(), b"").unwrap();

        assert_eq!(
            leftovers(&config),
            vec![config.archive_path().display().to_string()]
        );
    }
}
