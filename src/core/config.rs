use crate::error::{Result, TtsdkError};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

pub const DEFAULT_LISTING_URL: &str = "https://bearware.dk/teamtalksdk";
/// The last tested SDK series is 5.15.
pub const DEFAULT_VERSION_IDENTIFIER: &str = "5.15";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/102.0.0.0 Safari/537.36";

pub const MARKER_FILE_NAME: &str = "__init__.py";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Directory every other path is resolved against.
    pub base_dir: PathBuf,
    pub listing_url: String,
    pub version_identifier: String,
    pub user_agent: String,
    pub archive_name: String,
    pub extract_dir_name: String,
    pub implementation_dir_name: String,
    /// Subdirectories of `Library/` moved into the implementation directory.
    pub libraries: Vec<String>,
    /// Directory removed after installation, relative to the implementation directory.
    pub test_subdir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_dir: PathBuf::from("."),
            listing_url: DEFAULT_LISTING_URL.to_string(),
            version_identifier: DEFAULT_VERSION_IDENTIFIER.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            archive_name: "ttsdk.7z".to_string(),
            extract_dir_name: "ttsdk".to_string(),
            implementation_dir_name: "implementation".to_string(),
            libraries: vec!["TeamTalk_DLL".to_string(), "TeamTalkPy".to_string()],
            test_subdir: PathBuf::from("TeamTalkPy").join("test"),
        }
    }
}

impl Config {
    pub fn with_base_dir<P: Into<PathBuf>>(base_dir: P) -> Self {
        Config {
            base_dir: base_dir.into(),
            ..Config::default()
        }
    }

    /// Loads the configuration from an optional JSON file, then applies the
    /// `base_dir` override. Fields absent from the file keep their defaults.
    pub fn load(config_file: Option<&Path>, base_dir: Option<&Path>) -> Result<Self> {
        let mut config = match config_file {
            Some(path) => {
                let content = std::fs::read_to_string(path).map_err(|e| {
                    TtsdkError::config_error(format!("cannot read {}: {e}", path.display()))
                })?;
                serde_json::from_str::<Config>(&content)?
            }
            None => Config::default(),
        };

        if let Some(dir) = base_dir {
            config.base_dir = dir.to_path_buf();
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.version_identifier.trim().is_empty() {
            return Err(TtsdkError::config_error("version_identifier must not be empty"));
        }
        if self.libraries.is_empty() {
            return Err(TtsdkError::config_error("at least one library is required"));
        }
        for name in [
            &self.archive_name,
            &self.extract_dir_name,
            &self.implementation_dir_name,
        ]
        .into_iter()
        .chain(&self.libraries)
        {
            if !is_plain_name(name) {
                return Err(TtsdkError::config_error(format!(
                    "'{name}' must be a plain file name"
                )));
            }
        }
        // Cleanup deletes this path, so it must stay inside the implementation directory.
        let relative = self.test_subdir.components().next().is_some()
            && self
                .test_subdir
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !relative {
            return Err(TtsdkError::config_error(format!(
                "test_subdir '{}' must be a relative path without '..'",
                self.test_subdir.display()
            )));
        }
        Ok(())
    }

    pub fn archive_path(&self) -> PathBuf {
        self.base_dir.join(&self.archive_name)
    }

    pub fn extract_dir(&self) -> PathBuf {
        self.base_dir.join(&self.extract_dir_name)
    }

    pub fn implementation_dir(&self) -> PathBuf {
        self.base_dir.join(&self.implementation_dir_name)
    }

    pub fn library_dir(&self, name: &str) -> PathBuf {
        self.implementation_dir().join(name)
    }

    pub fn marker_path(&self) -> PathBuf {
        self.implementation_dir().join(MARKER_FILE_NAME)
    }

    pub fn test_dir(&self) -> PathBuf {
        self.implementation_dir().join(&self.test_subdir)
    }
}

fn is_plain_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}
