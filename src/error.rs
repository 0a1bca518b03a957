use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TtsdkError>;

#[derive(Error, Debug)]
pub enum TtsdkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{message}")]
    UnsupportedPlatform { message: String },

    #[error("No SDK version matching '{identifier}' found at {url}")]
    VersionNotFound { identifier: String, url: String },

    #[error("Download failed: {url}: {message}")]
    DownloadError { url: String, message: String },

    #[error("No 7-zip compatible extractor found on PATH (tried {tried})")]
    ExtractorNotFound { tried: String },

    #[error("Extraction of {path} failed: {message}")]
    ExtractionError { path: PathBuf, message: String },

    #[error("Unsupported archive format: {path}")]
    UnsupportedArchive { path: PathBuf },

    #[error("Expected exactly one top-level directory in {path}, found {found}")]
    UnexpectedArchiveLayout { path: PathBuf, found: usize },

    #[error("Failed to move {name}")]
    LibraryMissing { name: String },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("{issues} problem(s) found")]
    DoctorFailed { issues: usize },
}

impl TtsdkError {
    pub fn config_error<S: Into<String>>(message: S) -> Self {
        TtsdkError::ConfigError {
            message: message.into(),
        }
    }

    pub fn unsupported_platform<S: Into<String>>(message: S) -> Self {
        TtsdkError::UnsupportedPlatform {
            message: message.into(),
        }
    }

    /// Extra lines shown to the user after the error itself.
    pub fn remediation(&self) -> &'static [&'static str] {
        match self {
            TtsdkError::ExtractorNotFound { .. } | TtsdkError::ExtractionError { .. } => &[
                "This can typically happen, if you do not have 7zip or equivalent installed on your system.",
                "On debian based systems, you can install 7zip by running 'sudo apt install p7zip'",
                "On Windows, you need to have 7zip installed and added to your PATH",
            ],
            _ => &[],
        }
    }
}
