use crate::commands::resolve::latest_download;
use crate::core::config::Config;
use crate::core::download::Downloader;
use crate::core::extract::{ArchiveExtractor, ArchiveKind, SystemExtractor};
use crate::core::install::Installer;
use crate::core::platform;
use crate::error::TtsdkError;
use crate::utils::fs;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

pub fn install_sdk(config: &Config, local_archive: Option<&Path>) -> Result<()> {
    println!("Installing TeamTalk sdk components");

    let config = match local_archive {
        Some(archive) => {
            println!("Using local archive {}", archive.display());
            stage_local_archive(config, archive).context("Failed to stage local archive")?
        }
        None => {
            let platform = platform::current()?;
            println!("Downloading latest sdk version");
            let downloader = Downloader::new(&config.user_agent)?;
            let download =
                latest_download(&downloader, config, platform).context("Failed to download sdk")?;
            println!("Found version {}", download.version);
            downloader
                .download_file(&download.url, &config.archive_path())
                .context("Failed to download sdk")?;
            println!("Downloaded. extracting");
            config.clone()
        }
    };

    install_from_archive(&config, &SystemExtractor::new())?;

    println!("Installed");
    Ok(())
}

/// Extracts the archive at the configured path and installs its libraries.
///
/// Cleanup only runs once both libraries are verified in place, so a failed
/// run leaves the archive and extraction directory for inspection.
pub fn install_from_archive<E: ArchiveExtractor + ?Sized>(config: &Config, extractor: &E) -> Result<()> {
    let installer = Installer::new(config, extractor);

    installer.extract().context("Failed to extract sdk")?;
    println!("Extracted. moving");

    installer
        .move_libraries()
        .context("Failed to move sdk libraries")?;
    installer.verify()?;
    println!("moved. cleaning");

    installer.clean().context("Failed to clean up")?;
    println!("cleaned.");
    Ok(())
}

/// Copies a user supplied archive to where the installer expects it,
/// keeping its format's extension.
fn stage_local_archive(config: &Config, archive: &Path) -> crate::error::Result<Config> {
    let kind = ArchiveKind::detect(archive).ok_or_else(|| TtsdkError::UnsupportedArchive {
        path: archive.to_path_buf(),
    })?;

    let stem = archive_stem(&config.archive_name);
    let staged = Config {
        archive_name: format!("{stem}.{}", kind.extension()),
        ..config.clone()
    };
    let target = staged.archive_path();

    let same_file = match (archive.canonicalize(), target.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    };
    if same_file {
        debug!("{} is already in place", target.display());
    } else {
        fs::copy_file(archive, &target)?;
    }

    Ok(staged)
}

/// The configured archive name without its archive extension.
fn archive_stem(archive_name: &str) -> &str {
    let lower = archive_name.to_ascii_lowercase();
    for suffix in [".tar.gz", ".tgz", ".7z", ".zip"] {
        if lower.ends_with(suffix) && lower.len() > suffix.len() {
            return &archive_name[..archive_name.len() - suffix.len()];
        }
    }
    Path::new(archive_name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(archive_name)
}
