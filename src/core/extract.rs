use crate::error::{Result, TtsdkError};
use crate::utils::fs;
use flate2::read::GzDecoder;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::Command;
use tar::Archive;
use tracing::{debug, info};
use zip::ZipArchive;

/// Executables understood to speak the 7-zip command line, in lookup order.
pub const SEVEN_ZIP_CANDIDATES: &[&str] = &["7z", "7za", "7zz", "7zr"];

/// Unpacks an archive into an existing, empty directory.
pub trait ArchiveExtractor {
    fn extract(&self, archive: &Path, destination: &Path) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    SevenZip,
    Zip,
    TarGz,
}

impl ArchiveKind {
    pub fn detect(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?.to_ascii_lowercase();
        if name.ends_with(".7z") {
            Some(ArchiveKind::SevenZip)
        } else if name.ends_with(".zip") {
            Some(ArchiveKind::Zip)
        } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Some(ArchiveKind::TarGz)
        } else {
            None
        }
    }

    /// File name extension used when storing an archive of this kind.
    pub fn extension(&self) -> &'static str {
        match self {
            ArchiveKind::SevenZip => "7z",
            ArchiveKind::Zip => "zip",
            ArchiveKind::TarGz => "tar.gz",
        }
    }
}

/// Finds the first 7-zip compatible executable on `PATH`.
pub fn find_seven_zip() -> Result<PathBuf> {
    SEVEN_ZIP_CANDIDATES
        .iter()
        .find_map(|name| which::which(name).ok())
        .ok_or_else(|| TtsdkError::ExtractorNotFound {
            tried: SEVEN_ZIP_CANDIDATES.join(", "),
        })
}

/// Extracts `.7z` through an external 7-zip tool and `.zip`/`.tar.gz`
/// in-process.
#[derive(Debug, Default)]
pub struct SystemExtractor;

impl SystemExtractor {
    pub fn new() -> Self {
        Self
    }

    fn extract_seven_zip(&self, archive_path: &Path, destination: &Path) -> Result<()> {
        let tool = find_seven_zip()?;
        debug!("Using {}", tool.display());

        let mut out_flag = std::ffi::OsString::from("-o");
        out_flag.push(destination);

        let output = Command::new(&tool)
            .arg("x")
            .arg("-y")
            .arg(out_flag)
            .arg(archive_path)
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TtsdkError::ExtractionError {
                path: archive_path.to_path_buf(),
                message: format!(
                    "{} exited with status {:?}: {}",
                    tool.display(),
                    output.status.code(),
                    stderr.trim()
                ),
            });
        }
        Ok(())
    }

    fn extract_tar_gz(&self, archive_path: &Path, destination: &Path) -> Result<()> {
        let file = File::open(archive_path)?;
        let decoder = GzDecoder::new(file);
        let mut archive = Archive::new(decoder);
        archive.unpack(destination)?;
        Ok(())
    }

    fn extract_zip(&self, archive_path: &Path, destination: &Path) -> Result<()> {
        let file = File::open(archive_path)?;
        let mut archive = ZipArchive::new(file).map_err(|e| zip_error(archive_path, e))?;

        for i in 0..archive.len() {
            let mut entry = archive
                .by_index(i)
                .map_err(|e| zip_error(archive_path, e))?;
            let outpath = match entry.enclosed_name() {
                Some(path) => destination.join(path),
                None => continue,
            };

            if entry.is_dir() {
                fs::ensure_dir_exists(&outpath)?;
            } else {
                if let Some(parent) = outpath.parent() {
                    fs::ensure_dir_exists(parent)?;
                }
                let mut outfile = File::create(&outpath)?;
                std::io::copy(&mut entry, &mut outfile)?;
            }

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Some(mode) = entry.unix_mode() {
                    std::fs::set_permissions(&outpath, std::fs::Permissions::from_mode(mode))?;
                }
            }
        }
        Ok(())
    }
}

fn zip_error(path: &Path, e: zip::result::ZipError) -> TtsdkError {
    TtsdkError::ExtractionError {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}

impl ArchiveExtractor for SystemExtractor {
    fn extract(&self, archive_path: &Path, destination: &Path) -> Result<()> {
        info!(
            "Extracting {} to {}",
            archive_path.display(),
            destination.display()
        );

        match ArchiveKind::detect(archive_path) {
            Some(ArchiveKind::SevenZip) => self.extract_seven_zip(archive_path, destination),
            Some(ArchiveKind::Zip) => self.extract_zip(archive_path, destination),
            Some(ArchiveKind::TarGz) => self.extract_tar_gz(archive_path, destination),
            None => Err(TtsdkError::UnsupportedArchive {
                path: archive_path.to_path_buf(),
            }),
        }
    }
}

/// Replaces `extract_dir` with an empty directory and unpacks `archive` into it.
pub fn extract_fresh<E: ArchiveExtractor + ?Sized>(
    extractor: &E,
    archive: &Path,
    extract_dir: &Path,
) -> Result<()> {
    fs::replace_dir(extract_dir)?;
    extractor.extract(archive, extract_dir)
}
