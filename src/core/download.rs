use crate::error::{Result, TtsdkError};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

const CONNECT_TIMEOUT_SECS: u64 = 30;
const DOWNLOAD_TIMEOUT_SECS: u64 = 600;

pub struct Downloader {
    client: Client,
}

impl Downloader {
    pub fn new(user_agent: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let agent = HeaderValue::from_str(user_agent)
            .map_err(|e| TtsdkError::config_error(format!("invalid user agent: {e}")))?;
        headers.insert(USER_AGENT, agent);
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));

        let client = Client::builder()
            .default_headers(headers)
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(DOWNLOAD_TIMEOUT_SECS))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;

        Ok(Self { client })
    }

    /// Fetches a page as text. Non-success statuses are errors.
    pub fn fetch_text(&self, url: &str) -> Result<String> {
        debug!("GET {url}");
        let response = self.client.get(url).send()?.error_for_status()?;
        Ok(response.text()?)
    }

    /// Streams `url` into `destination`, replacing any existing file.
    pub fn download_file(&self, url: &str, destination: &Path) -> Result<u64> {
        println!("Downloading from {url}");

        if let Some(parent) = destination.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut response = self
            .client
            .get(url)
            .send()?
            .error_for_status()
            .map_err(|e| TtsdkError::DownloadError {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        if let Some(len) = response.content_length() {
            debug!("Expecting {len} bytes");
        }

        let mut writer = BufWriter::new(File::create(destination)?);
        let written = response
            .copy_to(&mut writer)
            .map_err(|e| TtsdkError::DownloadError {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        writer.flush()?;

        info!("Downloaded {written} bytes to {}", destination.display());
        Ok(written)
    }
}
