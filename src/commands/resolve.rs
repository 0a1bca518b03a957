use crate::core::{config::Config, download::Downloader, listing, platform, platform::PlatformToken};
use crate::error::Result;

/// The archive chosen for this host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdkDownload {
    pub version: String,
    pub url: String,
}

pub fn latest_download(
    downloader: &Downloader,
    config: &Config,
    platform: PlatformToken,
) -> Result<SdkDownload> {
    let page = downloader.fetch_text(&config.listing_url)?;
    let version = listing::locate_version(&page, &config.version_identifier, &config.listing_url)?;
    let url = listing::download_url(&config.listing_url, &version, platform);
    Ok(SdkDownload { version, url })
}

pub fn show_download(config: &Config) -> Result<()> {
    let platform = platform::current()?;
    let downloader = Downloader::new(&config.user_agent)?;
    let download = latest_download(&downloader, config, platform)?;

    println!("Version:  {}", download.version);
    println!("Platform: {platform}");
    println!("URL:      {}", download.url);
    Ok(())
}

pub fn show_platform() -> Result<()> {
    println!("{}", platform::current()?);
    Ok(())
}
