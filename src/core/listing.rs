use crate::core::platform::PlatformToken;
use crate::core::version::SdkVersion;
use crate::error::{Result, TtsdkError};
use scraper::{Html, Selector};
use tracing::debug;

/// A linked `<li>` entry on the listing page whose text matched the identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    /// Link target with its trailing `/` removed, e.g. `v5.15a`.
    pub version: String,
    /// Position among the matching entries, in document order.
    pub position: usize,
}

impl ListingEntry {
    pub fn parsed(&self) -> Option<SdkVersion> {
        SdkVersion::parse(&self.version)
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| TtsdkError::config_error(format!("bad selector {css}: {e}")))
}

/// Collects every list item whose visible text contains `identifier` and
/// which links somewhere.
pub fn matching_entries(html: &str, identifier: &str) -> Result<Vec<ListingEntry>> {
    let document = Html::parse_document(html);
    let items = selector("li")?;
    let links = selector("a[href]")?;

    let mut entries = Vec::new();
    for item in document.select(&items) {
        let text: String = item.text().collect();
        if !text.contains(identifier) {
            continue;
        }

        let Some(href) = item
            .select(&links)
            .next()
            .and_then(|a| a.value().attr("href"))
        else {
            debug!("Skipping '{}': no link", text.trim());
            continue;
        };

        let version = href.strip_suffix('/').unwrap_or(href).trim();
        if version.is_empty() {
            continue;
        }

        entries.push(ListingEntry {
            version: version.to_string(),
            position: entries.len(),
        });
    }

    Ok(entries)
}

/// Picks the newest entry: the highest parseable version wins, any parseable
/// version beats an unparseable one, and ties go to the later entry.
pub fn select_newest(entries: &[ListingEntry]) -> Option<&ListingEntry> {
    entries
        .iter()
        .max_by_key(|entry| (entry.parsed(), entry.position))
}

/// Finds the version to download from a listing page.
pub fn locate_version(html: &str, identifier: &str, listing_url: &str) -> Result<String> {
    let entries = matching_entries(html, identifier)?;
    debug!("{} listing entries match '{identifier}'", entries.len());

    select_newest(&entries)
        .map(|entry| entry.version.clone())
        .ok_or_else(|| TtsdkError::VersionNotFound {
            identifier: identifier.to_string(),
            url: listing_url.to_string(),
        })
}

pub fn download_url(base: &str, version: &str, platform: PlatformToken) -> String {
    let base = base.trim_end_matches('/');
    format!("{base}/{version}/tt5sdk_{version}_{platform}.7z")
}
