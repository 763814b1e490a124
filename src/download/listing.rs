use crate::error::{Result, SoilError};
use crate::models::SoilFamily;
use crate::utils::constants::{ARCHIVE_PREFIX, BIN_EXTENSION};
use reqwest::Url;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Extract soil file links from the archive's listing page
///
/// A link qualifies when it contains a `.` and either names a known soil family
/// (case-insensitively) or ends in `.bin`. Order of first appearance is kept.
pub fn parse_listing(html: &str) -> Vec<String> {
    let lower = html.to_ascii_lowercase();
    let mut links: Vec<String> = Vec::new();
    let mut offset = 0;

    while let Some(pos) = lower[offset..].find("href=") {
        let start = offset + pos + "href=".len();
        offset = start;

        let Some(quote) = html[start..].chars().next().filter(|c| *c == '"' || *c == '\'') else {
            continue;
        };
        let value_start = start + quote.len_utf8();
        let Some(len) = html[value_start..].find(quote) else {
            break;
        };
        let link = html[value_start..value_start + len].trim();
        offset = value_start + len;

        if is_soil_link(link) && !links.iter().any(|l| l == link) {
            links.push(link.to_string());
        }
    }

    links
}

fn is_soil_link(link: &str) -> bool {
    link.contains('.')
        && (SoilFamily::ALL.iter().any(|f| f.matches_link(link))
            || link.to_lowercase().ends_with(BIN_EXTENSION))
}

/// Resolve a listing link against the listing page URL
pub fn resolve_url(listing_url: &str, link: &str) -> Result<Url> {
    let base = Url::parse(listing_url)
        .map_err(|e| SoilError::InvalidFormat(format!("Invalid listing URL '{}': {}", listing_url, e)))?;
    base.join(link)
        .map_err(|e| SoilError::InvalidFormat(format!("Invalid link '{}': {}", link, e)))
}

/// Local destination of a remote file: its URL path below the archive prefix, under `data_dir`
pub fn local_path(data_dir: &Path, url: &Url) -> Result<PathBuf> {
    let path = url.path();
    let relative = path
        .strip_prefix(ARCHIVE_PREFIX)
        .unwrap_or_else(|| path.trim_start_matches('/'));

    let relative = Path::new(relative);
    let escapes = relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_)));
    if relative.as_os_str().is_empty() || escapes {
        return Err(SoilError::InvalidFormat(format!(
            "Refusing to store {} outside the data directory",
            url
        )));
    }

    Ok(data_dir.join(relative))
}

/// Cached copy of the parsed listing, stored as a JSON array of links
pub struct ListingCache {
    path: PathBuf,
}

impl ListingCache {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Option<Vec<String>>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    pub fn store(&self, links: &[String]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string(links)?)?;
        Ok(())
    }
}
