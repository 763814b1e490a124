use crate::download::listing::{local_path, parse_listing, resolve_url, ListingCache};
use crate::download::Transport;
use crate::error::Result;
use crate::utils::progress::ProgressReporter;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Mirrors the NLDAS soil archive into a local data directory, one file at a time
pub struct Downloader<T: Transport> {
    transport: T,
    listing_url: String,
    data_dir: PathBuf,
    cache: ListingCache,
}

impl<T: Transport> Downloader<T> {
    pub fn new(transport: T, listing_url: &str, data_dir: &Path, cache_path: PathBuf) -> Self {
        Self {
            transport,
            listing_url: listing_url.to_string(),
            data_dir: data_dir.to_path_buf(),
            cache: ListingCache::new(cache_path),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Soil file links of the archive, from the cache when present
    pub fn fetch_listing(&self) -> Result<Vec<String>> {
        if let Some(links) = self.cache.load()? {
            debug!(cache = %self.cache.path().display(), links = links.len(), "using cached listing");
            return Ok(links);
        }

        info!(url = %self.listing_url, "reading soil file listing");
        let body = self.transport.get(&self.listing_url)?;
        let links = parse_listing(&String::from_utf8_lossy(&body));
        self.cache.store(&links)?;

        info!(links = links.len(), "cached soil file listing");
        Ok(links)
    }

    /// Download every listed file that is not yet on disk; returns all local paths
    pub fn download_all(&self, progress: Option<&ProgressReporter>) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(&self.data_dir)?;
        let links = self.fetch_listing()?;
        let mut local_paths = Vec::with_capacity(links.len());
        let mut downloaded = 0;

        for link in &links {
            let url = resolve_url(&self.listing_url, link)?;
            let destination = local_path(&self.data_dir, &url)?;

            if destination.exists() {
                debug!(path = %destination.display(), "already present");
            } else {
                if let Some(parent) = destination.parent() {
                    fs::create_dir_all(parent)?;
                }
                info!(url = %url, path = %destination.display(), "downloading");
                let content = self.transport.get(url.as_str())?;
                fs::write(&destination, content)?;
                downloaded += 1;
            }

            if let Some(p) = progress {
                p.increment(1);
            }
            local_paths.push(destination);
        }

        info!(
            total = local_paths.len(),
            downloaded,
            "soil archive up to date"
        );
        Ok(local_paths)
    }
}
