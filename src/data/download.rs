//! MNIST archive downloader
//!
//! Fetches the four standard MNIST `.gz` files over HTTPS into a local data
//! directory. Files that already exist are left alone, so the command is safe
//! to re-run.

use std::path::Path;

use anyhow::{anyhow, Result};
use reqwest::Client;
use tracing::{info, warn};

/// Default mirror hosting the MNIST archives
const DEFAULT_MIRROR: &str = "https://storage.googleapis.com/cvdf-datasets/mnist";

/// The four archive file names of the dataset
pub const MNIST_ARCHIVES: [&str; 4] = [
    "train-images-idx3-ubyte.gz",
    "train-labels-idx1-ubyte.gz",
    "t10k-images-idx3-ubyte.gz",
    "t10k-labels-idx1-ubyte.gz",
];

/// HTTP client for fetching the MNIST archives
#[derive(Debug, Clone)]
pub struct MnistDownloader {
    client: Client,
    base_url: String,
}

impl Default for MnistDownloader {
    fn default() -> Self {
        Self::new()
    }
}

impl MnistDownloader {
    /// Create a downloader pointing at the default mirror
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_MIRROR.to_string(),
        }
    }

    /// Create a downloader with a custom mirror URL
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Mirror URL the downloader is pointed at
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Download all four MNIST archives into `dir`
    ///
    /// Existing files are skipped.
    pub async fn download_all(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)?;

        for name in MNIST_ARCHIVES {
            let target = dir.join(name);
            if target.exists() {
                info!("{} already present, skipping", name);
                continue;
            }
            self.fetch_archive(name, &target).await?;
        }

        Ok(())
    }

    /// Fetch a single archive and write it to `target`
    pub async fn fetch_archive(&self, name: &str, target: &Path) -> Result<()> {
        let url = format!("{}/{}", self.base_url, name);
        info!("Downloading {}", url);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            warn!("Request for {} failed with status {}", name, response.status());
            return Err(anyhow!(
                "failed to download {}: HTTP {}",
                name,
                response.status()
            ));
        }

        let bytes = response.bytes().await?;
        std::fs::write(target, &bytes)?;

        info!("Saved {} ({} bytes)", target.display(), bytes.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mirror() {
        let downloader = MnistDownloader::new();
        assert!(downloader.base_url().starts_with("https://"));
    }

    #[test]
    fn test_with_base_url_trims_slash() {
        let downloader = MnistDownloader::with_base_url("http://localhost:8080/mnist/");
        assert_eq!(downloader.base_url(), "http://localhost:8080/mnist");
    }

    #[test]
    fn test_archive_names_cover_both_splits() {
        assert!(MNIST_ARCHIVES.iter().any(|n| n.starts_with("train-images")));
        assert!(MNIST_ARCHIVES.iter().any(|n| n.starts_with("t10k-images")));
    }
}
