//! Local JPEG copies of remote property images.
//!
//! Images are fetched once, converted to RGB JPEG and kept at
//! `<dir>/<property id>.jpg`. A cache hit never touches the network.

use async_trait::async_trait;
use image::ImageFormat;
use parcelgeo_core::error::{ParcelError, Result};
use parcelgeo_core::models::PropertyId;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Port for retrieving raw image bytes
#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Fetches images over HTTP(S)
pub struct HttpImageSource {
    client: reqwest::Client,
}

impl HttpImageSource {
    /// Create a source whose requests give up after `timeout`
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build().map_err(|e| {
            ParcelError::ConfigInvalid {
                key: "image_timeout_secs".to_string(),
                reason: format!("Failed to build HTTP client: {}", e),
            }
        })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ImageSource for HttpImageSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let failed = |reason: String| ParcelError::ImageFetchFailed {
            url: url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| failed(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(failed(format!("HTTP status {}", status)));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| failed(format!("failed to read body: {}", e)))?;

        tracing::debug!(url, bytes = bytes.len(), "Fetched remote image");
        Ok(bytes.to_vec())
    }
}

/// On-disk cache of property images
#[derive(Clone)]
pub struct ImageCache {
    dir: PathBuf,
    source: Arc<dyn ImageSource>,
}

impl ImageCache {
    pub fn new(dir: impl Into<PathBuf>, source: Arc<dyn ImageSource>) -> Self {
        Self {
            dir: dir.into(),
            source,
        }
    }

    /// Cache path for a property image. Ids that are not safe as a file name
    /// are rejected.
    pub fn path_for(&self, id: &PropertyId) -> Result<PathBuf> {
        if !id.is_path_safe() {
            return Err(ParcelError::validation(
                "id",
                "only ASCII letters, digits, '-' and '_' are allowed",
            ));
        }
        Ok(self.dir.join(format!("{}.jpg", id)))
    }

    /// Return the local JPEG for `id`, downloading and converting `url` if
    /// it is not cached yet.
    ///
    /// Concurrent first requests may both download; each writes a private
    /// temporary file and the last rename wins.
    pub async fn ensure(&self, id: &PropertyId, url: &str) -> Result<PathBuf> {
        let path = self.path_for(id)?;

        if tokio::fs::try_exists(&path).await? {
            tracing::debug!(id = %id, path = %path.display(), "Image cache hit");
            return Ok(path);
        }

        let bytes = self.source.fetch(url).await?;

        let dir = self.dir.clone();
        let target = path.clone();
        let url = url.to_string();
        tokio::task::spawn_blocking(move || write_jpeg(&dir, &target, &bytes, &url))
            .await
            .map_err(|e| ParcelError::Io(std::io::Error::other(e)))??;

        tracing::info!(id = %id, path = %path.display(), "Cached property image");
        Ok(path)
    }
}

/// Decode `bytes`, convert to RGB and atomically write a JPEG at `target`
fn write_jpeg(dir: &Path, target: &Path, bytes: &[u8], url: &str) -> Result<()> {
    let failed = |reason: String| ParcelError::ImageFetchFailed {
        url: url.to_string(),
        reason,
    };

    let decoded =
        image::load_from_memory(bytes).map_err(|e| failed(format!("decode failed: {}", e)))?;
    let rgb = image::DynamicImage::ImageRgb8(decoded.to_rgb8());

    let mut encoded = Cursor::new(Vec::new());
    rgb.write_to(&mut encoded, ImageFormat::Jpeg)
        .map_err(|e| failed(format!("JPEG encoding failed: {}", e)))?;

    std::fs::create_dir_all(dir)?;
    let mut tmp = tempfile::Builder::new()
        .prefix(".parcelgeo-")
        .suffix(".jpg.part")
        .tempfile_in(dir)?;
    tmp.write_all(encoded.get_ref())?;
    tmp.as_file().sync_all()?;
    tmp.persist(target).map_err(|e| ParcelError::Io(e.error))?;

    Ok(())
}
