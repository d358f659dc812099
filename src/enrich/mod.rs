//! Image enrichment: download an image and report its type, size and pixel
//! dimensions. Failures never escape; they degrade to a bare `{url}` asset.

mod svg;

use std::time::Duration;

use reqwest::{header, Client};
use thiserror::Error;

use crate::models::{AssetDetails, EnrichedAsset};

#[derive(Error, Debug)]
pub enum EnrichError {
    #[error("download failed: {0}")]
    Download(#[from] reqwest::Error),

    #[error("could not read image dimensions: {0}")]
    Dimensions(#[from] imagesize::ImageError),

    #[error("image is too large: {width}x{height}")]
    Oversized { width: usize, height: usize },
}

#[derive(Clone)]
pub struct ImageEnricher {
    client: Client,
}

impl ImageEnricher {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(ImageEnricher { client })
    }

    /// Enrich `asset_url`. An empty URL is returned untouched without any I/O.
    pub async fn enrich(&self, asset_url: &str) -> EnrichedAsset {
        if asset_url.is_empty() {
            return EnrichedAsset::bare("");
        }

        match self.download_details(asset_url).await {
            Ok(details) => EnrichedAsset {
                url: asset_url.to_string(),
                details: Some(details),
            },
            Err(e) => {
                tracing::warn!(error = %e, url = %asset_url, "Image enrichment failed");
                EnrichedAsset::bare(asset_url)
            }
        }
    }

    async fn download_details(&self, asset_url: &str) -> Result<AssetDetails, EnrichError> {
        let response = self
            .client
            .get(asset_url)
            .send()
            .await?
            .error_for_status()?;

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(subtype)
            .unwrap_or_else(|| "unknown".to_string());

        let bytes = response.bytes().await?;
        let (width, height) = dimensions(&bytes)?;

        Ok(AssetDetails {
            content_type,
            size: bytes.len() as u64,
            height,
            width,
            size_pretty: pretty_size(bytes.len()),
        })
    }
}

/// Pixel size read from the image header. Raster formats (AVIF and HEIF
/// included) go through `imagesize`; SVG falls back to the root element's
/// `width`/`height`/`viewBox`.
fn dimensions(bytes: &[u8]) -> Result<(u32, u32), EnrichError> {
    let size = match imagesize::blob_size(bytes) {
        Ok(size) => size,
        Err(e) => return svg::dimensions(bytes).ok_or(EnrichError::Dimensions(e)),
    };
    match (u32::try_from(size.width), u32::try_from(size.height)) {
        (Ok(width), Ok(height)) => Ok((width, height)),
        _ => Err(EnrichError::Oversized {
            width: size.width,
            height: size.height,
        }),
    }
}

/// The part of a MIME type after the `/`, without parameters.
/// `"image/png; charset=binary"` gives `"png"`.
pub fn subtype(content_type: &str) -> String {
    content_type
        .split_once('/')
        .map(|(_, sub)| sub.split(';').next().unwrap_or("").trim())
        .filter(|sub| !sub.is_empty())
        .unwrap_or("unknown")
        .to_string()
}

/// Decimal kilobytes with one decimal place: 2048 bytes is `"2.0 kB"`.
pub fn pretty_size(bytes: usize) -> String {
    format!("{:.1} kB", bytes as f64 / 1000.0)
}
