use serde::{Deserialize, Serialize};

use crate::extract::ExtractedMetadata;

/// Physical attributes of a downloaded image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetDetails {
    #[serde(rename = "type")]
    pub content_type: String,
    pub size: u64,
    pub height: u32,
    pub width: u32,
    pub size_pretty: String,
}

/// An image or logo reference. `details` is absent when there was nothing to
/// enrich or enrichment failed, so the JSON collapses to `{"url": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedAsset {
    pub url: String,
    #[serde(flatten)]
    pub details: Option<AssetDetails>,
}

impl EnrichedAsset {
    pub fn bare(url: impl Into<String>) -> Self {
        EnrichedAsset {
            url: url.into(),
            details: None,
        }
    }
}

/// Preview returned by `GET /api/preview` and stored in the cache.
///
/// Every field is always present; missing metadata becomes `""`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewResponse {
    pub title: String,
    pub description: String,
    pub image: EnrichedAsset,
    pub logo: EnrichedAsset,
    pub lang: String,
    pub publisher: String,
    pub url: String,
}

impl PreviewResponse {
    /// Merge extractor output with the enriched assets. `url` prefers the
    /// page's canonical URL and falls back to the post-redirect fetch URL.
    pub fn assemble(
        metadata: ExtractedMetadata,
        image: EnrichedAsset,
        logo: EnrichedAsset,
        final_url: &str,
    ) -> Self {
        PreviewResponse {
            title: metadata.title.unwrap_or_default(),
            description: metadata.description.unwrap_or_default(),
            image,
            logo,
            lang: metadata.lang.unwrap_or_default(),
            publisher: metadata.publisher.unwrap_or_default(),
            url: metadata
                .url
                .filter(|u| !u.is_empty())
                .unwrap_or_else(|| final_url.to_string()),
        }
    }
}
