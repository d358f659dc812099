use axum::extract::{rejection::QueryRejection, Query, State};
use axum::Json;

use super::shared::{require_url, UrlQuery};
use crate::error::AppResult;
use crate::models::PreviewResponse;
use crate::state::AppState;

/// GET /api/preview?url=<encoded-url>
///
/// Returns preview metadata for `url` with the image and logo enriched.
/// Results are cached per request URL, verbatim, for the cache TTL. Only a
/// failed page fetch fails the request; enrichment problems degrade the
/// affected asset to `{url}`.
pub async fn get_preview(
    State(state): State<AppState>,
    query: Result<Query<UrlQuery>, QueryRejection>,
) -> AppResult<Json<PreviewResponse>> {
    let Query(params) = query?;
    let url = require_url(params)?;

    // ── Check cache ───────────────────────────────────────────────────────
    if let Some(cached) = state.cache.get(&url) {
        tracing::debug!(%url, "Preview cache hit");
        return Ok(Json(cached));
    }

    // ── Fetch and extract ─────────────────────────────────────────────────
    let page = state.fetcher.fetch(&url).await?;
    let metadata = state.extractor.extract(&page.body, &page.final_url);

    // ── Enrich image and logo ─────────────────────────────────────────────
    let (image, logo) = tokio::join!(
        state
            .enricher
            .enrich(metadata.image.as_deref().unwrap_or_default()),
        state
            .enricher
            .enrich(metadata.logo.as_deref().unwrap_or_default()),
    );

    let preview = PreviewResponse::assemble(metadata, image, logo, &page.final_url);

    // ── Store in cache ────────────────────────────────────────────────────
    state.cache.set(url, preview.clone());

    Ok(Json(preview))
}
