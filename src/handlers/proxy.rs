use axum::body::Body;
use axum::extract::{rejection::QueryRejection, Query, State};
use axum::http::{header, HeaderValue};
use axum::response::Response;
use futures::TryStreamExt;

use super::shared::{require_url, UrlQuery};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/proxy?url=<encoded-url>
///
/// Streams the upstream resource through unchanged, reproducing its
/// `Content-Type`. Nothing is cached or transformed.
pub async fn proxy_file(
    State(state): State<AppState>,
    query: Result<Query<UrlQuery>, QueryRejection>,
) -> AppResult<Response> {
    let Query(params) = query?;
    let url = require_url(params)?;

    let upstream = state
        .http_client
        .get(&url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| AppError::Proxy(format!("{url}: {e}")))?;

    // reqwest and axum sit on different `http` major versions; copy the raw bytes.
    let content_type = upstream
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| HeaderValue::from_bytes(v.as_bytes()).ok());

    let stream = upstream.bytes_stream().inspect_err(move |e| {
        tracing::warn!(error = %e, %url, "Proxy stream interrupted");
    });

    let mut response = Response::new(Body::from_stream(stream));
    if let Some(content_type) = content_type {
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, content_type);
    }
    Ok(response)
}
