use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::validate::is_valid_url;

/// `?url=` query accepted by both the preview and proxy endpoints.
#[derive(Debug, Deserialize)]
pub struct UrlQuery {
    pub url: Option<String>,
}

/// Pull a usable URL out of the query: absent or empty is `MissingParameter`,
/// unparseable is `InvalidUrl`. Runs before any network I/O.
pub fn require_url(query: UrlQuery) -> AppResult<String> {
    let url = query
        .url
        .filter(|u| !u.is_empty())
        .ok_or(AppError::MissingParameter)?;

    if !is_valid_url(&url) {
        return Err(AppError::InvalidUrl);
    }
    Ok(url)
}
