use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::fetch::FetchError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("missing URL")]
    MissingParameter,

    #[error("invalid URL")]
    InvalidUrl,

    #[error("metadata retrieval failed: {0}")]
    Fetch(String),

    #[error("file retrieval failed: {0}")]
    Proxy(String),

    #[error("internal server error")]
    Internal,
}

impl From<FetchError> for AppError {
    fn from(e: FetchError) -> Self {
        AppError::Fetch(e.to_string())
    }
}

/// A query string that cannot be decoded (say, `url` given twice) carries no
/// usable URL.
impl From<QueryRejection> for AppError {
    fn from(e: QueryRejection) -> Self {
        tracing::debug!(error = %e, "Rejected query string");
        AppError::InvalidUrl
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::MissingParameter => {
                (StatusCode::BAD_REQUEST, json!({ "error": "missing URL" }))
            }
            AppError::InvalidUrl => (StatusCode::BAD_REQUEST, json!({ "error": "invalid URL" })),
            AppError::Fetch(details) => {
                tracing::error!(%details, "Metadata retrieval failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "metadata retrieval failed", "details": details }),
                )
            }
            AppError::Proxy(details) => {
                tracing::error!(%details, "Proxy retrieval failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "file retrieval failed" }),
                )
            }
            AppError::Internal => {
                tracing::error!("Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
