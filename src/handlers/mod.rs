pub mod preview;
pub mod proxy;
pub mod shared;

use std::any::Any;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::error::AppError;
use crate::state::AppState;

pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": "link-preview-server",
            "version": env!("CARGO_PKG_VERSION"),
            "cache_entries": state.cache.len(),
        })),
    )
}

pub async fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" })))
}

/// Last-resort handler for panics escaping a request handler.
/// The client gets a generic 500; the details only go to the log.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        *s
    } else {
        "unknown panic payload"
    };
    tracing::error!(%details, "Handler panicked");
    AppError::Internal.into_response()
}
