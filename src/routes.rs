use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::handlers;
use crate::state::AppState;

/// Request headers browsers may send cross-origin.
pub const ALLOWED_HEADERS: &str = "Origin, X-Requested-With, Content-Type, Accept";

/// Any origin may read previews. Restrict `allow_origin` before serving
/// anything tenant-specific.
fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([
            header::ORIGIN,
            HeaderName::from_static("x-requested-with"),
            header::CONTENT_TYPE,
            header::ACCEPT,
        ])
}

/// Build the application router. Metrics are layered on by the binary.
pub fn router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/preview", get(handlers::preview::get_preview))
        .route("/api/proxy", get(handlers::proxy::proxy_file))
        .fallback(handlers::not_found);

    with_middleware(routes).with_state(state)
}

/// Panic recovery, tracing and CORS, outermost last.
fn with_middleware<S>(routes: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    routes
        .layer(CatchPanicLayer::custom(handlers::handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        ))
        .layer(cors())
}
