// Each integration test file is a separate binary; helpers not used in every
// binary would otherwise trigger dead_code warnings from clippy.
#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{self, header, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use link_preview_server::{
    config::{Config, FetchSettings},
    routes,
    state::AppState,
};

/// Size of the cover image served by the origin fixture.
pub const COVER_SIZE: usize = 2048;
pub const COVER_WIDTH: u32 = 12;
pub const COVER_HEIGHT: u32 = 7;

// ── App under test ───────────────────────────────────────────────────────────

/// Test configuration: short timeouts and near-zero retry backoff so failure
/// paths stay fast.
pub fn test_config(cache_ttl: Duration) -> Config {
    Config {
        server_host: "127.0.0.1".into(),
        server_port: 0,
        is_production: false,
        cache_ttl,
        cache_sweep_interval: Duration::from_secs(600),
        fetch: FetchSettings {
            timeout: Duration::from_secs(5),
            max_retries: 2,
            retry_backoff: Duration::from_millis(10),
            ..FetchSettings::default()
        },
        enrich_timeout: Duration::from_secs(5),
    }
}

pub fn create_state(config: &Config) -> AppState {
    AppState::new(config).expect("Failed to build test state")
}

/// Build the full application router around `state`.
pub fn create_test_app(state: AppState) -> Router {
    routes::router(state)
}

/// Percent-encode `target` into a `/api/<endpoint>?url=` URI.
pub fn api_uri(endpoint: &str, target: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(target.as_bytes()).collect();
    format!("/api/{endpoint}?url={encoded}")
}

// ── Request helpers ──────────────────────────────────────────────────────────

pub async fn get_raw(app: Router, uri: &str) -> Response {
    let req = http::Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(req).await.unwrap()
}

pub async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = get_raw(app, uri).await;
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

// ── Origin fixture ───────────────────────────────────────────────────────────

/// Per-path request counter for the origin server.
#[derive(Clone, Default)]
pub struct Hits(Arc<Mutex<HashMap<String, usize>>>);

impl Hits {
    pub fn get(&self, path: &str) -> usize {
        self.0.lock().unwrap().get(path).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.0.lock().unwrap().values().sum()
    }
}

async fn count_hits(State(hits): State<Hits>, req: Request, next: Next) -> Response {
    *hits
        .0
        .lock()
        .unwrap()
        .entry(req.uri().path().to_string())
        .or_default() += 1;
    next.run(req).await
}

/// A tiny BMP padded with trailing bytes to exactly `COVER_SIZE`. BMP headers
/// carry the dimensions up front, so the padding does not affect decoding.
pub fn cover_bytes() -> Vec<u8> {
    let img = image::RgbImage::new(COVER_WIDTH, COVER_HEIGHT);
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Bmp).unwrap();
    let mut bytes = buf.into_inner();
    assert!(bytes.len() <= COVER_SIZE);
    bytes.resize(COVER_SIZE, 0);
    bytes
}

pub const LOGO_SVG: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="32" height="16"><rect width="32" height="16"/></svg>"#;

pub const PROXY_PAYLOAD: &[u8] = b"\x00\x01binary\xffpayload\x7f";

fn html(body: &'static str) -> Response {
    ([(header::CONTENT_TYPE, "text/html; charset=utf-8")], body).into_response()
}

const ARTICLE: &str = r#"<!doctype html>
<html lang="fr">
<head>
  <title>Fallback title</title>
  <meta property="og:title" content="An Article"/>
  <meta property="og:description" content="About things"/>
  <meta property="og:image" content="/cover.bmp"/>
  <meta property="og:site_name" content="Origin Times"/>
  <link rel="icon" href="/favicon.ico"/>
</head>
<body><h1>An Article</h1></body>
</html>"#;

const PLAIN: &str = r#"<html><head><title>Plain</title></head><body></body></html>"#;

const BROKEN_IMAGE: &str = r#"<html><head>
  <meta property="og:image" content="/missing.png"/>
</head></html>"#;

const VECTOR_LOGO: &str = r#"<html><head>
  <title>Vector</title>
  <link rel="icon" href="/logo.svg"/>
</head></html>"#;

const CANONICAL: &str = r#"<html><head>
  <link rel="canonical" href="https://canonical.example/story"/>
</head></html>"#;

/// Spawn the origin server on an ephemeral port; returns its base URL.
pub async fn spawn_origin() -> (String, Hits) {
    let hits = Hits::default();

    let router = Router::new()
        .route("/article", get(|| async { html(ARTICLE) }))
        .route("/plain", get(|| async { html(PLAIN) }))
        .route("/broken-image", get(|| async { html(BROKEN_IMAGE) }))
        .route("/canonical", get(|| async { html(CANONICAL) }))
        .route("/vector-logo", get(|| async { html(VECTOR_LOGO) }))
        .route("/moved", get(|| async { Redirect::temporary("/plain") }))
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                html(PLAIN)
            }),
        )
        .route(
            "/flaky",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "try later") }),
        )
        .route(
            "/cover.bmp",
            get(|| async { ([(header::CONTENT_TYPE, "image/bmp")], cover_bytes()) }),
        )
        .route(
            "/logo.svg",
            get(|| async { ([(header::CONTENT_TYPE, "image/svg+xml")], LOGO_SVG) }),
        )
        .route(
            "/untyped.bmp",
            get(|| async { Response::new(Body::from(cover_bytes())) }),
        )
        .route(
            "/favicon.ico",
            get(|| async { (StatusCode::NOT_FOUND, "no icon") }),
        )
        .route(
            "/file.bin",
            get(|| async {
                (
                    [(header::CONTENT_TYPE, "application/x-test-binary")],
                    PROXY_PAYLOAD,
                )
            }),
        )
        .layer(middleware::from_fn_with_state(hits.clone(), count_hits));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (format!("http://{addr}"), hits)
}
