mod common;

use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use tower::ServiceExt;

fn app() -> axum::Router {
    common::create_test_app(common::create_state(&common::test_config(
        Duration::from_secs(3600),
    )))
}

#[tokio::test]
async fn health_reports_ok() {
    let (status, body) = common::get_json(app(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "link-preview-server");
    assert_eq!(body["cache_entries"], 0);
}

#[tokio::test]
async fn unknown_route_is_json_404() {
    let (status, body) = common::get_json(app(), "/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not found");
}

#[tokio::test]
async fn every_response_carries_cors_headers() {
    // Error responses too, not just successes.
    let response = common::get_raw(app(), "/api/preview").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_HEADERS],
        "Origin, X-Requested-With, Content-Type, Accept"
    );
}

#[tokio::test]
async fn preflight_is_answered() {
    let req = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/preview?url=https%3A%2F%2Fexample.com")
        .header(header::ORIGIN, "https://client.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(req).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    let allowed = response.headers()[header::ACCESS_CONTROL_ALLOW_HEADERS]
        .to_str()
        .unwrap()
        .to_ascii_lowercase();
    assert!(allowed.contains("content-type"), "{allowed}");
    assert!(allowed.contains("x-requested-with"), "{allowed}");
}

#[tokio::test]
async fn duplicated_url_parameter_is_a_json_400() {
    let (status, body) = common::get_json(
        app(),
        "/api/preview?url=https%3A%2F%2Fa.example&url=https%3A%2F%2Fb.example",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, serde_json::json!({ "error": "invalid URL" }));
}

#[tokio::test]
async fn undecodable_url_parameter_is_a_json_400() {
    for endpoint in ["preview", "proxy"] {
        let (status, body) = common::get_json(app(), &format!("/api/{endpoint}?url=%FF")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{endpoint}");
        assert_eq!(body, serde_json::json!({ "error": "invalid URL" }), "{endpoint}");
    }
}
