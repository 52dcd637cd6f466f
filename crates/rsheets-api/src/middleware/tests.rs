//! Tests for API middleware.

use axum::{body::Body, http::Request, routing::get, Router};
use tower::ServiceExt;

use super::{RequestIdLayer, RequestLoggingLayer, REQUEST_ID_HEADER};

fn test_router() -> Router {
    Router::new()
        .route("/ping", get(|| async { "pong" }))
        .layer(RequestLoggingLayer::new())
        .layer(RequestIdLayer::new())
}

#[tokio::test]
async fn test_request_id_is_generated_when_absent() {
    let response = test_router()
        .oneshot(Request::builder().uri("/ping").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let header = response
        .headers()
        .get(REQUEST_ID_HEADER)
        .expect("response should carry a request id");
    assert!(!header.to_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_caller_request_id_is_preserved() {
    let response = test_router()
        .oneshot(
            Request::builder()
                .uri("/ping")
                .header(REQUEST_ID_HEADER, "caller-supplied-id")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers().get(REQUEST_ID_HEADER).unwrap(),
        "caller-supplied-id"
    );
}
