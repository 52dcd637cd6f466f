//! HTTP endpoint tests.
//!
//! Drives the full router against the in-memory upstream client.

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use rsheets_domain::AliasTable;
use rsheets_upstream::MemorySheetsClient;

use super::routes::create_router;
use super::state::AppState;

fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|row| row.iter().map(|c| c.to_string()).collect())
        .collect()
}

fn test_router() -> Router {
    let client = MemorySheetsClient::new();
    client.insert_sheet(
        "sheet-roster-id",
        "Roster",
        grid(&[&["name", "team"], &["ada", "core"], &["grace", "infra"]]),
    );
    client.insert_sheet("sheet-roster-id", "Archive", grid(&[&["old"]]));
    client.insert_sheet(
        "sheet-b",
        "Inventory",
        grid(&[&["item", "qty"], &["bolt", "10"]]),
    );

    let mut aliases = HashMap::new();
    aliases.insert("roster".to_string(), "sheet-roster-id".to_string());

    create_router(AppState::new(Arc::new(client), AliasTable::new(aliases)))
}

async fn send_json(
    router: Router,
    method: Method,
    uri: &str,
    body: Value,
) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn post_json(router: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send_json(router, Method::POST, uri, body).await
}

#[tokio::test]
async fn test_health_check() {
    let response = test_router()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_get_range_by_raw_id() {
    let (status, body) = post_json(
        test_router(),
        "/sheets/range",
        json!({ "spreadsheetId": "sheet-roster-id", "range": "Roster!A1:B2" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["majorDimension"], "ROWS");
    assert_eq!(
        body["data"]["values"],
        json!([["name", "team"], ["ada", "core"]])
    );
}

#[tokio::test]
async fn test_get_range_by_alias_with_columns_dimension() {
    let (status, body) = post_json(
        test_router(),
        "/sheets/range",
        json!({
            "spreadsheet": "roster",
            "range": "Roster!A1:B2",
            "majorDimension": "COLUMNS"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"]["values"],
        json!([["name", "ada"], ["team", "core"]])
    );
}

#[tokio::test]
async fn test_both_selectors_is_validation_error() {
    let (status, body) = post_json(
        test_router(),
        "/sheets/range",
        json!({
            "spreadsheet": "roster",
            "spreadsheetId": "sheet-roster-id",
            "range": "Roster!A1"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");
}

#[tokio::test]
async fn test_missing_selector_is_validation_error() {
    let (status, body) = post_json(
        test_router(),
        "/sheets/range",
        json!({ "range": "Roster!A1" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");
}

#[tokio::test]
async fn test_malformed_json_is_bad_request_not_422() {
    let response = test_router()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/sheets/range")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["code"], "validation_error");
}

#[tokio::test]
async fn test_unknown_alias_is_validation_error() {
    let (status, body) = post_json(
        test_router(),
        "/sheets/range",
        json!({ "spreadsheet": "unconfigured", "range": "A1" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");
    assert!(body["message"].as_str().unwrap().contains("unconfigured"));
}

#[tokio::test]
async fn test_upstream_status_is_passed_through() {
    let (status, body) = post_json(
        test_router(),
        "/sheets/range",
        json!({ "spreadsheetId": "missing-spreadsheet", "range": "A1" }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "upstream_error");
}

#[tokio::test]
async fn test_get_ranges_coalesces_by_spreadsheet_and_dimension() {
    let (status, body) = post_json(
        test_router(),
        "/sheets/ranges",
        json!({
            "ranges": [
                { "spreadsheet": "roster", "range": "Roster!A1:B1" },
                { "spreadsheet": "roster", "range": "Roster!A2:B2" },
                { "spreadsheet": "roster", "range": "Roster!A1:B1" },
                { "spreadsheetId": "sheet-b", "range": "Inventory!A1:B1" }
            ]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let groups = body["data"].as_array().unwrap();
    assert_eq!(groups.len(), 2);

    // Alias group: duplicate range dropped, symbolic name reattached.
    assert_eq!(groups[0]["spreadsheet"], "roster");
    assert_eq!(groups[0]["spreadsheetId"], "sheet-roster-id");
    assert_eq!(groups[0]["valueRanges"].as_array().unwrap().len(), 2);
    assert_eq!(
        groups[0]["valueRanges"][0]["values"],
        json!([["name", "team"]])
    );

    // Raw-id group has no symbolic name.
    assert_eq!(groups[1]["spreadsheetId"], "sheet-b");
    assert!(groups[1].get("spreadsheet").is_none());
}

#[tokio::test]
async fn test_get_ranges_splits_groups_by_dimension() {
    let (status, body) = post_json(
        test_router(),
        "/sheets/ranges",
        json!({
            "ranges": [
                { "spreadsheet": "roster", "range": "Roster!A1:B2" },
                { "spreadsheet": "roster", "range": "Roster!A1:B2", "majorDimension": "COLUMNS" }
            ]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_get_ranges_rejects_empty_list() {
    let (status, body) = post_json(test_router(), "/sheets/ranges", json!({ "ranges": [] })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");
}

#[tokio::test]
async fn test_get_titles_with_filter() {
    let (status, body) = post_json(
        test_router(),
        "/sheets/titles",
        json!({ "spreadsheet": "roster", "filter": { "exclude": ["archive"] } }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["spreadsheet"], "roster");
    assert_eq!(body["data"]["titles"], json!(["Roster"]));
}

#[tokio::test]
async fn test_batch_titles() {
    let (status, body) = post_json(
        test_router(),
        "/sheets/batch/titles",
        json!({
            "spreadsheets": [
                { "spreadsheet": "roster" },
                { "spreadsheetId": "sheet-b" }
            ]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let results = body["data"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["titles"], json!(["Roster", "Archive"]));
    assert_eq!(results[1]["spreadsheetId"], "sheet-b");
    assert_eq!(results[1]["titles"], json!(["Inventory"]));
}

#[tokio::test]
async fn test_batch_titles_rejects_empty_list() {
    let (status, body) = post_json(
        test_router(),
        "/sheets/batch/titles",
        json!({ "spreadsheets": [] }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");
}

#[tokio::test]
async fn test_update_range_then_read_back() {
    let router = test_router();

    let (status, body) = send_json(
        router.clone(),
        Method::PATCH,
        "/sheets/range",
        json!({
            "spreadsheet": "roster",
            "range": "Roster!A2:B2",
            "values": [["lin", "data"]]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["values"], json!([["lin", "data"]]));

    let (status, body) = post_json(
        router,
        "/sheets/range",
        json!({ "spreadsheet": "roster", "range": "Roster!A2:B2" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["values"], json!([["lin", "data"]]));
}

#[tokio::test]
async fn test_update_rejects_empty_values() {
    let (status, body) = send_json(
        test_router(),
        Method::PATCH,
        "/sheets/range",
        json!({ "spreadsheet": "roster", "range": "Roster!A2:B2", "values": [] }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");
}

#[tokio::test]
async fn test_append_range_adds_rows() {
    let router = test_router();

    let (status, _) = post_json(
        router.clone(),
        "/sheets/range/append",
        json!({
            "spreadsheet": "roster",
            "range": "Roster!A1:B1",
            "values": [["lin", "data"]]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = post_json(
        router,
        "/sheets/range",
        json!({ "spreadsheet": "roster", "range": "Roster!A4:B4" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["values"], json!([["lin", "data"]]));
}
