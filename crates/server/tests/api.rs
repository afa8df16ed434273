//! HTTP-level tests against the full router with an in-memory database.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use db::DBService;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use server::{AppState, app_router};
use tower::ServiceExt;

async fn app() -> Router {
    let db = DBService::new_in_memory().await.unwrap();
    app_router(AppState::new(db))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn health_reports_ok() {
    let app = app().await;
    let (status, body) = send(&app, "GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], "ok");
}

#[tokio::test]
async fn unknown_analysis_type_is_a_400_not_empty_data() {
    let app = app().await;
    let (status, body) = send(
        &app,
        "GET",
        "/api/analytics/demand-supply?type=unknown_value",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid analysis type: unknown_value");
}

#[tokio::test]
async fn analytics_on_empty_database_returns_empty_array() {
    let app = app().await;
    for uri in [
        "/api/analytics/demand-supply",
        "/api/analytics/weather-impact",
        "/api/analytics/nutrition",
        "/api/analytics/supply-demand",
    ] {
        let (status, body) = send(&app, "GET", uri, None).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(body["success"], true, "{uri}");
        assert_eq!(body["data"], json!([]), "{uri}");
    }
}

#[tokio::test]
async fn production_round_trips_through_create_and_read() {
    let app = app().await;

    let (status, district) = send(
        &app,
        "POST",
        "/api/districts",
        Some(json!({ "name": "Rangpur" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let district_id = district["data"]["id"].as_i64().unwrap();

    let (status, product) = send(
        &app,
        "POST",
        "/api/products",
        Some(json!({ "name": "Rice", "type": "crop" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let product_id = product["data"]["id"].as_i64().unwrap();

    let (status, created) = send(
        &app,
        "POST",
        "/api/production",
        Some(json!({
            "product_id": product_id,
            "district_id": district_id,
            "date": "2023-03-10",
            "acreage": 12.5,
            "quantity": 340.0,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = created["data"]["id"].as_i64().unwrap();

    let (status, fetched) = send(&app, "GET", &format!("/api/production/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["data"]["product_id"], product_id);
    assert_eq!(fetched["data"]["district_id"], district_id);
    assert_eq!(fetched["data"]["date"], "2023-03-10");
    assert_eq!(fetched["data"]["acreage"], 12.5);
    assert_eq!(fetched["data"]["quantity"], 340.0);
}

#[tokio::test]
async fn fact_write_against_missing_reference_is_rejected_with_guidance() {
    let app = app().await;
    let (status, body) = send(
        &app,
        "POST",
        "/api/production",
        Some(json!({
            "product_id": 99,
            "district_id": 1,
            "date": "2023-03-10",
            "acreage": 1.0,
            "quantity": 10.0,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("product_id 99"), "{message}");
}

#[tokio::test]
async fn delete_of_absent_transaction_is_idempotent_success() {
    let app = app().await;
    let (status, body) = send(&app, "DELETE", "/api/transactions/12345", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn get_of_absent_entity_is_404() {
    let app = app().await;
    let (status, body) = send(&app, "GET", "/api/products/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}
