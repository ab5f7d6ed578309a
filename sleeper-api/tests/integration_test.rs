use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sleeper_api::{app, AppState};
use sleeper_engine::ReservationEngine;
use tower::ServiceExt;

fn test_app() -> axum::Router {
    app(AppState::new(ReservationEngine::with_defaults()))
}

async fn send(app: &axum::Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(json) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = test_app();
    let (status, body) = send(&app, "GET", "/api/v1/tickets/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["backend_ok"], true);
}

#[tokio::test]
async fn test_book_cancel_roundtrip() {
    let app = test_app();

    let (status, booked) = send(
        &app,
        "POST",
        "/api/v1/tickets/book",
        Some(json!({
            "passengers": [
                {"name": "Alice", "age": 65, "gender": "female"},
                {"name": "Bob", "age": 30, "gender": "male"}
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(booked["status"], "confirmed");
    // The senior is placed first and takes the first lower berth
    let alice = &booked["passengers"][0];
    assert_eq!(alice["name"], "Alice");
    assert_eq!(alice["berth"], "lower");

    let (status, availability) = send(&app, "GET", "/api/v1/tickets/available", None).await;
    assert_eq!(status, StatusCode::OK);
    // Both adults sit in the lower tier: the senior picked first, and the
    // descent offers lower berths to everyone while any remain
    assert_eq!(availability["confirmed_available"], 61);
    assert_eq!(availability["rac_available"], 18);
    assert_eq!(availability["available_berths"]["lower"], 19);
    assert_eq!(availability["available_berths"]["middle"], 21);

    let ticket_id = booked["ticket_id"].as_u64().unwrap();
    let uri = format!("/api/v1/tickets/cancel/{}", ticket_id);
    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);

    // Cancelling again is rejected without side effects
    let (status, error) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "ALREADY_CANCELLED");

    let (_, availability) = send(&app, "GET", "/api/v1/tickets/available", None).await;
    assert_eq!(availability["confirmed_available"], 63);
}

#[tokio::test]
async fn test_cancel_unknown_ticket_is_404() {
    let app = test_app();
    let (status, error) = send(&app, "DELETE", "/api/v1/tickets/cancel/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["code"], "RESOURCE_NOT_FOUND");
}

#[tokio::test]
async fn test_validation_errors_carry_codes() {
    let app = test_app();

    let (status, error) = send(
        &app,
        "POST",
        "/api/v1/tickets/book",
        Some(json!({"passengers": []})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "VALIDATION_ERROR");

    // Malformed body is rejected at the boundary, same code
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/tickets/book")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_booked_listing_groups_by_status() {
    let app = test_app();
    for i in 0..2 {
        let (status, _) = send(
            &app,
            "POST",
            "/api/v1/tickets/book",
            Some(json!({
                "passengers": [{"name": format!("P{}", i), "age": 40, "gender": "other"}]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, booked) = send(&app, "GET", "/api/v1/tickets/booked", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(booked["summary"]["confirmed_count"], 2);
    assert_eq!(booked["summary"]["total_count"], 2);
    assert_eq!(booked["confirmed"].as_array().unwrap().len(), 2);
    assert!(booked["rac"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_history_endpoint() {
    let app = test_app();
    let (_, booked) = send(
        &app,
        "POST",
        "/api/v1/tickets/book",
        Some(json!({
            "passengers": [{"name": "Tracked", "age": 28, "gender": "female"}]
        })),
    )
    .await;
    let ticket_id = booked["ticket_id"].as_u64().unwrap();

    let (status, events) = send(
        &app,
        "GET",
        &format!("/api/v1/tickets/history/{}", ticket_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let events = events.as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["kind"], "berth_allocated");

    let (status, _) = send(&app, "GET", "/api/v1/tickets/history/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
