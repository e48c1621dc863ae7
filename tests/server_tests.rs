//! Endpoint router over a mocked booking API.

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use booker_probe::runner::Orchestrator;
use booker_probe::server::api_router;
use booker_probe::Config;

async fn router_for(server: &MockServer) -> axum::Router {
    Mock::given(method("POST"))
        .and(path("/auth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "abc123" })))
        .mount(server)
        .await;

    let config = Config {
        base_url: server.uri(),
        timeout_ms: 2_000,
        ..Config::default()
    };
    let orchestrator = Orchestrator::connect(&config).await.unwrap();
    api_router(Arc::new(orchestrator))
}

async fn get_json(router: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_scenario_route_returns_outcome_record() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/booking/999999"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&server)
        .await;
    let router = router_for(&server).await;

    let (status, body) = get_json(router, "/api/tests/non-existent").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["testName"], "Get Non-Existent Booking");
    assert_eq!(body["status"], "PASSED");
    assert_eq!(body["statusCode"], 404);
    assert_eq!(body["responseBody"], "Not Found");
    assert!(body["duration"].as_u64().is_some());
}

#[tokio::test]
async fn test_failed_scenario_still_answers_ok() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let router = router_for(&server).await;

    let (status, body) = get_json(router, "/api/tests/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "FAILED");
    assert_eq!(body["message"], "Unexpected status code: 503");
}

#[tokio::test]
async fn test_unknown_scenario_is_404() {
    let server = MockServer::start().await;
    let router = router_for(&server).await;

    let (status, body) = get_json(router, "/api/tests/drop-tables").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Unknown scenario: drop-tables");
}

#[tokio::test]
async fn test_listing_route_names_every_scenario() {
    let server = MockServer::start().await;
    let router = router_for(&server).await;

    let (status, body) = get_json(router, "/api/tests").await;
    assert_eq!(status, StatusCode::OK);
    let slugs: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["slug"].as_str().unwrap())
        .collect();
    assert_eq!(slugs.len(), 10);
    assert!(slugs.contains(&"get-bookings-by-name"));
    assert!(slugs.contains(&"partial-update"));
    assert_eq!(body[0]["expectedStatus"], 201);
}

#[tokio::test]
async fn test_dropped_request_still_tracks_created_booking() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "abc123" })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/booking"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "bookingid": 42, "booking": {} }))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    let config = Config {
        base_url: server.uri(),
        timeout_ms: 2_000,
        ..Config::default()
    };
    let orchestrator = Arc::new(Orchestrator::connect(&config).await.unwrap());
    let router = api_router(orchestrator.clone());

    // The client gives up before the create answers
    let request = Request::builder()
        .uri("/api/tests/create-booking")
        .body(Body::empty())
        .unwrap();
    let dropped = tokio::time::timeout(Duration::from_millis(50), router.oneshot(request)).await;
    assert!(dropped.is_err());

    // Waits on the session lock until the detached run completes
    assert_eq!(orchestrator.session_snapshot().await.booking_id(), Some(42));
}
