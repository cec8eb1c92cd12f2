//! Integration tests for mvc-binding-site endpoints
//!
//! Tests cover:
//! - Health endpoint and scenario listing
//! - Prefix selection scenarios over real HTTP requests
//! - Model state reporting and 400 on invalid state
//! - Header, body, collection, dictionary and route binding
//! - Unknown scenarios and shutdown cancellation

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use mvc_binding::BindingOptions;
use mvc_binding_site::{build_router, AppState};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use tower::util::ServiceExt; // for `oneshot` method

const FORM: &str = "application/x-www-form-urlencoded";

/// Test helper: app over the built-in scenarios
fn setup_app() -> axum::Router {
    let state = AppState::from_options(BindingOptions::default(), CancellationToken::new()).unwrap();
    build_router(state)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post(uri: &str, content_type: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", content_type)
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Test helper: send a request, return status and JSON body
async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    (status, serde_json::from_slice(&bytes).expect("Should parse JSON"))
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (status, body) = send(setup_app(), get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "mvc-binding-site");
    assert!(body["version"].is_string());
    assert_eq!(body["scenarios"], 8);
}

#[tokio::test]
async fn test_scenario_listing() {
    let (status, body) = send(setup_app(), get("/binding")).await;

    assert_eq!(status, StatusCode::OK);
    let scenarios = body.as_array().expect("Should be a JSON array");
    assert_eq!(scenarios.len(), 8);

    let scores = scenarios
        .iter()
        .find(|s| s["name"] == "scores")
        .expect("Should list scores");
    assert_eq!(scores["parameter"], "scores");
    assert!(!scores["description"].as_str().unwrap().is_empty());
}

// =============================================================================
// Prefix selection
// =============================================================================

#[tokio::test]
async fn test_form_only_name_keeps_parameter_prefix() {
    let request = post("/binding/form-only-name?parameter=", FORM, "Name=Billy");
    let (status, body) = send(setup_app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["is_model_set"], true);
    assert_eq!(body["result"]["key"], "parameter");
    assert_eq!(body["result"]["model"]["Name"], Value::Null);
    assert_eq!(body["model_state"]["error_count"], 0);
    assert_eq!(body["model_state"]["entries"], json!({}));
}

#[tokio::test]
async fn test_form_only_name_binds_without_prefix() {
    let request = post("/binding/form-only-name", FORM, "Name=Billy");
    let (status, body) = send(setup_app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["key"], "");
    assert_eq!(body["result"]["model"]["Name"], "Billy");
}

#[tokio::test]
async fn test_query_only_name_ignores_non_form_body() {
    let request = post("/binding/query-only-name", "text/plain", "parameter=");
    let (status, body) = send(setup_app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["key"], "");
    assert_eq!(body["result"]["model"]["Name"], Value::Null);
    assert_eq!(body["model_state"]["is_valid"], true);
}

// =============================================================================
// Model shapes
// =============================================================================

#[tokio::test]
async fn test_person_partial_binding_reports_errors() {
    let uri = "/binding/person?Name=Billy&Age=old&Home.City=Oslo&Tags%5B0%5D=a&Scores%5Bx%5D=3";
    let (status, body) = send(setup_app(), get(uri)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let model = &body["result"]["model"];
    assert_eq!(model["Name"], "Billy");
    assert_eq!(model["Age"], Value::Null);
    assert_eq!(model["Home"]["City"], "Oslo");
    assert_eq!(model["Tags"], json!(["a"]));
    assert_eq!(model["Scores"], json!({"x": 3}));

    assert_eq!(body["model_state"]["is_valid"], false);
    assert_eq!(body["model_state"]["error_count"], 1);
    assert_eq!(
        body["model_state"]["entries"]["Age"]["errors"][0]["message"],
        "The value 'old' is not valid for Age."
    );
    assert_eq!(body["model_state"]["entries"]["Age"]["attempted_value"], "old");
}

#[tokio::test]
async fn test_header_person() {
    let request = Request::builder()
        .uri("/binding/header-person?Name=Billy&Id=5")
        .header("X-Token", "secret")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(setup_app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["model"]["Token"], "secret");
    assert_eq!(body["result"]["model"]["Id"], 5);
}

#[tokio::test]
async fn test_missing_required_property() {
    let (status, body) = send(setup_app(), get("/binding/header-person?Name=Billy")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["model_state"]["entries"]["Id"]["errors"][0]["message"],
        "A value for the 'Id' parameter or property was not provided."
    );
}

#[tokio::test]
async fn test_person_from_json_body() {
    let request = post(
        "/binding/person-body",
        "application/json",
        r#"{"name":"Billy","tags":["a","b"],"home":{"zip":12345}}"#,
    );
    let (status, body) = send(setup_app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["key"], "person");
    assert_eq!(body["result"]["model"]["Name"], "Billy");
    assert_eq!(body["result"]["model"]["Tags"], json!(["a", "b"]));
    assert_eq!(body["result"]["model"]["Home"]["Zip"], 12345);
}

#[tokio::test]
async fn test_collection_and_dictionary() {
    let (_, ids) = send(setup_app(), get("/binding/ids?ids=1&ids=2")).await;
    assert_eq!(ids["result"]["model"], json!([1, 2]));

    let (_, scores) = send(setup_app(), get("/binding/scores?scores%5Ba%5D=1&scores.b=2")).await;
    assert_eq!(scores["result"]["model"], json!({"a": 1, "b": 2}));
}

#[tokio::test]
async fn test_dictionary_without_data_is_empty_and_valid() {
    let (status, body) = send(setup_app(), get("/binding/scores")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["model"], json!({}));
    assert_eq!(body["model_state"]["is_valid"], true);
    assert_eq!(body["model_state"]["error_count"], 0);
}

#[tokio::test]
async fn test_route_value_binding() {
    let (status, body) = send(setup_app(), get("/binding/route-scenario")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["key"], "scenario");
    assert_eq!(body["result"]["model"], "route-scenario");
}

// =============================================================================
// Errors
// =============================================================================

#[tokio::test]
async fn test_unknown_scenario() {
    let (status, body) = send(setup_app(), get("/binding/nope")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Unknown scenario: nope");
}

#[tokio::test]
async fn test_shutdown_cancels_binding() {
    let shutdown = CancellationToken::new();
    let state = AppState::from_options(BindingOptions::default(), shutdown.clone()).unwrap();
    shutdown.cancel();

    let (status, body) = send(build_router(state), get("/binding/person?Name=Billy")).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].as_str().unwrap().contains("cancelled"));
}
