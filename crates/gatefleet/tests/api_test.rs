#![allow(clippy::unwrap_used)]
// HTTP API tests: the router is driven in-process with `oneshot`.

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gatefleet::api::{AppState, create_router};
use gatefleet_core::{Fleet, FleetConfig};

// ── Helpers ─────────────────────────────────────────────────────────

const UNREACHABLE: &str = "127.0.0.1:1";

fn app(dir: &TempDir) -> Router {
    let fleet = Fleet::open(FleetConfig::with_data_dir(dir.path())).unwrap();
    create_router(AppState::new(fleet))
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn healthy_device() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "device": "gate" })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/time/sync"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/database/sync"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .mount(&server)
        .await;
    server
}

async fn add_device(app: &Router, name: &str, ip: &str) -> Value {
    let (status, body) = call(
        app,
        Method::POST,
        "/api/devices/add",
        Some(json!({ "name": name, "ip": ip })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["device"].clone()
}

// ── Health ──────────────────────────────────────────────────────────

#[tokio::test]
async fn healthz_answers() {
    let dir = TempDir::new().unwrap();
    let (status, body) = call(&app(&dir), Method::GET, "/healthz", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

// ── Devices ─────────────────────────────────────────────────────────

#[tokio::test]
async fn first_device_becomes_active() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);
    let server = healthy_device().await;

    let device = add_device(&app, "Main gate", &server.uri()).await;
    assert_eq!(device["connected"], true);
    assert_eq!(device["status"], "connected");
    assert_eq!(device["location"], "Not specified");

    let (status, listing) = call(&app, Method::GET, "/api/devices", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing["activeDeviceId"], device["id"]);
    assert_eq!(listing["devices"][0]["isActive"], true);
}

#[tokio::test]
async fn unreachable_device_is_still_registered() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);

    let device = add_device(&app, "Side gate", UNREACHABLE).await;
    assert_eq!(device["connected"], false);
    assert_eq!(device["status"], "error");
    assert!(device["error"].is_string());
}

#[tokio::test]
async fn invalid_registrations_are_rejected() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/devices/add",
        Some(json!({ "ip": "10.0.0.5" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    add_device(&app, "Gate", UNREACHABLE).await;
    let (status, body) = call(
        &app,
        Method::POST,
        "/api/devices/add",
        Some(json!({ "name": "Copy", "endpoint": format!("http://{UNREACHABLE}/") })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("already exists"));
}

#[tokio::test]
async fn malformed_json_uses_failure_envelope() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/devices/add")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn delete_reports_new_active_device() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);
    let first = add_device(&app, "A", "127.0.0.1:1").await;
    let second = add_device(&app, "B", "127.0.0.1:2").await;

    let uri = format!("/api/devices/{}", first["id"].as_str().unwrap());
    let (status, body) = call(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["newActiveDeviceId"], second["id"]);

    let (status, body) = call(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn set_active_requires_a_device_id() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);
    add_device(&app, "A", "127.0.0.1:1").await;
    let second = add_device(&app, "B", "127.0.0.1:2").await;

    let (status, _) = call(&app, Method::POST, "/api/devices/set-active", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/devices/set-active",
        Some(json!({ "deviceId": second["id"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deviceId"], second["id"]);
}

#[tokio::test]
async fn failed_retry_returns_device_with_500() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);
    let device = add_device(&app, "Gate", UNREACHABLE).await;

    let uri = format!("/api/devices/{}/retry", device["id"].as_str().unwrap());
    let (status, body) = call(&app, Method::POST, &uri, None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["device"]["id"], device["id"]);
    assert!(body["error"].is_string());

    let (_, logs) = call(&app, Method::GET, "/api/logs/connections", None).await;
    let retry = logs["logs"]
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["action"] == "RETRY")
        .unwrap();
    assert_eq!(retry["status"], "FAILED");
}

#[tokio::test]
async fn sync_time_requires_connection() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);
    let device = add_device(&app, "Gate", UNREACHABLE).await;

    let uri = format!("/api/devices/{}/sync-time", device["id"].as_str().unwrap());
    let (status, body) = call(&app, Method::POST, &uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("not connected"));
}

#[tokio::test]
async fn connection_status_without_devices() {
    let dir = TempDir::new().unwrap();
    let (status, body) = call(&app(&dir), Method::GET, "/api/connection/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["connected"], false);
    assert_eq!(body["activeDeviceId"], Value::Null);
}

// ── Database ────────────────────────────────────────────────────────

#[tokio::test]
async fn user_lifecycle() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/database/users/add",
        Some(json!({ "uid": "A1B2", "name": "Alice" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["credit"], 100_000);
    assert_eq!(body["user"]["type"], "DYNAMIC");

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/database/users/add",
        Some(json!({ "uid": "A1B2", "name": "Again" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/database/users/A1B2/credit",
        Some(json!({ "amount": -3000 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["credit"], 97_000);

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/database/users/A1B2/credit",
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/database/users/update",
        Some(json!({ "uid": "A1B2", "in": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["in"], true);
    assert_eq!(body["user"]["name"], "Alice");

    let (_, body) = call(&app, Method::GET, "/api/database/users", None).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["users"].as_array().unwrap().len(), 1);

    let (status, _) = call(&app, Method::DELETE, "/api/database/users/A1B2", None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(&app, Method::DELETE, "/api/database/users/A1B2", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn settings_partial_update() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);

    let (_, settings) = call(&app, Method::GET, "/api/database/settings", None).await;
    assert_eq!(
        settings,
        json!({ "costPerExit": 3000, "defaultCredit": 100_000, "adminMode": false })
    );

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/database/settings",
        Some(json!({ "adminMode": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["settings"]["adminMode"], true);
    assert_eq!(body["settings"]["costPerExit"], 3000);
}

#[tokio::test]
async fn sync_all_reports_every_device() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);
    let server = healthy_device().await;
    add_device(&app, "Online", &server.uri()).await;
    add_device(&app, "Offline", UNREACHABLE).await;

    let (status, body) = call(&app, Method::POST, "/api/database/sync-all", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Synced to 1 out of 2 devices");
    let results = body["results"].as_array().unwrap();
    assert_eq!(results[0]["name"], "Online");
    assert_eq!(results[0]["success"], true);
    assert_eq!(results[1]["success"], false);
}

#[tokio::test]
async fn sync_one_device_counts_users() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);
    let server = healthy_device().await;
    let device = add_device(&app, "Gate", &server.uri()).await;
    call(
        &app,
        Method::POST,
        "/api/database/users/add",
        Some(json!({ "uid": "C3", "name": "Carol" })),
    )
    .await;

    let uri = format!("/api/database/sync/{}", device["id"].as_str().unwrap());
    let (status, body) = call(&app, Method::POST, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["syncedUsers"], 1);

    let (status, _) = call(&app, Method::POST, "/api/database/sync/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ── Inbox ───────────────────────────────────────────────────────────

#[tokio::test]
async fn alerts_are_stored_newest_first() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);

    for kind in ["tamper", "low_credit"] {
        let (status, body) = call(
            &app,
            Method::POST,
            "/api/alerts",
            Some(json!({ "type": kind, "id": 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["alert"]["type"], kind);
    }

    let (_, body) = call(&app, Method::GET, "/api/alerts", None).await;
    let alerts = body["alerts"].as_array().unwrap();
    assert_eq!(alerts.len(), 2);
    assert_eq!(alerts[0]["type"], "low_credit");
    assert_ne!(alerts[0]["id"], alerts[1]["id"]);

    call(&app, Method::DELETE, "/api/alerts", None).await;
    let (_, body) = call(&app, Method::GET, "/api/alerts", None).await;
    assert_eq!(body["alerts"], json!([]));
}

#[tokio::test]
async fn pending_scan_queue() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);

    let (status, _) = call(&app, Method::POST, "/api/input/new-uid", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/input/new-uid",
        Some(json!({ "uid": "D4", "isNew": true, "device_ip": "10.0.0.9" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let scan_id = body["scan"]["id"].as_u64().unwrap();

    let (_, body) = call(&app, Method::GET, "/api/input/pending-uids", None).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["uids"][0]["uid"], "D4");

    let (status, _) = call(&app, Method::DELETE, "/api/input/pending-uids/abc", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let uri = format!("/api/input/pending-uids/{scan_id}");
    let (status, _) = call(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn clearing_the_audit_log() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);
    add_device(&app, "Gate", UNREACHABLE).await;

    let (_, body) = call(&app, Method::GET, "/api/logs/connections", None).await;
    assert!(!body["logs"].as_array().unwrap().is_empty());

    let (status, body) = call(&app, Method::DELETE, "/api/logs/connections", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));
    let (_, body) = call(&app, Method::GET, "/api/logs/connections", None).await;
    assert_eq!(body["logs"], json!([]));
}

// ── Active-device control ───────────────────────────────────────────

#[tokio::test]
async fn control_requires_a_connected_active_device() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);

    let (status, body) = call(&app, Method::GET, "/api/esp32/info", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    add_device(&app, "Gate", UNREACHABLE).await;
    let (status, _) = call(&app, Method::POST, "/api/esp32/open", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn control_forwards_device_answers() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);
    let server = healthy_device().await;
    Mock::given(method("GET"))
        .and(path("/api/state"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "gate": "closed" })))
        .mount(&server)
        .await;
    add_device(&app, "Gate", &server.uri()).await;

    let (status, body) = call(&app, Method::GET, "/api/esp32/state", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "gate": "closed" }));
}
