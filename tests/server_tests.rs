//! Integration tests for the reading-ledger HTTP host.
//!
//! These tests use axum-test to make requests against the router without starting a real server.

#![cfg(feature = "server")]

mod common;

use axum::http::StatusCode;
use common::{FaultyStub, TestApp};
use reading_ledger::Reading;
use reading_ledger::server::AppState;

// =============================================================================
// Health Check Tests
// =============================================================================

#[tokio::test]
async fn test_health_check() -> anyhow::Result<()> {
    let app = TestApp::new()?;

    let response = app.server.get("/health").await;

    response.assert_status_ok();
    response.assert_text("ok");

    Ok(())
}

// =============================================================================
// Reading Routes
// =============================================================================

#[tokio::test]
async fn test_list_empty() -> anyhow::Result<()> {
    let app = TestApp::new()?;

    let response = app.server.get("/api/v1/readings").await;
    response.assert_status_ok();
    let readings: Vec<Reading> = response.json();
    assert!(readings.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_init_ledger_then_list() -> anyhow::Result<()> {
    let app = TestApp::new()?;

    app.server
        .post("/api/v1/ledger/init")
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let readings: Vec<Reading> = app.server.get("/api/v1/readings").await.json();
    assert_eq!(readings.len(), 2);
    assert!(readings.contains(&Reading::new("reading1", 1, 5, 10)));
    assert!(readings.contains(&Reading::new("reading2", 1, 20, 5)));

    Ok(())
}

#[tokio::test]
async fn test_seed_from_config() -> anyhow::Result<()> {
    let app = TestApp::seeded()?;

    let response = app.server.get("/api/v1/readings/reading2").await;
    response.assert_status_ok();
    let reading: Reading = response.json();
    assert_eq!(reading, Reading::new("reading2", 1, 20, 5));

    Ok(())
}

#[tokio::test]
async fn test_create_and_get() -> anyhow::Result<()> {
    let app = TestApp::new()?;
    app.create_reading("meter-1", 3, 14, 2).await?;

    let response = app.server.get("/api/v1/readings/meter-1").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(
        body,
        serde_json::json!({ "ID": "meter-1", "cycle": 3, "consumed": 14, "injected": 2 })
    );

    Ok(())
}

#[tokio::test]
async fn test_create_duplicate() -> anyhow::Result<()> {
    let app = TestApp::new()?;
    app.create_reading("meter-1", 3, 14, 2).await?;

    let response = app
        .server
        .post("/api/v1/readings")
        .json(&serde_json::json!({ "ID": "meter-1", "cycle": 9, "consumed": 9, "injected": 9 }))
        .await;
    response.assert_status(StatusCode::CONFLICT);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["code"].as_str(), Some("READING_EXISTS"));
    assert_eq!(body["error"]["details"]["id"].as_str(), Some("meter-1"));

    // The original reading is untouched
    let reading: Reading = app.server.get("/api/v1/readings/meter-1").await.json();
    assert_eq!(reading.cycle, 3);

    Ok(())
}

#[tokio::test]
async fn test_create_invalid_body() -> anyhow::Result<()> {
    let app = TestApp::new()?;

    let response = app
        .server
        .post("/api/v1/readings")
        .json(&serde_json::json!({ "ID": "meter-1", "cycle": "three" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["code"].as_str(), Some("INVALID_BODY"));

    Ok(())
}

#[tokio::test]
async fn test_get_missing() -> anyhow::Result<()> {
    let app = TestApp::new()?;

    let response = app.server.get("/api/v1/readings/nope").await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["code"].as_str(), Some("READING_NOT_FOUND"));
    assert_eq!(
        body["error"]["message"].as_str(),
        Some("the reading nope does not exist")
    );

    Ok(())
}

#[tokio::test]
async fn test_exists() -> anyhow::Result<()> {
    let app = TestApp::new()?;

    let exists: bool = app.server.get("/api/v1/readings/meter-1/exists").await.json();
    assert!(!exists);

    app.create_reading("meter-1", 1, 1, 1).await?;

    let exists: bool = app.server.get("/api/v1/readings/meter-1/exists").await.json();
    assert!(exists);

    Ok(())
}

// =============================================================================
// Invocation Route
// =============================================================================

#[tokio::test]
async fn test_invoke_create_and_read() -> anyhow::Result<()> {
    let app = TestApp::new()?;

    let response = app
        .server
        .post("/api/v1/invoke/CreateReading")
        .json(&serde_json::json!({ "args": ["meter-7", "2", "40", "-5"] }))
        .await;
    response.assert_status_ok();
    let created: Reading = response.json();
    assert_eq!(created, Reading::new("meter-7", 2, 40, -5));

    let response = app
        .server
        .post("/api/v1/invoke/ReadReading")
        .json(&serde_json::json!({ "args": ["meter-7"] }))
        .await;
    response.assert_status_ok();
    let read: Reading = response.json();
    assert_eq!(read, created);

    Ok(())
}

#[tokio::test]
async fn test_invoke_without_body() -> anyhow::Result<()> {
    let app = TestApp::new()?;

    let response = app.server.post("/api/v1/invoke/GetAllReadings").await;
    response.assert_status_ok();
    response.assert_text("[]");

    app.server
        .post("/api/v1/invoke/InitLedger")
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let response = app
        .server
        .post("/api/v1/invoke/ReadingExists")
        .json(&serde_json::json!({ "args": ["reading1"] }))
        .await;
    response.assert_status_ok();
    response.assert_text("true");

    Ok(())
}

#[tokio::test]
async fn test_invoke_unknown_function() -> anyhow::Result<()> {
    let app = TestApp::new()?;

    let response = app.server.post("/api/v1/invoke/DeleteReading").await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["code"].as_str(), Some("UNKNOWN_FUNCTION"));

    Ok(())
}

#[tokio::test]
async fn test_invoke_bad_arguments() -> anyhow::Result<()> {
    let app = TestApp::new()?;

    let response = app
        .server
        .post("/api/v1/invoke/CreateReading")
        .json(&serde_json::json!({ "args": ["meter-1", "x", "1", "1"] }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["code"].as_str(), Some("INVALID_ARGUMENTS"));
    assert_eq!(body["error"]["details"]["function"].as_str(), Some("CreateReading"));

    Ok(())
}

#[tokio::test]
async fn test_invoke_duplicate_is_conflict() -> anyhow::Result<()> {
    let app = TestApp::seeded()?;

    let response = app
        .server
        .post("/api/v1/invoke/CreateReading")
        .json(&serde_json::json!({ "args": ["reading1", "1", "1", "1"] }))
        .await;
    response.assert_status(StatusCode::CONFLICT);

    Ok(())
}

// =============================================================================
// Persistent World State
// =============================================================================

#[tokio::test]
async fn test_persistent_store_roundtrip() -> anyhow::Result<()> {
    let app = TestApp::persistent()?;
    app.create_reading("meter-1", 8, 3, 1).await?;

    let readings: Vec<Reading> = app.server.get("/api/v1/readings").await.json();
    assert_eq!(readings, vec![Reading::new("meter-1", 8, 3, 1)]);

    Ok(())
}

// =============================================================================
// Transaction Tests
// =============================================================================

#[test]
fn test_failed_init_ledger_leaves_world_state_empty() -> anyhow::Result<()> {
    let stub = FaultyStub {
        fail_put_key: Some("reading2".into()),
        ..FaultyStub::new()
    };
    let state = AppState::new(Box::new(stub));

    let err = state.with_stub(|contract, stub| contract.init_ledger(stub)).err();
    assert!(matches!(err, Some(ref e) if e.status == StatusCode::SERVICE_UNAVAILABLE));

    let readings = state
        .with_stub(|contract, stub| contract.get_all_readings(stub))
        .map_err(|e| anyhow::anyhow!(e.message))?;
    assert!(readings.is_empty());
    Ok(())
}
