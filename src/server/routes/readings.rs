//! Reading handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::ledger::Reading;

use super::super::{error::ApiError, state::AppState};

/// Body of a create request.
#[derive(Debug, Deserialize)]
pub struct CreateReadingRequest {
    #[serde(rename = "ID")]
    pub id: String,
    pub cycle: i64,
    pub consumed: i64,
    pub injected: i64,
}

/// Write the seed readings.
pub async fn init_ledger(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    state.with_stub(|contract, stub| contract.init_ledger(stub))?;
    Ok(StatusCode::NO_CONTENT)
}

/// List every reading.
pub async fn list_readings(State(state): State<AppState>) -> Result<Json<Vec<Reading>>, ApiError> {
    let readings = state.with_stub(|contract, stub| contract.get_all_readings(stub))?;
    Ok(Json(readings))
}

/// Create a reading.
pub async fn create_reading(
    State(state): State<AppState>,
    body: Result<Json<CreateReadingRequest>, axum::extract::rejection::JsonRejection>,
) -> Result<(StatusCode, Json<Reading>), ApiError> {
    let Json(request) = body.map_err(|e| ApiError::invalid_body(e.body_text()))?;

    let reading = state.with_stub(|contract, stub| {
        contract.create_reading(
            stub,
            &request.id,
            request.cycle,
            request.consumed,
            request.injected,
        )
    })?;
    Ok((StatusCode::CREATED, Json(reading)))
}

/// Get a reading by ID.
pub async fn get_reading(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Reading>, ApiError> {
    let reading = state.with_stub(|contract, stub| contract.read_reading(stub, &id))?;
    Ok(Json(reading))
}

/// Check whether a reading exists.
pub async fn reading_exists(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<bool>, ApiError> {
    let exists = state.with_stub(|contract, stub| contract.reading_exists(stub, &id))?;
    Ok(Json(exists))
}
