//! Contract invocation by function name.

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::ledger::Invocation;

use super::super::{error::ApiError, state::AppState};

/// Body of an invocation: the function's string arguments.
#[derive(Debug, Default, Deserialize)]
pub struct InvokeRequest {
    #[serde(default)]
    pub args: Vec<String>,
}

/// Invoke a contract function with string arguments, as the ledger runtime
/// would. An empty body means no arguments.
pub async fn invoke_function(
    State(state): State<AppState>,
    Path(function): Path<String>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let request: InvokeRequest = if body.is_empty() {
        InvokeRequest::default()
    } else {
        let Json(request) =
            Json::from_bytes(&body).map_err(|e| ApiError::invalid_body(e.body_text()))?;
        request
    };

    let invocation = Invocation::parse(&function, request.args.as_slice())?;
    let response = state.with_stub(|contract, stub| contract.invoke(stub, invocation))?;
    let payload = response
        .to_payload()
        .map_err(|e| ApiError::internal(e.to_string()))?;

    if payload.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }
    Ok(([(header::CONTENT_TYPE, "application/json")], payload).into_response())
}
