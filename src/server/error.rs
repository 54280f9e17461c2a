//! API error types and JSON response formatting.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::{debug, error};

use crate::ledger::ContractError;

/// API error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

/// Error details in the response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// API error type that converts to HTTP responses.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error.
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add details to the error.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Malformed request body.
    pub fn invalid_body(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "INVALID_BODY", message)
    }

    /// Internal server error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(code = self.code, message = %self.message, "request failed");
        } else {
            debug!(code = self.code, message = %self.message, "request rejected");
        }

        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code,
                message: self.message,
                details: self.details,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<ContractError> for ApiError {
    fn from(err: ContractError) -> Self {
        let status = match &err {
            ContractError::NotFound(_) | ContractError::UnknownFunction(_) => StatusCode::NOT_FOUND,
            ContractError::AlreadyExists(_) => StatusCode::CONFLICT,
            ContractError::InvalidArguments { .. } => StatusCode::BAD_REQUEST,
            ContractError::StoreRead(_) | ContractError::StoreWrite(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ContractError::Encoding { .. } | ContractError::Decoding { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let details = match &err {
            ContractError::NotFound(id) | ContractError::AlreadyExists(id) => {
                Some(serde_json::json!({ "id": id }))
            }
            ContractError::Decoding { key, .. } => Some(serde_json::json!({ "key": key })),
            ContractError::UnknownFunction(function)
            | ContractError::InvalidArguments { function, .. } => {
                Some(serde_json::json!({ "function": function }))
            }
            _ => None,
        };

        let api_error = Self::new(status, err.code(), err.to_string());
        match details {
            Some(details) => api_error.with_details(details),
            None => api_error,
        }
    }
}
