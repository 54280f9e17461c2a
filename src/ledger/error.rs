//! Error types for the ledger module.

use thiserror::Error;

/// Failures reported by a world state backend.
#[derive(Error, Debug)]
pub enum StoreError {
    #[cfg(feature = "kv")]
    #[error("Fjall error: {0}")]
    Fjall(#[from] fjall::Error),

    #[error("key must not be an empty string")]
    EmptyKey,

    #[error("world state lock poisoned")]
    Poisoned,

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("World state not initialized at {0}")]
    NotInitialized(String),

    #[error("{0}")]
    Backend(String),
}

/// Errors returned by contract functions.
#[derive(Error, Debug)]
pub enum ContractError {
    #[error("failed to encode reading {id}: {source}")]
    Encoding {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to decode value stored under {key}: {source}")]
    Decoding {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read from world state: {0}")]
    StoreRead(#[source] StoreError),

    #[error("failed to put to world state: {0}")]
    StoreWrite(#[source] StoreError),

    #[error("the reading {0} does not exist")]
    NotFound(String),

    #[error("the reading {0} already exists")]
    AlreadyExists(String),

    #[error("unknown function: {0}")]
    UnknownFunction(String),

    #[error("invalid arguments for {function}: {reason}")]
    InvalidArguments { function: String, reason: String },
}

impl ContractError {
    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Encoding { .. } => "ENCODING_ERROR",
            Self::Decoding { .. } => "CORRUPT_STATE",
            Self::StoreRead(_) | Self::StoreWrite(_) => "STORE_UNAVAILABLE",
            Self::NotFound(_) => "READING_NOT_FOUND",
            Self::AlreadyExists(_) => "READING_EXISTS",
            Self::UnknownFunction(_) => "UNKNOWN_FUNCTION",
            Self::InvalidArguments { .. } => "INVALID_ARGUMENTS",
        }
    }

    pub(crate) fn invalid_arguments(function: &str, reason: impl Into<String>) -> Self {
        Self::InvalidArguments {
            function: function.to_string(),
            reason: reason.into(),
        }
    }
}
