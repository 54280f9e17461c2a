//! Unified error type for the reading-ledger library.
//!
//! [`Error`] wraps the module-specific errors so application code (the CLI,
//! embedding hosts) can use one error type throughout.

use thiserror::Error;

use crate::ledger::{ContractError, StoreError};

/// Unified error type for all reading-ledger operations.
///
/// ```ignore
/// use reading_ledger::{FjallStub, ReadingContract, Result};
///
/// fn seed(path: &str) -> Result<()> {
///     let stub = FjallStub::open(path)?;
///     ReadingContract.init_ledger(&stub)?;
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// A contract function failed.
    #[error(transparent)]
    Contract(#[from] ContractError),

    /// The world state could not be opened or accessed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// JSON (de)serialization outside of the contract, e.g. output rendering.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A [`Result`] type alias using the unified [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns `true` if this is a contract error.
    pub fn is_contract(&self) -> bool {
        matches!(self, Self::Contract(_))
    }

    /// Returns `true` if the world state itself failed.
    pub fn is_store(&self) -> bool {
        matches!(
            self,
            Self::Store(_) | Self::Contract(ContractError::StoreRead(_) | ContractError::StoreWrite(_))
        )
    }

    /// Returns `true` if a reading that was asked for does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Contract(ContractError::NotFound(_)))
    }
}
