//! Application state management.

use std::sync::{Arc, Mutex};

use tracing::info;

use crate::ledger::{
    ChaincodeStub, ContractError, FjallStub, MemoryStub, ReadingContract, StoreError, transact,
};

use super::config::Config;
use super::error::ApiError;

/// World state handle shared by all requests.
pub type SharedStub = Box<dyn ChaincodeStub + Send>;

/// Shared application state.
///
/// Invocations are serialized through one lock around the world state and
/// each runs over its own write set, so a contract call behaves as one
/// isolated transaction whose writes are kept only if it succeeds.
#[derive(Clone)]
pub struct AppState {
    stub: Arc<Mutex<SharedStub>>,
    contract: ReadingContract,
}

impl AppState {
    /// Create a new AppState from configuration.
    pub fn from_config(config: &Config) -> Result<Self, StateError> {
        let stub: SharedStub = match &config.store.path {
            Some(path) => {
                info!(path = %path, "using persistent world state");
                let stub = FjallStub::open_or_init(path).map_err(|e| StateError::Open {
                    path: path.clone(),
                    source: e,
                })?;
                Box::new(stub)
            }
            None => {
                info!("using in-memory world state");
                Box::new(MemoryStub::new())
            }
        };

        let state = Self::new(stub);
        if config.store.seed {
            state.with_stub(|contract, stub| contract.init_ledger(stub))?;
        }
        Ok(state)
    }

    /// Wrap an already opened world state.
    pub fn new(stub: SharedStub) -> Self {
        Self {
            stub: Arc::new(Mutex::new(stub)),
            contract: ReadingContract,
        }
    }

    /// Run `f` as one transaction against the world state.
    ///
    /// Writes made by `f` are buffered and applied together once it returns
    /// `Ok`; on error the world state is left untouched.
    pub fn with_stub<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&ReadingContract, &dyn ChaincodeStub) -> Result<T, ContractError>,
    {
        let stub = self
            .stub
            .lock()
            .map_err(|_| ApiError::from(ContractError::StoreRead(StoreError::Poisoned)))?;
        let stub: &dyn ChaincodeStub = &**stub;
        Ok(transact(stub, |tx| f(&self.contract, tx))?)
    }
}

/// Errors that can occur when setting up application state.
#[derive(Debug)]
pub enum StateError {
    /// Failed to open or initialize the world state.
    Open { path: String, source: StoreError },
    /// Seeding the ledger at startup failed.
    Seed(ApiError),
}

impl From<ApiError> for StateError {
    fn from(err: ApiError) -> Self {
        StateError::Seed(err)
    }
}

impl std::fmt::Display for StateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StateError::Open { path, source } => {
                write!(f, "Failed to open world state at '{}': {}", path, source)
            }
            StateError::Seed(err) => write!(f, "Failed to seed ledger: {}", err.message),
        }
    }
}

impl std::error::Error for StateError {}
