//! HTTP host for the reading contract.
//!
//! Serves the contract functions over an axum router, both as resource
//! routes (`/api/v1/readings`) and as raw invocations by function name
//! (`/api/v1/invoke/{function}`), against one shared world state.

mod config;
mod error;
mod logging;
mod routes;
mod state;

pub use config::{Config, ConfigError, LogFormat, LoggingConfig, ServerConfig, StoreConfig};
pub use error::ApiError;
pub use logging::{LoggingError, init as init_logging};
pub use routes::router;
pub use state::{AppState, SharedStub, StateError};
