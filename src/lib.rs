//! A ledger contract for energy readings.
//!
//! Each reading records the energy consumed and injected by a meter during
//! one cycle. Readings are stored as JSON in a key-value world state owned by
//! the ledger runtime; the contract only reads and writes single keys (plus
//! one full-range scan) through the [`ChaincodeStub`] it is handed per call.
//!
//! # Quick Start
//!
//! ```ignore
//! use reading_ledger::prelude::*;
//!
//! let stub = MemoryStub::new();
//! let contract = ReadingContract;
//!
//! contract.init_ledger(&stub)?;
//! contract.create_reading(&stub, "meter-1", 2, 14, 3)?;
//!
//! let reading = contract.read_reading(&stub, "meter-1")?;
//! let all = contract.get_all_readings(&stub)?;
//! ```
//!
//! # Modules
//!
//! - [`ledger`] - Reading contract, world state contract and bundled stubs
//! - [`server`] - HTTP host exposing the contract functions (requires `server` feature)
//!
//! # Feature Flags
//!
//! - `kv` - Persistent world state backed by fjall (enabled by default)
//! - `logging` - Enable library-level tracing (consumers provide their own subscriber)
//! - `cli` - Enable the command-line binary
//! - `server` - Enable the HTTP host
//! - `full` - Enable all features

pub mod ledger;
mod logging;
pub mod prelude;
#[cfg(feature = "server")]
pub mod server;

mod error;

// Re-export the unified error type
pub use error::{Error, Result};

// Re-export ledger types at crate root for convenience
#[cfg(feature = "kv")]
pub use ledger::FjallStub;
pub use ledger::{
    ChaincodeStub, ContractError, Invocation, MemoryStub, QueryResult, Reading, ReadingContract,
    Response, ScopedRange, StateQueryIterator, StoreError, WriteSet, transact,
};
