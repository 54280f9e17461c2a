//! The reading contract and the world state it runs against.
//!
//! Readings are stored as JSON under their ID. Contract functions receive
//! the world state as a [`ChaincodeStub`] for each call; the crate ships an
//! in-memory stub and, with the `kv` feature, a persistent one backed by
//! fjall. [`transact`] runs a call over a [`WriteSet`] so that its writes
//! reach the world state together or not at all.

mod contract;
mod error;
#[cfg(feature = "kv")]
mod fjall_store;
mod format;
mod invoke;
mod memory;
mod stub;
mod transaction;
mod types;

pub use contract::ReadingContract;
pub use error::{ContractError, StoreError};
#[cfg(feature = "kv")]
pub use fjall_store::FjallStub;
pub use format::{decode_reading, encode_reading};
pub use invoke::{Invocation, Response};
pub use memory::MemoryStub;
pub use stub::{ChaincodeStub, ScopedRange, StateQueryIterator};
pub use transaction::{WriteSet, transact};
pub use types::{QueryResult, Reading};
