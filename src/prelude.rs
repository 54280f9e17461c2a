//! Convenient re-exports for common usage patterns.
//!
//! ```ignore
//! use reading_ledger::prelude::*;
//!
//! let stub = FjallStub::open(".reading-ledger")?;
//! let readings = ReadingContract.get_all_readings(&stub)?;
//! ```

// Unified error handling
pub use crate::error::{Error, Result};

// Contract and world state
#[cfg(feature = "kv")]
pub use crate::ledger::FjallStub;
pub use crate::ledger::{
    ChaincodeStub, ContractError, Invocation, MemoryStub, Reading, ReadingContract, Response,
    StateQueryIterator, StoreError, WriteSet, transact,
};
