//! The reading contract: seeding, creating and querying readings.

use crate::logging::{debug, error, info};

use super::error::ContractError;
use super::format::{decode_reading, encode_reading};
use super::stub::{ChaincodeStub, ScopedRange};
use super::types::Reading;

/// Contract functions over a world state.
///
/// The contract is stateless. Every function borrows the stub of the
/// transaction it runs in, so the same value can serve any number of
/// transactions.
///
/// ```ignore
/// use reading_ledger::{MemoryStub, ReadingContract};
///
/// let stub = MemoryStub::new();
/// let contract = ReadingContract;
///
/// contract.create_reading(&stub, "meter-1", 3, 12, 4)?;
/// assert!(contract.reading_exists(&stub, "meter-1")?);
/// let reading = contract.read_reading(&stub, "meter-1")?;
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadingContract;

impl ReadingContract {
    /// Readings written by [`init_ledger`](Self::init_ledger).
    pub fn seed_readings() -> [Reading; 2] {
        [
            Reading::new("reading1", 1, 5, 10),
            Reading::new("reading2", 1, 20, 5),
        ]
    }

    /// Write the seed readings, replacing any readings stored under the
    /// same IDs.
    pub fn init_ledger<S>(&self, stub: &S) -> Result<(), ContractError>
    where
        S: ChaincodeStub + ?Sized,
    {
        for reading in Self::seed_readings() {
            let bytes = encode_reading(&reading)?;
            stub.put_state(&reading.id, &bytes).map_err(|e| {
                error!(id = %reading.id, error = %e, "failed to write seed reading");
                ContractError::StoreWrite(e)
            })?;
        }

        info!("ledger initialized with seed readings");
        Ok(())
    }

    /// Store a new reading. Fails if a reading with `id` already exists.
    pub fn create_reading<S>(
        &self,
        stub: &S,
        id: &str,
        cycle: i64,
        consumed: i64,
        injected: i64,
    ) -> Result<Reading, ContractError>
    where
        S: ChaincodeStub + ?Sized,
    {
        if self.reading_exists(stub, id)? {
            debug!(id = id, "reading already exists");
            return Err(ContractError::AlreadyExists(id.to_string()));
        }

        let reading = Reading::new(id, cycle, consumed, injected);
        let bytes = encode_reading(&reading)?;
        stub.put_state(id, &bytes).map_err(ContractError::StoreWrite)?;

        info!(id = id, cycle = cycle, "reading created");
        Ok(reading)
    }

    /// Load the reading stored under `id`.
    pub fn read_reading<S>(&self, stub: &S, id: &str) -> Result<Reading, ContractError>
    where
        S: ChaincodeStub + ?Sized,
    {
        let bytes = stub
            .get_state(id)
            .map_err(ContractError::StoreRead)?
            .ok_or_else(|| ContractError::NotFound(id.to_string()))?;

        decode_reading(id, &bytes)
    }

    /// Load every reading in the world state, in the store's iteration order.
    pub fn get_all_readings<S>(&self, stub: &S) -> Result<Vec<Reading>, ContractError>
    where
        S: ChaincodeStub + ?Sized,
    {
        let results = ScopedRange::new(
            stub.get_state_by_range("", "").map_err(ContractError::StoreRead)?,
        );

        let mut readings = Vec::new();
        for result in results {
            let result = result.map_err(ContractError::StoreRead)?;
            readings.push(decode_reading(&result.key, &result.value)?);
        }

        debug!(count = readings.len(), "loaded all readings");
        Ok(readings)
    }

    /// Check whether a reading is stored under `id`.
    pub fn reading_exists<S>(&self, stub: &S, id: &str) -> Result<bool, ContractError>
    where
        S: ChaincodeStub + ?Sized,
    {
        let bytes = stub.get_state(id).map_err(ContractError::StoreRead)?;
        Ok(bytes.is_some())
    }
}
