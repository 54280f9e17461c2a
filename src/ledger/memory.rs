//! In-memory world state.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use crate::logging::trace;

use super::error::StoreError;
use super::stub::{ChaincodeStub, StateQueryIterator, in_range};
use super::types::QueryResult;

/// A world state held in a `BTreeMap`, iterated in ascending key order.
///
/// Used by tests and by hosts that do not need persistence. The stub keeps a
/// count of range iterators that have been handed out and not yet closed.
#[derive(Debug, Default)]
pub struct MemoryStub {
    state: RwLock<BTreeMap<String, Vec<u8>>>,
    open_iterators: Arc<AtomicUsize>,
}

impl MemoryStub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of range iterators currently open.
    pub fn open_iterators(&self) -> usize {
        self.open_iterators.load(Ordering::SeqCst)
    }

    /// Number of keys in the world state.
    pub fn len(&self) -> usize {
        self.state.read().map(|state| state.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ChaincodeStub for MemoryStub {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let state = self.state.read().map_err(|_| StoreError::Poisoned)?;
        Ok(state.get(key).cloned())
    }

    fn put_state(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        if key.is_empty() {
            return Err(StoreError::EmptyKey);
        }
        let mut state = self.state.write().map_err(|_| StoreError::Poisoned)?;
        state.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn put_states(&self, writes: &BTreeMap<String, Vec<u8>>) -> Result<(), StoreError> {
        if writes.contains_key("") {
            return Err(StoreError::EmptyKey);
        }
        let mut state = self.state.write().map_err(|_| StoreError::Poisoned)?;
        state.extend(writes.iter().map(|(key, value)| (key.clone(), value.clone())));
        Ok(())
    }

    fn get_state_by_range(
        &self,
        start: &str,
        end: &str,
    ) -> Result<Box<dyn StateQueryIterator + '_>, StoreError> {
        let state = self.state.read().map_err(|_| StoreError::Poisoned)?;
        let snapshot: Vec<QueryResult> = state
            .iter()
            .filter(|(key, _)| in_range(key, start, end))
            .map(|(key, value)| QueryResult::new(key.as_str(), value.as_slice()))
            .collect();

        self.open_iterators.fetch_add(1, Ordering::SeqCst);
        trace!(start = start, end = end, count = snapshot.len(), "range iterator opened");

        Ok(Box::new(SnapshotIterator {
            entries: snapshot.into_iter(),
            open: Some(Arc::clone(&self.open_iterators)),
        }))
    }
}

/// Iterator over a copy of the entries taken when the query was issued.
struct SnapshotIterator {
    entries: std::vec::IntoIter<QueryResult>,
    open: Option<Arc<AtomicUsize>>,
}

impl Iterator for SnapshotIterator {
    type Item = Result<QueryResult, StoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.open.as_ref()?;
        self.entries.next().map(Ok)
    }
}

impl StateQueryIterator for SnapshotIterator {
    fn close(&mut self) -> Result<(), StoreError> {
        if let Some(open) = self.open.take() {
            open.fetch_sub(1, Ordering::SeqCst);
        }
        Ok(())
    }
}
