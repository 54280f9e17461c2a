//! Buffered writes for running one contract call as a transaction.
//!
//! A [`WriteSet`] wraps the world state for the duration of a call. Writes
//! land in a buffer that later reads in the same call observe, and nothing
//! reaches the world state until [`WriteSet::commit`]. Dropping the write set
//! instead discards every write made during the call.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::iter::Peekable;
use std::sync::RwLock;

use crate::logging::{debug, trace};

use super::error::{ContractError, StoreError};
use super::stub::{ChaincodeStub, StateQueryIterator, in_range};
use super::types::QueryResult;

/// Pending writes layered over a world state.
///
/// ```ignore
/// use reading_ledger::{MemoryStub, ReadingContract, WriteSet};
///
/// let stub = MemoryStub::new();
/// let tx = WriteSet::new(&stub);
/// ReadingContract.init_ledger(&tx)?;
/// tx.commit()?;
/// ```
#[derive(Debug)]
pub struct WriteSet<S> {
    backing: S,
    writes: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl<S: ChaincodeStub> WriteSet<S> {
    pub fn new(backing: S) -> Self {
        Self {
            backing,
            writes: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of keys written and not yet committed.
    pub fn pending(&self) -> usize {
        self.writes.read().map(|writes| writes.len()).unwrap_or(0)
    }

    /// Apply the buffered writes to the world state in one
    /// [`put_states`](ChaincodeStub::put_states) call.
    pub fn commit(self) -> Result<usize, StoreError> {
        let writes = self.writes.into_inner().map_err(|_| StoreError::Poisoned)?;
        let count = writes.len();
        if count > 0 {
            self.backing.put_states(&writes)?;
        }
        debug!(writes = count, "transaction committed");
        Ok(count)
    }
}

impl<S: ChaincodeStub> ChaincodeStub for WriteSet<S> {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let writes = self.writes.read().map_err(|_| StoreError::Poisoned)?;
        match writes.get(key) {
            Some(value) => Ok(Some(value.clone())),
            None => self.backing.get_state(key),
        }
    }

    fn put_state(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        if key.is_empty() {
            return Err(StoreError::EmptyKey);
        }
        let mut writes = self.writes.write().map_err(|_| StoreError::Poisoned)?;
        writes.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn put_states(&self, batch: &BTreeMap<String, Vec<u8>>) -> Result<(), StoreError> {
        if batch.contains_key("") {
            return Err(StoreError::EmptyKey);
        }
        let mut writes = self.writes.write().map_err(|_| StoreError::Poisoned)?;
        writes.extend(batch.iter().map(|(key, value)| (key.clone(), value.clone())));
        Ok(())
    }

    fn get_state_by_range(
        &self,
        start: &str,
        end: &str,
    ) -> Result<Box<dyn StateQueryIterator + '_>, StoreError> {
        let buffered: Vec<QueryResult> = {
            let writes = self.writes.read().map_err(|_| StoreError::Poisoned)?;
            writes
                .iter()
                .filter(|(key, _)| in_range(key, start, end))
                .map(|(key, value)| QueryResult::new(key.as_str(), value.as_slice()))
                .collect()
        };
        let backing = self.backing.get_state_by_range(start, end)?;
        trace!(start = start, end = end, buffered = buffered.len(), "merged range opened");

        Ok(Box::new(MergedRange {
            backing,
            peeked: None,
            buffered: buffered.into_iter().peekable(),
            closed: false,
        }))
    }
}

/// Run `f` against a fresh write set over `stub` and commit its writes only
/// if it succeeds.
pub fn transact<'s, S, T, F>(stub: &'s S, f: F) -> Result<T, ContractError>
where
    S: ChaincodeStub + ?Sized,
    F: FnOnce(&WriteSet<&'s S>) -> Result<T, ContractError>,
{
    let tx = WriteSet::new(stub);
    match f(&tx) {
        Ok(value) => {
            tx.commit().map_err(ContractError::StoreWrite)?;
            Ok(value)
        }
        Err(e) => {
            debug!(discarded = tx.pending(), "transaction rolled back");
            Err(e)
        }
    }
}

/// Ascending merge of a backing range with the buffered writes in the same
/// range. A buffered write replaces the backing entry under the same key.
struct MergedRange<'a> {
    backing: Box<dyn StateQueryIterator + 'a>,
    peeked: Option<QueryResult>,
    buffered: Peekable<std::vec::IntoIter<QueryResult>>,
    closed: bool,
}

impl Iterator for MergedRange<'_> {
    type Item = Result<QueryResult, StoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.closed {
            return None;
        }
        if self.peeked.is_none() {
            match self.backing.next() {
                Some(Ok(result)) => self.peeked = Some(result),
                Some(Err(e)) => return Some(Err(e)),
                None => {}
            }
        }

        let order = match (&self.peeked, self.buffered.peek()) {
            (None, None) => return None,
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (Some(stored), Some(written)) => stored.key.cmp(&written.key),
        };
        match order {
            Ordering::Less => self.peeked.take().map(Ok),
            Ordering::Equal => {
                self.peeked = None;
                self.buffered.next().map(Ok)
            }
            Ordering::Greater => self.buffered.next().map(Ok),
        }
    }
}

impl StateQueryIterator for MergedRange<'_> {
    fn close(&mut self) -> Result<(), StoreError> {
        self.closed = true;
        self.peeked = None;
        self.backing.close()
    }
}
