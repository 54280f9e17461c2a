//! World state access as exposed by the ledger runtime.
//!
//! A [`ChaincodeStub`] is the per-transaction handle the runtime hands to a
//! contract function. Contract code never owns the store; it borrows a stub
//! for the duration of one call.

use crate::logging::{trace, warn};

use std::collections::BTreeMap;

use super::error::StoreError;
use super::types::QueryResult;

/// A closable iterator over the results of a range query.
///
/// Implementations must make [`close`](Self::close) idempotent and must stop
/// yielding items once closed.
pub trait StateQueryIterator: Iterator<Item = Result<QueryResult, StoreError>> {
    /// Release the resources held by the query.
    fn close(&mut self) -> Result<(), StoreError>;
}

/// Key-value access to the world state.
pub trait ChaincodeStub {
    /// Get the value stored under `key`, or `None` if the key is absent.
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// Empty keys are rejected with [`StoreError::EmptyKey`].
    fn put_state(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;

    /// Write every entry of `writes`, or none of them if any write fails.
    fn put_states(&self, writes: &BTreeMap<String, Vec<u8>>) -> Result<(), StoreError>;

    /// Iterate the keys in `[start, end)`.
    ///
    /// An empty `start` or `end` leaves that side of the range unbounded, so
    /// `get_state_by_range("", "")` walks the whole world state.
    fn get_state_by_range(
        &self,
        start: &str,
        end: &str,
    ) -> Result<Box<dyn StateQueryIterator + '_>, StoreError>;
}

impl<S: ChaincodeStub + ?Sized> ChaincodeStub for &S {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get_state(key)
    }

    fn put_state(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        (**self).put_state(key, value)
    }

    fn put_states(&self, writes: &BTreeMap<String, Vec<u8>>) -> Result<(), StoreError> {
        (**self).put_states(writes)
    }

    fn get_state_by_range(
        &self,
        start: &str,
        end: &str,
    ) -> Result<Box<dyn StateQueryIterator + '_>, StoreError> {
        (**self).get_state_by_range(start, end)
    }
}

/// Owns a range query iterator and closes it when dropped.
///
/// Close failures on drop are logged and otherwise ignored; by then the
/// caller has either consumed the results or is already returning an error.
pub struct ScopedRange<'a> {
    inner: Box<dyn StateQueryIterator + 'a>,
}

impl<'a> ScopedRange<'a> {
    pub fn new(inner: Box<dyn StateQueryIterator + 'a>) -> Self {
        Self { inner }
    }
}

impl Iterator for ScopedRange<'_> {
    type Item = Result<QueryResult, StoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

impl Drop for ScopedRange<'_> {
    fn drop(&mut self) {
        match self.inner.close() {
            Ok(()) => {
                trace!("range iterator closed");
            }
            Err(_e) => {
                warn!(error = %_e, "failed to close range iterator");
            }
        }
    }
}

/// Check whether `key` falls inside the `[start, end)` range, where an empty
/// bound means unbounded.
pub(crate) fn in_range(key: &str, start: &str, end: &str) -> bool {
    (start.is_empty() || key >= start) && (end.is_empty() || key < end)
}
