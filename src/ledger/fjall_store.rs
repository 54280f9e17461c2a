//! Persistent world state backed by fjall.

use std::collections::BTreeMap;
use std::path::Path;

use fjall::{Keyspace, KeyspaceCreateOptions, PersistMode};

use crate::logging::{debug, error, info, trace};

use super::error::StoreError;
use super::stub::{ChaincodeStub, StateQueryIterator};
use super::types::QueryResult;

/// Keyspace holding the store version marker.
const META_KEYSPACE: &str = "_meta";
const META_VERSION_KEY: &str = "version";

/// Keyspace holding the contract's keys and values.
const STATE_KEYSPACE: &str = "world_state";

/// On-disk layout version.
///
/// Bump this when the layout changes; opening a store written with a
/// different version fails.
const STORE_VERSION: u32 = 1;

/// A world state persisted in a fjall database directory.
///
/// Writes are synced to disk before [`put_state`](ChaincodeStub::put_state)
/// returns.
///
/// ```ignore
/// use reading_ledger::{FjallStub, ReadingContract};
///
/// let stub = FjallStub::init(".reading-ledger")?;
/// ReadingContract.init_ledger(&stub)?;
/// ```
pub struct FjallStub {
    db: fjall::Database,
    state: Keyspace,
}

impl FjallStub {
    /// Open an existing world state.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening world state");

        if !path.exists() {
            error!(path = %path.display(), "world state path does not exist");
            return Err(StoreError::NotInitialized(path.display().to_string()));
        }

        let db = fjall::Database::builder(path).open()?;
        let meta = db.keyspace(META_KEYSPACE, KeyspaceCreateOptions::default)?;

        let Some(marker) = meta.get(META_VERSION_KEY)? else {
            error!(path = %path.display(), "world state not initialized - no version marker");
            return Err(StoreError::NotInitialized(path.display().to_string()));
        };
        let version = u32::from_le_bytes(
            marker
                .as_ref()
                .try_into()
                .map_err(|_| StoreError::InvalidFormat("Invalid version marker".to_string()))?,
        );
        if version != STORE_VERSION {
            error!(
                stored_version = version,
                expected_version = STORE_VERSION,
                "world state version mismatch"
            );
            return Err(StoreError::InvalidFormat(format!(
                "Store version mismatch: expected {}, got {}",
                STORE_VERSION, version
            )));
        }

        let state = db.keyspace(STATE_KEYSPACE, KeyspaceCreateOptions::default)?;
        info!(path = %path.display(), "world state opened");
        Ok(Self { db, state })
    }

    /// Create (or reinitialize) a world state at the given path.
    ///
    /// Existing keys are kept; only the version marker is rewritten.
    pub fn init(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "initializing world state");

        let db = fjall::Database::builder(path).open()?;
        let meta = db.keyspace(META_KEYSPACE, KeyspaceCreateOptions::default)?;
        meta.insert(META_VERSION_KEY, STORE_VERSION.to_le_bytes())?;
        let state = db.keyspace(STATE_KEYSPACE, KeyspaceCreateOptions::default)?;
        db.persist(PersistMode::SyncAll)?;

        info!(path = %path.display(), version = STORE_VERSION, "world state initialized");
        Ok(Self { db, state })
    }

    /// Open the world state at `path`, initializing it if the path is new.
    pub fn open_or_init(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if path.exists() {
            Self::open(path)
        } else {
            Self::init(path)
        }
    }
}

impl ChaincodeStub for FjallStub {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        trace!(key = key, "get state");
        Ok(self.state.get(key)?.map(|v| v.to_vec()))
    }

    fn put_state(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        if key.is_empty() {
            return Err(StoreError::EmptyKey);
        }
        trace!(key = key, bytes = value.len(), "put state");
        self.state.insert(key, value)?;
        self.db.persist(PersistMode::SyncAll)?;
        Ok(())
    }

    fn put_states(&self, writes: &BTreeMap<String, Vec<u8>>) -> Result<(), StoreError> {
        if writes.contains_key("") {
            return Err(StoreError::EmptyKey);
        }
        let mut batch = self.db.batch().durability(Some(PersistMode::SyncAll));
        for (key, value) in writes {
            batch.insert(&self.state, key.as_str(), value.as_slice());
        }
        batch.commit()?;
        trace!(count = writes.len(), "batch written");
        Ok(())
    }

    fn get_state_by_range(
        &self,
        start: &str,
        end: &str,
    ) -> Result<Box<dyn StateQueryIterator + '_>, StoreError> {
        let iter: Box<dyn Iterator<Item = _> + '_> = match (start.is_empty(), end.is_empty()) {
            (true, true) => Box::new(self.state.prefix("")),
            (false, true) => Box::new(self.state.range(start..)),
            (true, false) => Box::new(self.state.range(..end)),
            (false, false) => Box::new(self.state.range(start..end)),
        };
        let entries = iter.map(|kv| -> Result<QueryResult, StoreError> {
            let (key, value) = kv.into_inner()?;
            let key = String::from_utf8(key.to_vec())
                .map_err(|e| StoreError::InvalidFormat(format!("Non UTF-8 key: {}", e)))?;
            Ok(QueryResult::new(key, value.to_vec()))
        });
        trace!(start = start, end = end, "range iterator opened");

        Ok(Box::new(FjallRangeIterator {
            entries: Some(Box::new(entries)),
        }))
    }
}

type EntryIter<'a> = Box<dyn Iterator<Item = Result<QueryResult, StoreError>> + 'a>;

/// Walks the key-value pairs of a range as fjall yields them.
struct FjallRangeIterator<'a> {
    entries: Option<EntryIter<'a>>,
}

impl Iterator for FjallRangeIterator<'_> {
    type Item = Result<QueryResult, StoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.as_mut()?.next()
    }
}

impl StateQueryIterator for FjallRangeIterator<'_> {
    fn close(&mut self) -> Result<(), StoreError> {
        if self.entries.take().is_some() {
            trace!("fjall range iterator released");
        }
        Ok(())
    }
}
