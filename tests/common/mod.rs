//! Common test utilities and fixtures.
//!
//! This module provides a world state with injectable failures and, with the
//! `server` feature, a test application wrapping the HTTP router.

#![allow(dead_code)]

use std::collections::BTreeMap;

use reading_ledger::{ChaincodeStub, MemoryStub, QueryResult, StateQueryIterator, StoreError};

// =============================================================================
// Fixtures
// =============================================================================

/// Stored bytes that are not valid reading JSON.
pub const MALFORMED_JSON: &[u8] = b"{\"ID\": \"broken\", \"cycle\": ";

/// Expected seed readings as `(id, cycle, consumed, injected)`.
pub const SEED_READINGS: [(&str, i64, i64, i64); 2] =
    [("reading1", 1, 5, 10), ("reading2", 1, 20, 5)];

// =============================================================================
// Faulty World State
// =============================================================================

/// A [`MemoryStub`] whose operations can be made to fail.
#[derive(Default)]
pub struct FaultyStub {
    pub inner: MemoryStub,
    pub fail_get: bool,
    pub fail_put: bool,
    /// Refuse writes to this key only.
    pub fail_put_key: Option<String>,
    pub fail_range: bool,
    /// Yield an error instead of the item at this position.
    pub fail_item_at: Option<usize>,
}

impl FaultyStub {
    pub fn new() -> Self {
        Self::default()
    }

    fn injected(operation: &str) -> StoreError {
        StoreError::Backend(format!("injected {} failure", operation))
    }

    fn refuses(&self, key: &str) -> bool {
        self.fail_put || self.fail_put_key.as_deref() == Some(key)
    }
}

impl ChaincodeStub for FaultyStub {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        if self.fail_get {
            return Err(Self::injected("get"));
        }
        self.inner.get_state(key)
    }

    fn put_state(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        if self.refuses(key) {
            return Err(Self::injected("put"));
        }
        self.inner.put_state(key, value)
    }

    fn put_states(&self, writes: &BTreeMap<String, Vec<u8>>) -> Result<(), StoreError> {
        if writes.keys().any(|key| self.refuses(key)) {
            return Err(Self::injected("put"));
        }
        self.inner.put_states(writes)
    }

    fn get_state_by_range(
        &self,
        start: &str,
        end: &str,
    ) -> Result<Box<dyn StateQueryIterator + '_>, StoreError> {
        if self.fail_range {
            return Err(Self::injected("range"));
        }
        Ok(Box::new(FaultyIterator {
            inner: self.inner.get_state_by_range(start, end)?,
            position: 0,
            fail_at: self.fail_item_at,
        }))
    }
}

struct FaultyIterator<'a> {
    inner: Box<dyn StateQueryIterator + 'a>,
    position: usize,
    fail_at: Option<usize>,
}

impl Iterator for FaultyIterator<'_> {
    type Item = Result<QueryResult, StoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        let position = self.position;
        self.position += 1;
        if self.fail_at == Some(position) {
            return Some(Err(FaultyStub::injected("iteration")));
        }
        self.inner.next()
    }
}

impl StateQueryIterator for FaultyIterator<'_> {
    fn close(&mut self) -> Result<(), StoreError> {
        self.inner.close()
    }
}

// =============================================================================
// Test Application
// =============================================================================

#[cfg(feature = "server")]
pub use app::TestApp;

#[cfg(feature = "server")]
mod app {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use tempfile::TempDir;

    use reading_ledger::server::{
        AppState, Config, LoggingConfig, ServerConfig, StoreConfig, router,
    };

    /// Test application wrapping the router around a fresh world state.
    pub struct TestApp {
        pub server: TestServer,
        _temp_dir: Option<TempDir>, // Keep alive for test duration
    }

    impl TestApp {
        /// Create a test application with an empty in-memory world state.
        pub fn new() -> anyhow::Result<Self> {
            Self::build(StoreConfig::default(), None)
        }

        /// Create a test application whose world state is already seeded.
        pub fn seeded() -> anyhow::Result<Self> {
            Self::build(
                StoreConfig {
                    path: None,
                    seed: true,
                },
                None,
            )
        }

        /// Create a test application backed by a fjall world state in a
        /// temporary directory.
        pub fn persistent() -> anyhow::Result<Self> {
            let temp_dir = TempDir::new()?;
            let path = temp_dir.path().join("world-state");
            Self::build(
                StoreConfig {
                    path: Some(path.to_string_lossy().into()),
                    seed: false,
                },
                Some(temp_dir),
            )
        }

        fn build(store: StoreConfig, temp_dir: Option<TempDir>) -> anyhow::Result<Self> {
            let config = Config {
                server: ServerConfig {
                    bind: "127.0.0.1".into(),
                    port: 0,
                },
                store,
                logging: LoggingConfig::default(),
            };
            let state = AppState::from_config(&config)?;
            let server = TestServer::new(router(state))?;
            Ok(Self {
                server,
                _temp_dir: temp_dir,
            })
        }

        /// Create a reading through the resource route.
        pub async fn create_reading(
            &self,
            id: &str,
            cycle: i64,
            consumed: i64,
            injected: i64,
        ) -> anyhow::Result<()> {
            self.server
                .post("/api/v1/readings")
                .json(&serde_json::json!({
                    "ID": id,
                    "cycle": cycle,
                    "consumed": consumed,
                    "injected": injected,
                }))
                .await
                .assert_status(StatusCode::CREATED);
            Ok(())
        }
    }
}
