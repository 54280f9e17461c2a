//! Data types for the reading ledger.

use serde::{Deserialize, Serialize};

/// A single energy reading for one metering cycle.
///
/// The serde attributes pin the JSON field names of the stored value:
/// `ID`, `cycle`, `consumed` and `injected`. Missing fields decode to their
/// zero value and unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Reading {
    /// World state key of the reading.
    #[serde(rename = "ID")]
    pub id: String,

    /// Metering cycle the reading belongs to.
    pub cycle: i64,

    /// Energy consumed during the cycle.
    pub consumed: i64,

    /// Energy injected into the grid during the cycle.
    pub injected: i64,
}

impl Reading {
    /// Create a new reading.
    pub fn new(id: impl Into<String>, cycle: i64, consumed: i64, injected: i64) -> Self {
        Self {
            id: id.into(),
            cycle,
            consumed,
            injected,
        }
    }
}

/// A key/value pair yielded by a world state range query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResult {
    pub key: String,
    pub value: Vec<u8>,
}

impl QueryResult {
    pub fn new(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}
