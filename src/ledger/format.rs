//! JSON encoding of readings as stored in the world state.

use serde_json::{Map, Value};

use super::error::ContractError;
use super::types::Reading;

/// JSON field names of a stored reading.
const FIELDS: [&str; 4] = ["ID", "cycle", "consumed", "injected"];

/// Serialize a reading into the bytes written under its key.
pub fn encode_reading(reading: &Reading) -> Result<Vec<u8>, ContractError> {
    serde_json::to_vec(reading).map_err(|source| ContractError::Encoding {
        id: reading.id.clone(),
        source,
    })
}

/// Deserialize the bytes stored under `key`.
///
/// Field names match case-insensitively (`"id"` fills `ID`); when a value
/// carries both an exact and a differently cased name, the exact one wins.
pub fn decode_reading(key: &str, bytes: &[u8]) -> Result<Reading, ContractError> {
    let decoding = |source: serde_json::Error| ContractError::Decoding {
        key: key.to_string(),
        source,
    };
    let value: Value = serde_json::from_slice(bytes).map_err(decoding)?;
    serde_json::from_value(fold_field_names(value)).map_err(decoding)
}

fn fold_field_names(value: Value) -> Value {
    let Value::Object(fields) = value else {
        return value;
    };

    let (exact, other): (Vec<_>, Vec<_>) = fields
        .into_iter()
        .partition(|(name, _)| FIELDS.contains(&name.as_str()));

    let mut folded = Map::new();
    for (name, value) in other {
        if let Some(field) = FIELDS.iter().find(|field| field.eq_ignore_ascii_case(&name)) {
            folded.insert((*field).to_string(), value);
        }
    }
    folded.extend(exact);
    Value::Object(folded)
}
