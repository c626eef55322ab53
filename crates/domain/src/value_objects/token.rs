//! Token records pushed by the DM's client.

use serde::{Deserialize, Serialize};

/// One opaque token record from the DM's token snapshot.
///
/// The coordinator never interprets the payload. It stores the latest full
/// snapshot and forwards it as-is; there are no merge semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenRecord(serde_json::Value);

impl TokenRecord {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}

impl From<serde_json::Value> for TokenRecord {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}
