use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A pending or recorded transaction.
///
/// The payload is opaque at this layer: any JSON value is accepted and
/// carried into a block untouched. Semantic validation belongs upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transaction(Value);

impl Transaction {
    pub fn new(payload: Value) -> Self {
        Self(payload)
    }

    pub fn payload(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for Transaction {
    fn from(payload: Value) -> Self {
        Self(payload)
    }
}
