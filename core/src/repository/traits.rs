use serde_json::Value;

use crate::error::StoreResult;

/// Simple key-value persistence.
pub trait KeyValueStore {
    /// Returns `None` when nothing is stored under `key`.
    fn load(&self, key: &str) -> StoreResult<Option<Value>>;
    fn save(&self, key: &str, value: &Value) -> StoreResult<()>;
    fn remove(&self, key: &str) -> StoreResult<()>;
}
