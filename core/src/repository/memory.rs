use std::cell::RefCell;
use std::collections::HashMap;

use serde_json::Value;

use crate::error::StoreResult;
use crate::repository::traits::KeyValueStore;

/// Volatile store, used by tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.values.borrow().keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> StoreResult<Option<Value>> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn save(&self, key: &str, value: &Value) -> StoreResult<()> {
        self.values.borrow_mut().insert(key.to_string(), value.clone());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.values.borrow_mut().remove(key);
        Ok(())
    }
}
