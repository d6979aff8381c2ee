use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use tracing::debug;

use crate::errors::{StoreError, StoreResult};
use crate::store::KeyValueStore;

/// In-memory implementation of KeyValueStore
#[derive(Debug, Default)]
pub struct InMemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store with existing values
    pub fn with_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: RwLock::new(
                values
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let values = self
            .values
            .read()
            .map_err(|e| StoreError::Lock(format!("Failed to acquire read lock: {}", e)))?;
        Ok(values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> StoreResult<()> {
        let mut values = self
            .values
            .write()
            .map_err(|e| StoreError::Lock(format!("Failed to acquire write lock: {}", e)))?;
        debug!(key, bytes = value.len(), "Stored value in memory");
        values.insert(key.to_string(), value);
        Ok(())
    }
}
