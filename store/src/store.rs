use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::StoreResult;

/// Opaque asynchronous string-keyed store.
///
/// Callers always hand over fully serialised values; no partial updates or
/// transactions are assumed.
#[async_trait]
pub trait KeyValueStore: Send + Sync + Debug {
    /// Read the value under `key`, `None` when absent
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Replace the value under `key`
    async fn set(&self, key: &str, value: String) -> StoreResult<()>;
}

/// Type alias for Arc-wrapped KeyValueStore trait objects
pub type StoreRef = Arc<dyn KeyValueStore>;
