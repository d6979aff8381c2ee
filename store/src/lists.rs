use std::fmt;

use recipe_core::Recipe;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::errors::{StoreError, StoreResult};
use crate::store::StoreRef;

/// The fixed keys the chat persists under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKey {
    /// Recipes whose details were viewed
    History,
    /// Shopping list ingredients
    Shop,
}

impl StoreKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKey::History => "history",
            StoreKey::Shop => "shop",
        }
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed access to the history and shop lists.
///
/// Each list is the whole value of one key: loads read and decode the full
/// string, saves encode and replace it. An absent or blank value is an
/// empty list.
#[derive(Debug, Clone)]
pub struct ListStore {
    store: StoreRef,
}

impl ListStore {
    pub fn new(store: StoreRef) -> Self {
        Self { store }
    }

    pub async fn load_history(&self) -> StoreResult<Vec<Recipe>> {
        self.load(StoreKey::History).await
    }

    pub async fn save_history(&self, history: &[Recipe]) -> StoreResult<()> {
        self.save(StoreKey::History, history).await
    }

    pub async fn load_shop(&self) -> StoreResult<Vec<String>> {
        self.load(StoreKey::Shop).await
    }

    pub async fn save_shop(&self, shop: &[String]) -> StoreResult<()> {
        self.save(StoreKey::Shop, shop).await
    }

    /// Load, append one recipe at the end and rewrite the history list
    pub async fn append_history(&self, recipe: Recipe) -> StoreResult<Vec<Recipe>> {
        let mut history = self.load_history().await?;
        history.push(recipe);
        self.save_history(&history).await?;
        Ok(history)
    }

    async fn load<T: DeserializeOwned>(&self, key: StoreKey) -> StoreResult<Vec<T>> {
        let Some(raw) = self.store.get(key.as_str()).await? else {
            debug!(%key, "No stored list, starting empty");
            return Ok(Vec::new());
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&raw).map_err(|source| StoreError::Decode {
            key: key.as_str().to_string(),
            source,
        })
    }

    async fn save<T: Serialize>(&self, key: StoreKey, items: &[T]) -> StoreResult<()> {
        let raw = serde_json::to_string(items)?;
        self.store.set(key.as_str(), raw).await?;
        debug!(%key, count = items.len(), "Saved list");
        Ok(())
    }
}
