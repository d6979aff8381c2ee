//! Deterministic collaborators for session and view tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use recipe_core::{Recipe, RecipeDetails, RecipeError, RecipeResult, RecipeService};
use recipe_store::{InMemoryStore, KeyValueStore, ListStore, StoreError, StoreRef, StoreResult};

/// RecipeService answering from fixed tables. Unknown queries and ids fail.
#[derive(Debug, Default)]
pub struct FakeRecipeService {
    searches: Mutex<HashMap<String, Vec<Recipe>>>,
    details: Mutex<HashMap<i64, RecipeDetails>>,
    calls: Mutex<Vec<String>>,
}

impl FakeRecipeService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(self, query: &str, recipes: Vec<Recipe>) -> Self {
        self.searches
            .lock()
            .unwrap()
            .insert(query.to_string(), recipes);
        self
    }

    pub fn with_details(self, details: RecipeDetails) -> Self {
        self.details.lock().unwrap().insert(details.id, details);
        self
    }

    /// Every call made so far, as `search:<query>` or `details:<id>`
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecipeService for FakeRecipeService {
    async fn search(&self, query: &str) -> RecipeResult<Vec<Recipe>> {
        self.calls.lock().unwrap().push(format!("search:{}", query));
        self.searches
            .lock()
            .unwrap()
            .get(query)
            .cloned()
            .ok_or_else(|| RecipeError::Network("connection refused".to_string()))
    }

    async fn fetch_details(&self, id: i64) -> RecipeResult<RecipeDetails> {
        self.calls.lock().unwrap().push(format!("details:{}", id));
        self.details
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| RecipeError::Decode("missing field `extendedIngredients`".to_string()))
    }
}

/// Store whose writes can be switched to fail; counts every write
#[derive(Debug, Default)]
pub struct FlakyStore {
    inner: InMemoryStore,
    fail_writes: Mutex<bool>,
    writes: Mutex<Vec<(String, String)>>,
}

impl FlakyStore {
    pub fn new(inner: InMemoryStore) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    pub fn fail_writes(&self, fail: bool) {
        *self.fail_writes.lock().unwrap() = fail;
    }

    pub fn writes(&self) -> Vec<(String, String)> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl KeyValueStore for FlakyStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: String) -> StoreResult<()> {
        if *self.fail_writes.lock().unwrap() {
            return Err(StoreError::Io(std::io::Error::other("disk full")));
        }
        self.writes
            .lock()
            .unwrap()
            .push((key.to_string(), value.clone()));
        self.inner.set(key, value).await
    }
}

/// A FlakyStore seeded with `values`, as both the concrete handle and a ListStore
pub fn flaky_lists(values: Vec<(&str, &str)>) -> (Arc<FlakyStore>, ListStore) {
    let store = Arc::new(FlakyStore::new(InMemoryStore::with_values(values)));
    let store_ref: StoreRef = store.clone();
    (store, ListStore::new(store_ref))
}

pub fn details(id: i64, title: &str, ingredients: &[&str], instructions: &str) -> RecipeDetails {
    RecipeDetails {
        id,
        title: title.to_string(),
        ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
        instructions: Some(instructions.to_string()),
    }
}
