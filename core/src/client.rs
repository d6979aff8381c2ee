use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::config::RecipeConfig;
use crate::errors::{RecipeError, RecipeResult};
use crate::types::*;

pub const DEFAULT_BASE_URL: &str = "https://api.spoonacular.com";

/// Remote recipe search and detail lookup
#[async_trait]
pub trait RecipeService: Send + Sync + Debug {
    /// Search recipes matching a free-text query
    async fn search(&self, query: &str) -> RecipeResult<Vec<Recipe>>;

    /// Fetch ingredients and instructions for one recipe
    async fn fetch_details(&self, id: i64) -> RecipeResult<RecipeDetails>;
}

/// Type alias for Arc-wrapped RecipeService trait objects
pub type RecipeServiceRef = Arc<dyn RecipeService>;

/// Client for the Spoonacular recipe API
#[derive(Debug, Clone)]
pub struct SpoonacularClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SpoonacularClient {
    /// Create a new client, failing when no API key is configured
    pub fn new(config: &RecipeConfig) -> RecipeResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                RecipeError::Config(
                    "API key is required to initialize the recipe client".to_string(),
                )
            })?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn search_url(&self) -> String {
        format!("{}/recipes/complexSearch", self.base_url)
    }

    fn information_url(&self, id: i64) -> String {
        format!("{}/recipes/{}/information", self.base_url, id)
    }

    /// Send a GET request and decode the JSON body
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> RecipeResult<T> {
        let response = self
            .client
            .get(url)
            .query(query)
            .query(&[("apiKey", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| RecipeError::Network(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.map_err(|e| {
                RecipeError::Network(format!("Failed to read error response: {}", e))
            })?;

            return Err(RecipeError::Http {
                status_code: status.as_u16(),
                message: format!("API request failed: {}", error_body),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| RecipeError::Decode(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl RecipeService for SpoonacularClient {
    async fn search(&self, query: &str) -> RecipeResult<Vec<Recipe>> {
        debug!(query, "Searching recipes");
        let body: SearchResponse = self.get_json(&self.search_url(), &[("query", query)]).await?;
        debug!(count = body.results.len(), "Search returned");
        Ok(body.results.into_iter().map(Recipe::from).collect())
    }

    async fn fetch_details(&self, id: i64) -> RecipeResult<RecipeDetails> {
        debug!(id, "Fetching recipe details");
        let body: InformationResponse = self.get_json(&self.information_url(id), &[]).await?;
        Ok(body.into())
    }
}
