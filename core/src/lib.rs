// Core recipe functionality:
// - Spoonacular API client behind the RecipeService trait
// - Recipe data structures and wire types
// - Configuration loading
// - Shared error types

// Export client module - API client for Spoonacular
pub mod client;
pub use client::*;

// Export types module - Recipe and response data structures
pub mod types;
pub use types::*;

// Export config module - Configuration loading
pub mod config;
pub use config::*;

// Export errors module - Shared error types
pub mod errors;
pub use errors::*;
