use thiserror::Error;

/// Recipe API and configuration errors
#[derive(Error, Debug)]
pub enum RecipeError {
    #[error("Network Error: {0}")]
    Network(String),

    #[error("Decode Error: {0}")]
    Decode(String),

    #[error("HTTP Error: {status_code} - {message}")]
    Http { status_code: u16, message: String },

    #[error("Configuration Error: {0}")]
    Config(String),
}

/// Result type for recipe operations
pub type RecipeResult<T> = Result<T, RecipeError>;
