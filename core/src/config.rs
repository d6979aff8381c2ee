use crate::errors::{RecipeError, RecipeResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const APP_NAME: &str = "recipe-chat";
pub const DEFAULT_SPEECH_LOCALE: &str = "en-US";

/// Configuration for the recipe chat
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct RecipeConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    /// Directory holding the key-value store file
    pub data_dir: Option<PathBuf>,
    /// External recogniser: program followed by its arguments
    pub speech_command: Option<Vec<String>>,
    pub speech_locale: Option<String>,
    pub microphone_allowed: Option<bool>,
    pub log_level: Option<String>,
}

impl RecipeConfig {
    /// Loads configuration from a file if it exists, otherwise returns the default config
    pub fn load_from_file(path: &Path) -> RecipeResult<Self> {
        if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                RecipeError::Config(format!("Failed to read config file: {}", e))
            })?;

            let config: Self = toml::from_str(&content).map_err(|e| {
                RecipeError::Config(format!("Failed to parse config file: {}", e))
            })?;

            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Saves configuration to a file
    pub fn save_to_file(&self, path: &Path) -> RecipeResult<()> {
        let content = toml::to_string(self).map_err(|e| {
            RecipeError::Config(format!("Failed to serialize config: {}", e))
        })?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                RecipeError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        fs::write(path, content).map_err(|e| {
            RecipeError::Config(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Merges this config with another config, preferring values from the other config if present
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            api_key: other.api_key.clone().or_else(|| self.api_key.clone()),
            base_url: other.base_url.clone().or_else(|| self.base_url.clone()),
            data_dir: other.data_dir.clone().or_else(|| self.data_dir.clone()),
            speech_command: other
                .speech_command
                .clone()
                .or_else(|| self.speech_command.clone()),
            speech_locale: other
                .speech_locale
                .clone()
                .or_else(|| self.speech_locale.clone()),
            microphone_allowed: other.microphone_allowed.or(self.microphone_allowed),
            log_level: other.log_level.clone().or_else(|| self.log_level.clone()),
        }
    }

    /// Overrides read from the process environment
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("SPOONACULAR_API_KEY").ok(),
            base_url: std::env::var("SPOONACULAR_BASE_URL").ok(),
            data_dir: std::env::var_os("RECIPE_CHAT_DATA_DIR").map(PathBuf::from),
            ..Self::default()
        }
    }

    pub fn speech_locale(&self) -> &str {
        self.speech_locale.as_deref().unwrap_or(DEFAULT_SPEECH_LOCALE)
    }

    /// Directory for persisted lists, falling back to the platform data dir
    pub fn resolved_data_dir(&self) -> RecipeResult<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        let data_dir = dirs::data_dir().ok_or_else(|| {
            RecipeError::Config("Could not determine data directory".to_string())
        })?;
        Ok(data_dir.join(APP_NAME))
    }
}

/// Helper function to get default config directory
pub fn get_default_config_dir(app_name: &str) -> RecipeResult<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| {
        RecipeError::Config("Could not determine home directory".to_string())
    })?;

    Ok(home_dir.join(".config").join(app_name))
}

/// Helper function to get default config file path
pub fn get_default_config_file(app_name: &str) -> RecipeResult<PathBuf> {
    let config_dir = get_default_config_dir(app_name)?;
    Ok(config_dir.join("config.toml"))
}
