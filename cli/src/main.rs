use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use recipe_core::config::{APP_NAME, RecipeConfig, get_default_config_file};
use recipe_core::{RecipeServiceRef, SpoonacularClient};
use recipe_session::{CommandSpeechSource, ConversationSession, StaticPermission};
use recipe_store::{FileStore, InMemoryStore, ListStore, StoreRef};
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};

mod app;
mod cli;
mod commands;
mod logging;
mod output;

use crate::app::SpeechSetup;
use crate::cli::{Args, Command};

/// Main function - loads configuration and dispatches to the chat or a list view
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // A local .env may carry SPOONACULAR_API_KEY
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => get_default_config_file(APP_NAME)?,
    };
    let file_config = RecipeConfig::load_from_file(&config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;
    let config = file_config.merge(&RecipeConfig::from_env());

    logging::init_logging(args.verbose, config.log_level.as_deref())?;
    info!(config = %config_path.display(), "Configuration loaded");

    match args.command.clone().unwrap_or(Command::Chat) {
        Command::Config {
            set_api_key,
            set_speech_command,
        } => handle_config(file_config, &config_path, set_api_key, set_speech_command),
        Command::History { delete } => {
            let lists = open_lists(&args, &config)?;
            app::run_history_view(lists, delete).await
        }
        Command::Shop { delete } => {
            let lists = open_lists(&args, &config)?;
            app::run_shop_view(lists, delete).await
        }
        Command::Search { query } => {
            let session = open_session(&args, &config).await?;
            app::run_single_query(query.join(" "), session).await
        }
        Command::Chat => {
            let session = open_session(&args, &config).await?;
            let speech = build_speech(&config)?;
            app::run_interactive_chat(session, speech).await
        }
    }
}

/// Lists live in the data directory unless the run is ephemeral
fn open_lists(args: &Args, config: &RecipeConfig) -> Result<ListStore> {
    let store: StoreRef = if args.ephemeral {
        Arc::new(InMemoryStore::new())
    } else {
        let data_dir = config.resolved_data_dir()?;
        info!(data_dir = %data_dir.display(), "Using file store");
        Arc::new(FileStore::in_dir(&data_dir))
    };
    Ok(ListStore::new(store))
}

async fn open_session(args: &Args, config: &RecipeConfig) -> Result<ConversationSession> {
    let client = match SpoonacularClient::new(config) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "Failed to initialize recipe client");
            eprintln!(
                "{}",
                "No API key configured. Set SPOONACULAR_API_KEY or run `recipe-chat config --set-api-key <KEY>`."
                    .red()
            );
            return Err(e.into());
        }
    };
    let service: RecipeServiceRef = Arc::new(client);
    Ok(ConversationSession::open(service, open_lists(args, config)?).await)
}

fn build_speech(config: &RecipeConfig) -> Result<Option<SpeechSetup>> {
    let Some(command) = config.speech_command.as_deref().filter(|c| !c.is_empty()) else {
        return Ok(None);
    };
    let source = CommandSpeechSource::from_command_line(command)?;
    Ok(Some(SpeechSetup {
        source: Arc::new(source),
        permission: Arc::new(StaticPermission(config.microphone_allowed.unwrap_or(true))),
        locale: config.speech_locale().to_string(),
    }))
}

/// Apply `config` subcommand changes to the file config, or show it
fn handle_config(
    mut file_config: RecipeConfig,
    config_path: &Path,
    set_api_key: Option<String>,
    set_speech_command: Option<Vec<String>>,
) -> Result<()> {
    let mut updated = false;

    if let Some(key) = set_api_key {
        file_config.api_key = Some(key);
        updated = true;
        println!("{}", "API Key updated.".green());
    }
    if let Some(command) = set_speech_command {
        file_config.speech_command = Some(command);
        updated = true;
        println!("{}", "Speech command updated.".green());
    }

    if updated {
        file_config
            .save_to_file(config_path)
            .with_context(|| format!("Failed to save {}", config_path.display()))?;
        info!(path = %config_path.display(), "Configuration saved");
    } else {
        output::print_config(&file_config, config_path);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_set_api_key_is_saved() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        handle_config(RecipeConfig::default(), &path, Some("abc".to_string()), None).unwrap();

        let saved = RecipeConfig::load_from_file(&path).unwrap();
        assert_eq!(saved.api_key.as_deref(), Some("abc"));
    }

    #[test]
    fn test_show_config_does_not_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        handle_config(RecipeConfig::default(), &path, None, None).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_speech_needs_a_command() {
        let config = RecipeConfig {
            speech_command: Some(vec![]),
            ..RecipeConfig::default()
        };
        assert!(build_speech(&config).unwrap().is_none());

        let config = RecipeConfig {
            speech_command: Some(vec!["whisper".to_string(), "--lang".to_string(), "{locale}".to_string()]),
            ..RecipeConfig::default()
        };
        let speech = build_speech(&config).unwrap().unwrap();
        assert_eq!(speech.locale, "en-US");
    }

    #[tokio::test]
    async fn test_ephemeral_lists_start_empty() {
        let args = Args::try_parse_from(["recipe-chat", "--ephemeral", "shop"]).unwrap();
        let lists = open_lists(&args, &RecipeConfig::default()).unwrap();
        assert!(lists.load_shop().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_key_fails_session() {
        let args = Args::try_parse_from(["recipe-chat", "--ephemeral"]).unwrap();
        assert!(open_session(&args, &RecipeConfig::default()).await.is_err());
    }
}
