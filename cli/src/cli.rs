use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Chat with a recipe assistant from the terminal
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to the config file (defaults to ~/.config/recipe-chat/config.toml)
    #[arg(long, global = true, env = "RECIPE_CHAT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Keep lists in memory for this run only
    #[arg(long, global = true, default_value_t = false)]
    pub ephemeral: bool,

    /// Enable verbose diagnostics on stderr
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Start an interactive chat session (default)
    Chat,

    /// Search once, print the conversation and exit
    Search {
        /// What to cook
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// Show recipes whose details you viewed
    History {
        /// Remove the recipe with this id first
        #[arg(long)]
        delete: Option<i64>,
    },

    /// Show the shopping list
    Shop {
        /// Remove every entry equal to this ingredient first
        #[arg(long)]
        delete: Option<String>,
    },

    /// Show or change the saved configuration
    Config {
        /// Set and save the Spoonacular API key
        #[arg(long)]
        set_api_key: Option<String>,

        /// Set and save the speech recogniser command (program and arguments)
        #[arg(long, num_args = 1.., allow_hyphen_values = true)]
        set_speech_command: Option<Vec<String>>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_chat() {
        let args = Args::try_parse_from(["recipe-chat"]).unwrap();
        assert!(args.command.is_none());
        assert!(!args.ephemeral);
    }

    #[test]
    fn test_search_joins_words() {
        let args = Args::try_parse_from(["recipe-chat", "search", "pasta", "with", "garlic"]).unwrap();
        assert_eq!(
            args.command,
            Some(Command::Search {
                query: vec!["pasta".into(), "with".into(), "garlic".into()]
            })
        );
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = Args::try_parse_from(["recipe-chat", "shop", "--delete", "salt", "--ephemeral"]).unwrap();
        assert!(args.ephemeral);
        assert_eq!(
            args.command,
            Some(Command::Shop {
                delete: Some("salt".into())
            })
        );
    }

    #[test]
    fn test_history_delete_needs_number() {
        assert!(Args::try_parse_from(["recipe-chat", "history", "--delete", "abc"]).is_err());
    }
}
