use colored::*;
use recipe_core::{Recipe, RecipeConfig};
use recipe_session::{ChatMessage, MessageLog};
use std::path::Path;

/// Print one chat line with a colored speaker label
pub fn print_message(message: &ChatMessage) {
    if message.from_user() {
        println!("{}: {}", "You".green().bold(), message.text());
    } else {
        println!("{}: {}", "Chef".blue().bold(), message.text());
    }
}

/// Print messages appended since `printed` and return the new count
pub fn print_new_messages(log: &MessageLog, printed: usize) -> usize {
    for message in log.since(printed) {
        print_message(message);
    }
    log.len()
}

/// Numbered recipe results, with numbered ingredients once fetched
pub fn print_recipes(recipes: &[Recipe]) {
    if recipes.is_empty() {
        println!("{}", "No recipes yet. Type what you'd like to cook.".dimmed());
        return;
    }
    for (i, recipe) in recipes.iter().enumerate() {
        print_recipe(i + 1, recipe);
    }
}

pub fn print_recipe(position: usize, recipe: &Recipe) {
    println!(
        "  {}. {} {}",
        position,
        recipe.title.bold(),
        format!("(#{})", recipe.id).bright_black()
    );
    match &recipe.ingredients {
        Some(ingredients) => {
            for (j, ingredient) in ingredients.iter().enumerate() {
                println!("      {} {}", format!("{})", j + 1).yellow(), ingredient);
            }
        }
        None => println!(
            "      {}",
            format!("(:view {} for ingredients)", position).dimmed()
        ),
    }
}

pub fn print_history(items: &[Recipe]) {
    println!("{}", "Search History".cyan().bold());
    if items.is_empty() {
        println!("{}", "No search history found.".dimmed());
        return;
    }
    for recipe in items {
        println!(
            "  {} {}",
            format!("#{}", recipe.id).bright_black(),
            recipe.title
        );
    }
}

pub fn print_shop(items: &[String]) {
    println!("{}", "Shopping List".cyan().bold());
    if items.is_empty() {
        println!("{}", "Your shopping list is empty.".dimmed());
        return;
    }
    for item in items {
        println!("  {}  {}", "•".yellow(), item);
    }
}

pub fn print_notice(message: &str) {
    println!("{}", message.yellow());
}

pub fn print_voice_state(listening: bool) {
    if listening {
        println!("{}", "Listening... (:stop to cancel)".red().bold());
    } else {
        println!("{}", "Voice input off.".dimmed());
    }
}

pub fn print_welcome() {
    println!("{}", "Recipe chat".cyan().bold());
    println!("Tell me what you'd like to cook. Type ':help' for commands, ':quit' to leave.");
    println!();
}

pub fn print_help() {
    println!("{}", "Commands:".yellow().bold());
    println!("  {}               Search for recipes", "<text>".green());
    println!("  {}                Search again with the last transcript", ":send".green());
    println!("  {}               Start voice input", ":voice".green());
    println!("  {}                Stop voice input", ":stop".green());
    println!("  {}             Show the current results", ":recipes".green());
    println!("  {}            Show ingredients and instructions", ":view <n>".green());
    println!("  {}         Add ingredient m of recipe n to the shopping list", ":add <n> <m>".green());
    println!("  {}             Show search history", ":history".green());
    println!("  {}   Remove a recipe from the history", ":history rm <id>".green());
    println!("  {}                Show the shopping list", ":shop".green());
    println!("  {}    Remove an item from the shopping list", ":shop rm <item>".green());
    println!("  {}                Leave the chat", ":quit".green());
    println!();
}

/// Show the configuration with the API key masked
pub fn print_config(config: &RecipeConfig, path: &Path) {
    println!(
        "{} ({})",
        "Current Configuration".cyan().bold(),
        path.display()
    );
    let api_key_display = config.api_key.as_deref().map_or("Not Set".yellow().to_string(), |k| {
        if k.len() > 8 {
            let prefix: String = k.chars().take(4).collect();
            format!("{}...", prefix).bright_black().to_string()
        } else {
            "Set".green().to_string()
        }
    });
    println!("  {}: {}", "API Key".blue(), api_key_display);
    println!(
        "  {}: {}",
        "Base URL".blue(),
        config
            .base_url
            .as_deref()
            .unwrap_or(recipe_core::DEFAULT_BASE_URL)
    );
    let data_dir = config
        .resolved_data_dir()
        .map(|dir| dir.display().to_string())
        .unwrap_or_else(|_| "Unknown".to_string());
    println!("  {}: {}", "Data Directory".blue(), data_dir);
    let speech_display = config
        .speech_command
        .as_ref()
        .filter(|command| !command.is_empty())
        .map_or("Not Set".yellow().to_string(), |command| command.join(" "));
    println!("  {}: {}", "Speech Command".blue(), speech_display);
    println!("  {}: {}", "Speech Locale".blue(), config.speech_locale());
    let microphone_display = if config.microphone_allowed.unwrap_or(true) {
        "Allowed".green()
    } else {
        "Denied".yellow()
    };
    println!("  {}: {}", "Microphone".blue(), microphone_display);
}
