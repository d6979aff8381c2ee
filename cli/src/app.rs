use anyhow::{Context, Result};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use recipe_core::{Recipe, RecipeDetails, RecipeResult, RecipeServiceRef};
use recipe_session::{
    ConversationSession, HistoryView, MicrophonePermission, SearchTicket, ShopView, SpeechSource,
    VoiceInput,
};
use recipe_store::ListStore;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::commands::{self, ChatCommand};
use crate::output::{self, print_notice};

/// Everything needed to offer voice input
pub struct SpeechSetup {
    pub source: Arc<dyn SpeechSource>,
    pub permission: Arc<dyn MicrophonePermission>,
    pub locale: String,
}

/// A finished network call, handed back to the chat loop
#[derive(Debug)]
pub enum Completion {
    Search(SearchTicket, RecipeResult<Vec<Recipe>>),
    Details(i64, RecipeResult<RecipeDetails>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

fn spawn_search(
    service: RecipeServiceRef,
    ticket: SearchTicket,
    done: mpsc::UnboundedSender<Completion>,
) {
    tokio::spawn(async move {
        let result = service.search(ticket.query()).await;
        // The loop only drops its receiver on exit
        let _ = done.send(Completion::Search(ticket, result));
    });
}

fn spawn_details(service: RecipeServiceRef, recipe_id: i64, done: mpsc::UnboundedSender<Completion>) {
    tokio::spawn(async move {
        let result = service.fetch_details(recipe_id).await;
        let _ = done.send(Completion::Details(recipe_id, result));
    });
}

/// The interactive chat: routes lines, transcripts and completions into
/// the session and prints whatever the session appended.
pub struct ChatApp {
    session: ConversationSession,
    voice: Option<VoiceInput>,
    completions: mpsc::UnboundedSender<Completion>,
    printed: usize,
}

impl ChatApp {
    pub fn new(
        session: ConversationSession,
        voice: Option<VoiceInput>,
        completions: mpsc::UnboundedSender<Completion>,
    ) -> Self {
        Self {
            session,
            voice,
            completions,
            printed: 0,
        }
    }

    #[cfg(test)]
    pub fn session(&self) -> &ConversationSession {
        &self.session
    }

    pub fn is_listening(&self) -> bool {
        self.voice.as_ref().is_some_and(VoiceInput::is_listening)
    }

    /// Text waiting in the input buffer, shown in the prompt
    pub fn pending_input(&self) -> &str {
        self.session.input()
    }

    pub async fn handle_line(&mut self, line: &str) -> Flow {
        match commands::parse(line) {
            ChatCommand::Search(text) => {
                if let Some(ticket) = self.session.accept_text(&text) {
                    spawn_search(self.session.service(), ticket, self.completions.clone());
                }
            }
            ChatCommand::Send => match self.session.accept_input() {
                Some(ticket) => {
                    spawn_search(self.session.service(), ticket, self.completions.clone());
                }
                None => print_notice("Nothing to send."),
            },
            ChatCommand::Voice => match self.voice.as_mut() {
                Some(voice) => {
                    let listening = voice.start_listening().await;
                    output::print_voice_state(listening);
                }
                None => print_notice(
                    "Voice input is not configured. Set a speech command with `recipe-chat config --set-speech-command`.",
                ),
            },
            ChatCommand::Stop => {
                if let Some(voice) = self.voice.as_mut() {
                    voice.stop_listening().await;
                }
                output::print_voice_state(false);
            }
            ChatCommand::Recipes => output::print_recipes(self.session.recipes()),
            ChatCommand::View(position) => match self.session.recipes().get(position - 1) {
                Some(recipe) => {
                    debug!(recipe_id = recipe.id, "Requesting details");
                    spawn_details(self.session.service(), recipe.id, self.completions.clone());
                }
                None => print_notice(&format!("There is no recipe #{}.", position)),
            },
            ChatCommand::Add { recipe, ingredient } => self.add_ingredient(recipe, ingredient).await,
            ChatCommand::History => {
                let mut view = HistoryView::new(self.session.lists().clone());
                view.load().await;
                print_history_view(&view);
            }
            ChatCommand::HistoryRemove(recipe_id) => {
                let mut view = HistoryView::new(self.session.lists().clone());
                view.load().await;
                // Storage errors are already logged by the view
                let _ = view.delete(recipe_id).await;
                print_history_view(&view);
            }
            ChatCommand::Shop => {
                let mut view = ShopView::new(self.session.lists().clone());
                view.load().await;
                print_shop_view(&view);
            }
            ChatCommand::ShopRemove(item) => {
                let mut view = ShopView::new(self.session.lists().clone());
                view.load().await;
                let _ = view.delete(&item).await;
                print_shop_view(&view);
                // The session appends to its own copy of the list
                self.session.reload_shop().await;
            }
            ChatCommand::Help => output::print_help(),
            ChatCommand::Quit => return Flow::Quit,
            ChatCommand::Invalid(message) => print_notice(&message),
        }
        self.flush();
        Flow::Continue
    }

    async fn add_ingredient(&mut self, recipe: usize, ingredient: usize) {
        let Some(found) = self.session.recipes().get(recipe - 1) else {
            print_notice(&format!("There is no recipe #{}.", recipe));
            return;
        };
        let Some(ingredients) = &found.ingredients else {
            print_notice(&format!("Use :view {} to load its ingredients first.", recipe));
            return;
        };
        let Some(item) = ingredients.get(ingredient - 1).cloned() else {
            print_notice(&format!("Recipe #{} has no ingredient {}.", recipe, ingredient));
            return;
        };
        // Storage errors are logged by the session
        let _ = self.session.add_to_shop(&item).await;
    }

    pub async fn handle_transcript(&mut self, transcript: String) {
        info!("Received transcript");
        if let Some(voice) = self.voice.as_mut() {
            voice.transcript_received();
        }
        if let Some(ticket) = self.session.accept_transcript(&transcript) {
            spawn_search(self.session.service(), ticket, self.completions.clone());
        }
        self.flush();
    }

    pub async fn handle_completion(&mut self, completion: Completion) {
        match completion {
            Completion::Search(ticket, result) => {
                let found = matches!(&result, Ok(recipes) if !recipes.is_empty());
                let applied = self.session.finish_search(ticket, result);
                self.flush();
                if applied && found {
                    output::print_recipes(self.session.recipes());
                }
            }
            Completion::Details(recipe_id, result) => {
                let fetched = result.is_ok();
                self.session.finish_details(recipe_id, result).await;
                self.flush();
                if fetched {
                    if let Some((i, recipe)) = self
                        .session
                        .recipes()
                        .iter()
                        .enumerate()
                        .find(|(_, r)| r.id == recipe_id)
                    {
                        output::print_recipe(i + 1, recipe);
                    }
                }
            }
        }
    }

    fn flush(&mut self) {
        self.printed = output::print_new_messages(self.session.log(), self.printed);
    }

    pub async fn shutdown(self) {
        if let Some(voice) = self.voice {
            voice.teardown().await;
        }
    }
}

fn print_history_view(view: &HistoryView) {
    if !view.is_loaded() {
        print_notice("Search history could not be read and was left unchanged.");
    }
    output::print_history(view.items());
}

fn print_shop_view(view: &ShopView) {
    if !view.is_loaded() {
        print_notice("Shopping list could not be read and was left unchanged.");
    }
    output::print_shop(view.items());
}

fn prompt(listening: bool, pending: &str) -> Result<()> {
    if listening {
        print!("{} ", "●".red());
    }
    if !pending.is_empty() {
        print!("{} ", format!("[{}]", pending).dimmed());
    }
    print!("{}: ", "You".green().bold());
    io::stdout().flush().context("Failed to flush stdout")
}

/// Runs the interactive chat until ':quit' or end of input
pub async fn run_interactive_chat(
    session: ConversationSession,
    speech: Option<SpeechSetup>,
) -> Result<()> {
    let (transcript_tx, mut transcripts) = mpsc::unbounded_channel();
    let (completion_tx, mut completions) = mpsc::unbounded_channel();

    let voice = speech.map(|setup| {
        VoiceInput::attach(setup.source, setup.permission, setup.locale, transcript_tx.clone())
    });
    let mut app = ChatApp::new(session, voice, completion_tx);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    output::print_welcome();
    prompt(app.is_listening(), app.pending_input())?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read input")? else {
                    break;
                };
                if app.handle_line(&line).await == Flow::Quit {
                    break;
                }
            }
            Some(transcript) = transcripts.recv() => {
                println!();
                app.handle_transcript(transcript).await;
            }
            Some(completion) = completions.recv() => {
                println!();
                app.handle_completion(completion).await;
            }
        }
        prompt(app.is_listening(), app.pending_input())?;
    }

    println!("Exiting chat session.");
    app.shutdown().await;
    Ok(())
}

/// Runs one search with a spinner and prints the resulting conversation
pub async fn run_single_query(query: String, mut session: ConversationSession) -> Result<()> {
    info!("Running single query: {}", query);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner} {msg}")
            .context("Invalid spinner template")?,
    );
    spinner.set_message("Fetching recipes...");
    spinner.enable_steady_tick(Duration::from_millis(120));

    session.submit_text(&query).await;

    spinner.finish_and_clear();
    output::print_new_messages(session.log(), 0);
    if !session.recipes().is_empty() {
        output::print_recipes(session.recipes());
    }
    Ok(())
}

pub async fn run_history_view(lists: ListStore, delete: Option<i64>) -> Result<()> {
    let mut view = HistoryView::new(lists);
    view.load().await;
    if let Some(recipe_id) = delete {
        view.delete(recipe_id)
            .await
            .with_context(|| format!("Failed to save history after removing #{}", recipe_id))?;
    }
    print_history_view(&view);
    Ok(())
}

pub async fn run_shop_view(lists: ListStore, delete: Option<String>) -> Result<()> {
    let mut view = ShopView::new(lists);
    view.load().await;
    if let Some(item) = delete {
        view.delete(&item)
            .await
            .with_context(|| format!("Failed to save shopping list after removing '{}'", item))?;
    }
    print_shop_view(&view);
    Ok(())
}
