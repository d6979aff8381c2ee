//! The conversation session.
//!
//! `ConversationSession` owns the message log, the current recipe results,
//! the shopping list and the input buffer, and is the only place they are
//! mutated. Remote actions come in two forms: a sequential `async` method
//! (`search`, `view_details`) and a begin/finish pair a front-end can use to
//! run the network call concurrently and hand the completion back later.

use recipe_core::{Recipe, RecipeDetails, RecipeResult, RecipeServiceRef};
use recipe_store::{ListStore, StoreResult};
use tracing::{debug, error, info, warn};

use crate::message::{replies, ChatMessage, MessageLog};

/// Handle for one issued search.
///
/// Sequence numbers grow with every search; a completion whose ticket is
/// older than the most recently issued one is stale and gets dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    seq: u64,
    query: String,
}

impl SearchTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn query(&self) -> &str {
        &self.query
    }
}

#[derive(Debug)]
pub struct ConversationSession {
    service: RecipeServiceRef,
    lists: ListStore,
    log: MessageLog,
    recipes: Vec<Recipe>,
    shop: Vec<String>,
    // False until the stored shop list has been read; writes wait for it
    shop_loaded: bool,
    input: String,
    issued_searches: u64,
}

impl ConversationSession {
    /// Session with empty state and no store reads
    pub fn new(service: RecipeServiceRef, lists: ListStore) -> Self {
        Self {
            service,
            lists,
            log: MessageLog::new(),
            recipes: Vec::new(),
            shop: Vec::new(),
            shop_loaded: false,
            input: String::new(),
            issued_searches: 0,
        }
    }

    /// Session with the shopping list loaded from the store
    pub async fn open(service: RecipeServiceRef, lists: ListStore) -> Self {
        let mut session = Self::new(service, lists);
        session.reload_shop().await;
        session
    }

    /// Replace the in-memory shopping list with the stored one. A list that
    /// cannot be read leaves the session unloaded.
    pub async fn reload_shop(&mut self) {
        match self.lists.load_shop().await {
            Ok(shop) => {
                debug!(count = shop.len(), "Loaded shopping list");
                self.shop = shop;
                self.shop_loaded = true;
            }
            Err(e) => {
                error!(error = %e, "Error loading shopping list");
                self.shop_loaded = false;
            }
        }
    }

    pub fn service(&self) -> RecipeServiceRef {
        self.service.clone()
    }

    pub fn lists(&self) -> &ListStore {
        &self.lists
    }

    pub fn messages(&self) -> &[ChatMessage] {
        self.log.messages()
    }

    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn shopping_list(&self) -> &[String] {
        &self.shop
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    // --- Typed and spoken input --- //

    /// Record a typed line and open a search for it.
    ///
    /// Blank input yields `None` and leaves the session untouched.
    pub fn accept_text(&mut self, text: &str) -> Option<SearchTicket> {
        let query = text.trim();
        if query.is_empty() {
            return None;
        }
        self.log.push_user(query);
        self.input.clear();
        Some(self.begin_search(query))
    }

    /// Record a transcript: it is mirrored into the input buffer and stays
    /// there, then searched like typed text.
    pub fn accept_transcript(&mut self, transcript: &str) -> Option<SearchTicket> {
        let query = transcript.trim();
        if query.is_empty() {
            return None;
        }
        self.input = query.to_string();
        self.log.push_user(query);
        Some(self.begin_search(query))
    }

    pub async fn submit_text(&mut self, text: &str) -> bool {
        match self.accept_text(text) {
            Some(ticket) => {
                self.run_search(ticket).await;
                true
            }
            None => false,
        }
    }

    /// Open a search for whatever is in the input buffer
    pub fn accept_input(&mut self) -> Option<SearchTicket> {
        let text = self.input.clone();
        self.accept_text(&text)
    }

    /// Submit whatever is in the input buffer
    pub async fn submit_input(&mut self) -> bool {
        match self.accept_input() {
            Some(ticket) => {
                self.run_search(ticket).await;
                true
            }
            None => false,
        }
    }

    pub async fn on_transcript(&mut self, transcript: &str) -> bool {
        match self.accept_transcript(transcript) {
            Some(ticket) => {
                self.run_search(ticket).await;
                true
            }
            None => false,
        }
    }

    // --- Search --- //

    pub fn begin_search(&mut self, query: &str) -> SearchTicket {
        self.log.push_system(replies::FETCHING);
        self.issued_searches += 1;
        SearchTicket {
            seq: self.issued_searches,
            query: query.to_string(),
        }
    }

    /// Apply a search completion. Returns false when the ticket was stale.
    pub fn finish_search(&mut self, ticket: SearchTicket, result: RecipeResult<Vec<Recipe>>) -> bool {
        if ticket.seq < self.issued_searches {
            debug!(
                query = ticket.query(),
                seq = ticket.seq,
                latest = self.issued_searches,
                "Dropping stale search response"
            );
            return false;
        }

        match result {
            Ok(recipes) if recipes.is_empty() => {
                info!(query = ticket.query(), "No recipes found");
                self.log.push_system(replies::NO_RECIPES);
            }
            Ok(recipes) => {
                info!(query = ticket.query(), count = recipes.len(), "Found recipes");
                let titles: Vec<&str> = recipes.iter().map(|r| r.title.as_str()).collect();
                let reply = replies::found(&titles);
                self.recipes = recipes;
                self.log.push_system(reply);
            }
            Err(e) => {
                error!(query = ticket.query(), error = %e, "Error fetching recipes");
                self.log.push_system(replies::SEARCH_FAILED);
            }
        }
        true
    }

    pub async fn search(&mut self, query: &str) {
        let ticket = self.begin_search(query);
        self.run_search(ticket).await;
    }

    async fn run_search(&mut self, ticket: SearchTicket) {
        let result = self.service.search(ticket.query()).await;
        self.finish_search(ticket, result);
    }

    // --- Details --- //

    pub async fn view_details(&mut self, recipe_id: i64) {
        let result = self.service.fetch_details(recipe_id).await;
        self.finish_details(recipe_id, result).await;
    }

    /// Apply a details completion: save a history snapshot, post the
    /// ingredients and instructions, and enrich the matching result.
    pub async fn finish_details(&mut self, recipe_id: i64, result: RecipeResult<RecipeDetails>) {
        let details = match result {
            Ok(details) => details,
            Err(e) => {
                error!(recipe_id, error = %e, "Error fetching recipe details");
                self.log.push_system(replies::DETAILS_FAILED);
                return;
            }
        };

        if let Err(e) = self.lists.append_history(details.snapshot()).await {
            error!(recipe_id, error = %e, "Error saving history");
        }

        self.log.push_system(replies::ingredients(&details.ingredients));
        self.log
            .push_system(replies::instructions(details.instructions.as_deref()));

        for recipe in self.recipes.iter_mut().filter(|r| r.id == recipe_id) {
            recipe.ingredients = Some(details.ingredients.clone());
        }
    }

    // --- Shopping list --- //

    /// Append an ingredient and persist the whole list.
    ///
    /// On a storage failure the in-memory list keeps the item and no
    /// confirmation is posted. A stored list that cannot be read is never
    /// overwritten.
    pub async fn add_to_shop(&mut self, ingredient: &str) -> StoreResult<()> {
        self.shop.push(ingredient.to_string());
        if !self.shop_loaded {
            match self.lists.load_shop().await {
                Ok(mut stored) => {
                    stored.append(&mut self.shop);
                    self.shop = stored;
                    self.shop_loaded = true;
                }
                Err(e) => {
                    warn!(ingredient, error = %e, "Shopping list unreadable, skipping save");
                    return Err(e);
                }
            }
        }
        if let Err(e) = self.lists.save_shop(&self.shop).await {
            error!(ingredient, error = %e, "Error saving shopping list");
            return Err(e);
        }
        self.log.push_system(replies::added_to_shop(ingredient));
        Ok(())
    }
}
