use uuid::Uuid;

// Fixed system replies
pub mod replies {
    pub const FETCHING: &str = "Fetching recipes...";
    pub const FOUND_PREFIX: &str = "I found these recipes: ";
    pub const NO_RECIPES: &str = "No recipes found. Please try another query.";
    pub const SEARCH_FAILED: &str = "Sorry, there was an error fetching recipes.";
    pub const DETAILS_FAILED: &str = "Sorry, there was an error fetching recipe details.";
    pub const INGREDIENTS_PREFIX: &str = "Ingredients: ";
    pub const INSTRUCTIONS_PREFIX: &str = "Instructions: ";
    pub const NO_INSTRUCTIONS: &str = "not available";

    pub fn found(titles: &[&str]) -> String {
        format!("{}{}", FOUND_PREFIX, titles.join(", "))
    }

    pub fn ingredients(ingredients: &[String]) -> String {
        format!("{}{}", INGREDIENTS_PREFIX, ingredients.join(", "))
    }

    pub fn instructions(instructions: Option<&str>) -> String {
        format!("{}{}", INSTRUCTIONS_PREFIX, instructions.unwrap_or(NO_INSTRUCTIONS))
    }

    pub fn added_to_shop(ingredient: &str) -> String {
        format!("{} has been added to your shopping list.", ingredient)
    }
}

/// One line of the conversation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    id: String,
    text: String,
    from_user: bool,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text.into(), true)
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(text.into(), false)
    }

    fn new(text: String, from_user: bool) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text,
            from_user,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn from_user(&self) -> bool {
        self.from_user
    }
}

/// Append-only message log for one session
#[derive(Debug, Default, Clone)]
pub struct MessageLog {
    messages: Vec<ChatMessage>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.messages.push(ChatMessage::user(text));
    }

    pub fn push_system(&mut self, text: impl Into<String>) {
        self.messages.push(ChatMessage::system(text));
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Messages appended after the first `seen`
    pub fn since(&self, seen: usize) -> &[ChatMessage] {
        &self.messages[seen.min(self.messages.len())..]
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let mut log = MessageLog::new();
        log.push_user("pasta");
        log.push_system(replies::FETCHING);

        let messages = log.messages();
        assert_ne!(messages[0].id(), messages[1].id());
        assert!(messages[0].from_user());
        assert!(!messages[1].from_user());
    }

    #[test]
    fn test_since_clamps() {
        let mut log = MessageLog::new();
        log.push_user("a");
        log.push_user("b");
        assert_eq!(log.since(1).len(), 1);
        assert_eq!(log.since(1)[0].text(), "b");
        assert!(log.since(5).is_empty());
    }

    #[test]
    fn test_reply_formats() {
        assert_eq!(
            replies::found(&["Pasta Bolognese", "Pesto"]),
            "I found these recipes: Pasta Bolognese, Pesto"
        );
        assert_eq!(
            replies::added_to_shop("salt"),
            "salt has been added to your shopping list."
        );
        assert_eq!(replies::instructions(None), "Instructions: not available");
    }
}
