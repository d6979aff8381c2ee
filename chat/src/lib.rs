//! Conversational recipe assistant.
//!
//! This crate holds the chat session, the history and shopping list views,
//! and speech input. The session talks to the recipe API through
//! `recipe_core::RecipeService` and persists lists through
//! `recipe_store::ListStore`, so every collaborator can be swapped for a
//! fake in tests.

pub mod message;
pub mod session;
pub mod speech;
pub mod views;

#[cfg(test)]
pub(crate) mod testing;

pub use message::{replies, ChatMessage, MessageLog};
pub use session::{ConversationSession, SearchTicket};
pub use speech::{
    CommandSpeechSource, MicrophonePermission, SpeechError, SpeechResult, SpeechSource,
    StaticPermission, TranscriptSender, VoiceInput,
};
pub use views::{HistoryView, ShopView};
