//! On-device persistence for the recipe chat.
//!
//! Provides a `KeyValueStore` trait that can be implemented by different
//! storage backends, plus `ListStore`, which keeps the history and shopping
//! lists as whole JSON arrays under fixed keys.

pub mod adapters;
pub mod errors;
pub mod lists;
pub mod store;

pub use adapters::{FileStore, InMemoryStore};
pub use errors::{StoreError, StoreResult};
pub use lists::{ListStore, StoreKey};
pub use store::{KeyValueStore, StoreRef};
