mod file;
mod in_memory;

pub use file::{FileStore, STORE_FILE_NAME};
pub use in_memory::InMemoryStore;
