//! HelpDeck Store — SQLite persistence for chatbots, documents,
//! conversations, messages, and sentiment records.

pub mod schema;
pub mod sqlite;
pub mod types;

pub use sqlite::{content_hash, SqliteStore};
pub use types::*;
