//! HelpDeck Runtime — conversation orchestration and background jobs.
//!
//! The orchestrator is the write path for every exchange: it persists the
//! user message, runs the reply chain, persists the assistant message, and
//! hands sentiment work to a detached queue. The processor normalizes
//! uploaded document content so retrieval only ever sees processed text.

pub mod orchestrator;
pub mod processor;
pub mod types;

pub use orchestrator::{record_sentiment, Orchestrator};
pub use processor::process_document;
pub use types::*;
