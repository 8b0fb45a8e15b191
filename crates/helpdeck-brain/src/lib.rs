//! HelpDeck Brain — deterministic text analysis.
//!
//! Intent classification, keyword extraction, topic mining, and sentiment
//! tagging. No models, no network; regex and lexicon tables compiled once.

pub mod intent;
pub mod keywords;
pub mod sentiment;
pub mod topics;

pub use intent::{classify, Intent};
pub use keywords::extract_keywords;
pub use sentiment::{tag, Sentiment, SentimentTag};
pub use topics::{extract_capabilities, extract_topics};
