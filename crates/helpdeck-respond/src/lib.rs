//! HelpDeck Respond — retrieval, scoring, and reply composition with a
//! three-tier fallback chain.

pub mod compose;
pub mod fallback;
pub mod retrieve;
pub mod score;

pub use compose::{compose, Reply};
pub use fallback::{respond, ChainOutcome, Tier};
pub use retrieve::{search, DocumentSource, DEFAULT_LIMIT, FETCH_WINDOW};
pub use score::{best_match, summarize, Candidate};
