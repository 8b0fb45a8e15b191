//! Keyword extraction with stop-word filtering.
//!
//! Lowercases, strips punctuation, drops short tokens and stop words, and
//! keeps first-occurrence order. This feeds retrieval and scoring, so the
//! output must be deterministic.

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Maximum keywords returned per text.
pub const MAX_KEYWORDS: usize = 10;

/// English stop words: articles, conjunctions, pronouns, auxiliaries,
/// prepositions, and common fillers. Tokens of length <= 2 are dropped
/// before this table is consulted.
const STOP_WORDS: &[&str] = &[
    "the", "and", "or", "but", "nor", "for", "yet", "you", "he", "she", "it",
    "we", "they", "me", "him", "her", "us", "them", "my", "your", "his",
    "its", "our", "their", "mine", "yours", "hers", "ours", "theirs", "this",
    "that", "these", "those", "who", "whom", "which", "what", "whose", "is",
    "am", "are", "was", "were", "be", "been", "being", "have", "has", "had",
    "having", "do", "does", "did", "doing", "will", "would", "shall",
    "should", "can", "could", "may", "might", "must", "in", "on", "at", "to",
    "from", "by", "with", "about", "against", "between", "into", "through",
    "during", "before", "after", "above", "below", "up", "down", "out",
    "off", "over", "under", "again", "further", "here", "there", "where",
    "when", "why", "how", "all", "each", "every", "both", "few", "more",
    "most", "other", "some", "any", "not", "only", "own", "same", "than",
    "too", "very", "just", "also", "now", "then", "once", "always", "never",
    "if", "because", "as", "until", "while", "although", "though", "yes",
    "maybe",
];

static STOP_WORD_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| STOP_WORDS.iter().copied().collect());

/// Extract up to [`MAX_KEYWORDS`] keywords, preserving first-occurrence
/// order. Duplicate tokens after the first are dropped.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut keywords = Vec::new();

    for token in lowered.split(|c: char| !c.is_alphanumeric()) {
        if token.len() <= 2 || STOP_WORD_SET.contains(token) {
            continue;
        }
        if seen.insert(token) {
            keywords.push(token.to_string());
            if keywords.len() == MAX_KEYWORDS {
                break;
            }
        }
    }
    keywords
}
