//! Lexicon-based sentiment tagging for user messages.
//!
//! Substring matching against fixed positive and negative word lists. Not
//! boundary-aware: a list word inside a longer word still counts. Mixed
//! signals cancel out to neutral rather than guessing a winner.

use serde::{Deserialize, Serialize};

/// Sentiment polarity of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }
}

/// A sentiment with its fixed score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentTag {
    pub sentiment: Sentiment,
    pub score: f64,
}

const POSITIVE_WORDS: &[&str] = &[
    "good", "great", "excellent", "amazing", "awesome", "fantastic",
    "wonderful", "perfect", "love", "like", "helpful", "thanks", "thank",
    "appreciate", "happy", "pleased", "satisfied", "best", "nice", "easy",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad", "terrible", "awful", "horrible", "worst", "hate", "broken",
    "problem", "issue", "wrong", "error", "fail", "failed", "useless",
    "slow", "confusing", "frustrated", "angry", "disappointed", "poor",
];

/// Tag a message. Positive-only hits score 0.7, negative-only hits score
/// -0.7, and both mixed and absent signals are neutral at 0.0.
pub fn tag(text: &str) -> SentimentTag {
    let lowered = text.to_lowercase();
    let positive = POSITIVE_WORDS.iter().any(|w| lowered.contains(w));
    let negative = NEGATIVE_WORDS.iter().any(|w| lowered.contains(w));

    match (positive, negative) {
        (true, false) => SentimentTag {
            sentiment: Sentiment::Positive,
            score: 0.7,
        },
        (false, true) => SentimentTag {
            sentiment: Sentiment::Negative,
            score: -0.7,
        },
        _ => SentimentTag {
            sentiment: Sentiment::Neutral,
            score: 0.0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive() {
        let tag = tag("this is great, thanks!");
        assert_eq!(tag.sentiment, Sentiment::Positive);
        assert_eq!(tag.score, 0.7);
    }

    #[test]
    fn test_negative() {
        let tag = tag("this is terrible and broken");
        assert_eq!(tag.sentiment, Sentiment::Negative);
        assert_eq!(tag.score, -0.7);
    }

    #[test]
    fn test_neutral_no_hits() {
        let tag = tag("okay I guess");
        assert_eq!(tag.sentiment, Sentiment::Neutral);
        assert_eq!(tag.score, 0.0);
    }

    #[test]
    fn test_mixed_cancels_to_neutral() {
        let tag = tag("great service but broken checkout");
        assert_eq!(tag.sentiment, Sentiment::Neutral);
        assert_eq!(tag.score, 0.0);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(tag("GREAT stuff").sentiment, Sentiment::Positive);
    }

    #[test]
    fn test_containment_is_not_boundary_aware() {
        // List words hit inside longer words; "goodbye" contains "good".
        assert_eq!(tag("goodbye then").sentiment, Sentiment::Positive);
    }
}
