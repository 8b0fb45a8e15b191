//! Intent classification using regex patterns.
//!
//! Pattern groups are evaluated in a fixed priority order (greeting, then
//! question, then help); the first group with a matching pattern decides the
//! intent, and anything unmatched is general conversation.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Detected intent of a user utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Greeting,
    Question,
    Help,
    General,
}

impl Intent {
    pub fn label(self) -> &'static str {
        match self {
            Self::Greeting => "greeting",
            Self::Question => "question",
            Self::Help => "help",
            Self::General => "general",
        }
    }
}

// Patterns run against trimmed, lowercased input, so they only need the
// lowercase forms.
static GREETING_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"^(hi|hello|hey|greetings|good morning|good afternoon|good evening)\b")
            .unwrap(),
        Regex::new(r"\b(what's up|how are you)\b").unwrap(),
        // "help" and "assist" double as conversation openers here, so the
        // greeting group claims a leading "help ..." before the help group
        // ever runs. Load-bearing overlap; keep the order.
        Regex::new(r"^(start|begin|help|assist)\b").unwrap(),
    ]
});

static QUESTION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"^(what|how|when|where|why|who|which|can you|could you|would you)\b")
            .unwrap(),
        // Input is trimmed before matching, so trailing means end of string.
        Regex::new(r"\?$").unwrap(),
        Regex::new(r"^(tell me|show me|explain|describe)\b").unwrap(),
    ]
});

static HELP_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"^(help|support|assist|guide)\b").unwrap(),
        Regex::new(r"\b(i need|i want|i'm looking for)\b").unwrap(),
        Regex::new(r"\b(how to|how do i|how can i)\b").unwrap(),
    ]
});

/// Classify an utterance. Empty or whitespace-only input reads as `General`.
pub fn classify(utterance: &str) -> Intent {
    let text = utterance.trim().to_lowercase();
    if text.is_empty() {
        return Intent::General;
    }

    let groups: [(Intent, &[Regex]); 3] = [
        (Intent::Greeting, &GREETING_PATTERNS),
        (Intent::Question, &QUESTION_PATTERNS),
        (Intent::Help, &HELP_PATTERNS),
    ];
    for (intent, patterns) in groups {
        if patterns.iter().any(|p| p.is_match(&text)) {
            return intent;
        }
    }
    Intent::General
}
