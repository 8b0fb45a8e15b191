//! Topic and capability extraction from document content.
//!
//! Topics come from markdown structure (headers, emphasis spans) with early
//! sentence fragments as a fallback. Capabilities are verb phrases matched
//! by fixed patterns, used by the help composer's numbered list.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Maximum topics returned per document.
pub const MAX_TOPICS: usize = 5;
/// Maximum capability phrases returned per document.
pub const MAX_CAPABILITIES: usize = 5;

static HEADER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^#+\s*(.+)$").unwrap());
static BOLD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*([^*\n]+)\*\*").unwrap());
// The bold alternative consumes `**..**` spans so the italic capture cannot
// fire inside them; only group 2 is collected on this pass.
static ITALIC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*[^*\n]+\*\*|\*([^*\n]+)\*").unwrap());

static CAPABILITY_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)\b(?:can|able to|help with|provide|offer|support)\s+[^.!?\n]{10,80}")
            .unwrap(),
        Regex::new(r"(?i)\b(?:how to|steps to|way to)\s+[^.!?\n]{10,80}").unwrap(),
    ]
});

/// Split text into sentence bodies, dropping the terminating punctuation.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let bytes = text.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if (b == b'.' || b == b'!' || b == b'?')
            && (i + 1 >= bytes.len() || bytes[i + 1].is_ascii_whitespace())
        {
            let s = text[start..i].trim();
            if !s.is_empty() {
                sentences.push(s);
            }
            start = i + 1;
        }
    }
    let s = text[start..].trim();
    if !s.is_empty() {
        sentences.push(s);
    }
    sentences
}

fn push_unique(items: &mut Vec<String>, seen: &mut HashSet<String>, value: &str) {
    if value.is_empty() {
        return;
    }
    if seen.insert(value.to_string()) {
        items.push(value.to_string());
    }
}

/// Extract up to [`MAX_TOPICS`] topic strings: headers first, then bold and
/// italic spans, then the first three sentence fragments of reasonable
/// length (10..100 chars).
pub fn extract_topics(content: &str) -> Vec<String> {
    let mut topics: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for cap in HEADER_RE.captures_iter(content) {
        if let Some(m) = cap.get(1) {
            push_unique(&mut topics, &mut seen, m.as_str().trim());
        }
    }

    for cap in BOLD_RE.captures_iter(content) {
        if let Some(m) = cap.get(1) {
            push_unique(&mut topics, &mut seen, m.as_str().trim());
        }
    }
    for cap in ITALIC_RE.captures_iter(content) {
        if let Some(m) = cap.get(1) {
            push_unique(&mut topics, &mut seen, m.as_str().trim());
        }
    }

    let mut fragments = 0;
    for sentence in split_sentences(content) {
        if fragments == 3 {
            break;
        }
        let s = sentence.trim();
        if s.len() >= 10 && s.len() < 100 {
            push_unique(&mut topics, &mut seen, s);
            fragments += 1;
        }
    }

    topics.truncate(MAX_TOPICS);
    topics
}

/// Extract up to [`MAX_CAPABILITIES`] capability phrases as whole matches,
/// in pattern-then-occurrence order.
pub fn extract_capabilities(content: &str) -> Vec<String> {
    let mut results: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for re in CAPABILITY_PATTERNS.iter() {
        for m in re.find_iter(content) {
            let s = m.as_str().trim();
            if seen.insert(s.to_string()) {
                results.push(s.to_string());
            }
        }
    }
    results.truncate(MAX_CAPABILITIES);
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_come_first() {
        let content = "# Getting Started\nSome intro text goes here.\n## Billing\nDetails.";
        let topics = extract_topics(content);
        assert_eq!(topics[0], "Getting Started");
        assert_eq!(topics[1], "Billing");
    }

    #[test]
    fn test_emphasis_order() {
        let content = "We cover *response times* and **escalation paths** in depth.";
        let topics = extract_topics(content);
        // Bold spans outrank italic spans.
        let bold = topics.iter().position(|t| t == "escalation paths").unwrap();
        let italic = topics.iter().position(|t| t == "response times").unwrap();
        assert!(bold < italic);
    }

    #[test]
    fn test_sentence_fragment_fallback() {
        let content = "Short. Our warranty covers two years of use. \
                       This fragment also qualifies for the topic list.";
        let topics = extract_topics(content);
        assert!(topics.contains(&"Our warranty covers two years of use".to_string()));
        // "Short" is under 10 chars and is skipped.
        assert!(!topics.iter().any(|t| t == "Short"));
    }

    #[test]
    fn test_topic_cap() {
        let content = "# One\n# Two\n# Three\n# Four\n# Five\n# Six\n# Seven";
        let topics = extract_topics(content);
        assert_eq!(topics.len(), MAX_TOPICS);
        assert_eq!(topics[4], "Five");
    }

    #[test]
    fn test_empty_content() {
        assert!(extract_topics("").is_empty());
        assert!(extract_capabilities("").is_empty());
    }

    #[test]
    fn test_capability_phrases() {
        let content = "Our team can help you track any order. \
                       Read about how to request a replacement part.";
        let caps = extract_capabilities(content);
        assert_eq!(caps.len(), 2);
        assert!(caps[0].starts_with("can help you track"));
        assert!(caps[1].starts_with("how to request"));
    }

    #[test]
    fn test_capability_dedup_and_cap() {
        let content = "We can help with billing questions. We can help with billing questions. \
                       We offer support for enterprise accounts and provide onboarding for new teams. \
                       Learn how to reset your password, how to update billing info, \
                       and how to close your account safely.";
        let caps = extract_capabilities(content);
        assert!(caps.len() <= MAX_CAPABILITIES);
        let unique: HashSet<&String> = caps.iter().collect();
        assert_eq!(unique.len(), caps.len());
    }
}
