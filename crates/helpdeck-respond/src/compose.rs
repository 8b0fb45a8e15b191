//! Per-intent reply composition.
//!
//! Every composer returns text, a fixed confidence, and the display names
//! of the documents that actually contributed. Confidence never drives
//! fallback; it is reporting for the caller.

use helpdeck_brain::topics::MAX_CAPABILITIES;
use helpdeck_brain::{extract_capabilities, extract_topics, Intent};
use helpdeck_store::{Chatbot, Document};
use serde::Serialize;

use crate::score::{best_match, summarize};

/// A composed reply with confidence and contributing document names.
#[derive(Debug, Clone, Serialize)]
pub struct Reply {
    pub text: String,
    pub confidence: f64,
    pub sources: Vec<String>,
}

/// Compose a reply for the classified intent from the retrieved documents.
pub fn compose(
    intent: Intent,
    bot: &Chatbot,
    documents: &[Document],
    keywords: &[String],
) -> Reply {
    match intent {
        Intent::Greeting => greeting_reply(bot, documents),
        Intent::Question => question_reply(bot, documents, keywords),
        Intent::Help => help_reply(bot, documents),
        Intent::General => general_reply(documents, keywords),
    }
}

fn greeting_reply(bot: &Chatbot, documents: &[Document]) -> Reply {
    let mut text = format!("Hello! I'm {}.", bot.name);
    if let Some(desc) = bot.description.as_deref() {
        let desc = desc.trim();
        if !desc.is_empty() {
            text.push(' ');
            text.push_str(desc);
            if !desc.ends_with(['.', '!', '?']) {
                text.push('.');
            }
        }
    }

    let topics = collect_topics(documents, 3);
    if !topics.is_empty() {
        text.push_str(&format!(
            " I can help you with topics like: {}.",
            topics.join(", ")
        ));
    }
    text.push_str(" What would you like to know?");

    Reply {
        text,
        confidence: 0.9,
        sources: documents.iter().map(|d| d.display_name().to_string()).collect(),
    }
}

fn question_reply(bot: &Chatbot, documents: &[Document], keywords: &[String]) -> Reply {
    let Some(best) = best_match(documents, keywords) else {
        return Reply {
            text: format!(
                "I don't have specific information about that yet. You can ask me \
                 something else about {}, or try rephrasing your question.",
                bot.name
            ),
            confidence: 0.3,
            sources: Vec::new(),
        };
    };

    let summary = summarize(best.document.content_text(), keywords);
    let (mut text, confidence) = if best.score > 0 {
        (
            format!("Based on my knowledge base, here's what I found: {}", summary),
            0.8,
        )
    } else {
        (
            format!(
                "I found something that might be related, though I'm not sure it \
                 fully answers your question: {}",
                summary
            ),
            0.5,
        )
    };

    let mut sources = vec![best.document.display_name().to_string()];

    if let Some(url) = best.document.url.as_deref() {
        if !url.is_empty() {
            text.push_str(&format!("\n\nSource: {}", url));
        }
    }

    let related: Vec<&str> = documents
        .iter()
        .filter(|d| d.id != best.document.id)
        .take(2)
        .map(|d| d.display_name())
        .collect();
    if !related.is_empty() {
        text.push_str(&format!("\n\nRelated topics: {}", related.join(", ")));
        sources.extend(related.iter().map(|s| s.to_string()));
    }

    Reply {
        text,
        confidence,
        sources,
    }
}

fn help_reply(bot: &Chatbot, documents: &[Document]) -> Reply {
    let mut capabilities: Vec<String> = Vec::new();
    let mut sources: Vec<String> = Vec::new();
    for document in documents {
        if capabilities.len() == MAX_CAPABILITIES {
            break;
        }
        let mut contributed = false;
        for cap in extract_capabilities(document.content_text()) {
            if capabilities.len() == MAX_CAPABILITIES {
                break;
            }
            if !capabilities.contains(&cap) {
                capabilities.push(cap);
                contributed = true;
            }
        }
        if contributed {
            sources.push(document.display_name().to_string());
        }
    }

    let mut text = format!("I'm {}, here to help!", bot.name);
    if capabilities.is_empty() {
        text.push_str(" You can ask me questions and I'll answer from my knowledge base.");
    } else {
        text.push_str(" Here's what I can assist you with:");
        for (i, cap) in capabilities.iter().enumerate() {
            text.push_str(&format!("\n{}. {}", i + 1, cap));
        }
    }

    Reply {
        text,
        confidence: 0.9,
        sources,
    }
}

fn general_reply(documents: &[Document], keywords: &[String]) -> Reply {
    let Some(top) = documents.first() else {
        return Reply {
            text: "I'm not sure I understand. Could you tell me a bit more about \
                   what you're looking for?"
                .to_string(),
            confidence: 0.2,
            sources: Vec::new(),
        };
    };

    // Top candidate by input order; no re-scoring here.
    let summary = summarize(top.content_text(), keywords);
    let mut text = format!(
        "Here's something from my knowledge base that might help: {}",
        summary
    );
    if documents.len() > 1 {
        text.push_str(" I have more information available if you'd like to dig deeper.");
    }

    Reply {
        text,
        confidence: 0.7,
        sources: vec![top.display_name().to_string()],
    }
}

fn collect_topics(documents: &[Document], max: usize) -> Vec<String> {
    let mut topics = Vec::new();
    for document in documents {
        for topic in extract_topics(document.content_text()) {
            if !topics.contains(&topic) {
                topics.push(topic);
            }
            if topics.len() == max {
                return topics;
            }
        }
    }
    topics
}

#[cfg(test)]
mod tests {
    use super::*;
    use helpdeck_store::DocumentStatus;

    fn bot() -> Chatbot {
        Chatbot {
            id: 1,
            account_id: "acct_1".into(),
            name: "Ava".into(),
            description: Some("I answer questions about Acme products".into()),
            instructions: "Be helpful and friendly".into(),
            active: true,
            widget: None,
            created_at: 0,
            updated_at: None,
        }
    }

    fn doc(id: i64, name: Option<&str>, url: Option<&str>, content: &str) -> Document {
        Document {
            id,
            chatbot_id: 1,
            name: name.map(|s| s.to_string()),
            url: url.map(|s| s.to_string()),
            content: Some(content.to_string()),
            status: DocumentStatus::Processed,
            content_hash: None,
            created_at: 0,
            updated_at: None,
        }
    }

    fn kw(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_greeting_reply_shape() {
        let reply = compose(Intent::Greeting, &bot(), &[], &[]);
        assert!(reply.text.starts_with("Hello! I'm Ava."));
        assert!(reply.text.contains("I answer questions about Acme products."));
        assert!(reply.text.ends_with("What would you like to know?"));
        assert_eq!(reply.confidence, 0.9);
        assert!(reply.sources.is_empty());
    }

    #[test]
    fn test_greeting_lists_topics_from_documents() {
        let docs = vec![doc(
            1,
            Some("Guide"),
            None,
            "# Orders\n# Returns\nEverything about our store policies.",
        )];
        let reply = compose(Intent::Greeting, &bot(), &docs, &[]);
        assert!(reply.text.contains("topics like: Orders, Returns"));
        assert_eq!(reply.sources, vec!["Guide".to_string()]);
    }

    #[test]
    fn test_question_without_documents() {
        let reply = compose(Intent::Question, &bot(), &[], &kw(&["refund"]));
        assert_eq!(reply.confidence, 0.3);
        assert!(reply.sources.is_empty());
        assert!(reply.text.contains("don't have specific information"));
    }

    #[test]
    fn test_question_with_match() {
        let docs = vec![doc(
            1,
            Some("Refunds FAQ"),
            Some("https://acme.test/refunds"),
            "The refund policy is 30 days from the date of purchase.",
        )];
        let reply = compose(Intent::Question, &bot(), &docs, &kw(&["refund", "policy"]));
        assert_eq!(reply.confidence, 0.8);
        assert!(reply.text.starts_with("Based on my knowledge base"));
        assert!(reply.text.contains("30 days"));
        assert!(reply.text.contains("Source: https://acme.test/refunds"));
        assert_eq!(reply.sources, vec!["Refunds FAQ".to_string()]);
    }

    #[test]
    fn test_question_zero_score_is_softer() {
        let docs = vec![doc(
            1,
            Some("Shipping"),
            None,
            "Shipping takes three to five business days in most regions.",
        )];
        let reply = compose(Intent::Question, &bot(), &docs, &kw(&["warranty"]));
        assert_eq!(reply.confidence, 0.5);
        assert!(reply.text.contains("not sure it fully answers"));
        // The summary still shows what we had.
        assert!(reply.text.contains("Shipping takes three to five"));
    }

    #[test]
    fn test_question_mentions_related_documents() {
        let docs = vec![
            doc(1, Some("Refunds"), None, "The refund policy is 30 days, no questions asked."),
            doc(2, Some("Shipping"), None, "Standard shipping info lives here."),
            doc(3, None, Some("https://acme.test/faq"), "General FAQ content for everyone."),
        ];
        let reply = compose(Intent::Question, &bot(), &docs, &kw(&["refund"]));
        assert!(reply.text.contains("Related topics: Shipping, https://acme.test/faq"));
        assert_eq!(
            reply.sources,
            vec![
                "Refunds".to_string(),
                "Shipping".to_string(),
                "https://acme.test/faq".to_string()
            ]
        );
    }

    #[test]
    fn test_help_reply_numbered_capabilities() {
        let docs = vec![doc(
            1,
            Some("Manual"),
            None,
            "Our team can help you track any open order. \
             Read about how to request a replacement part online.",
        )];
        let reply = compose(Intent::Help, &bot(), &docs, &[]);
        assert_eq!(reply.confidence, 0.9);
        assert!(reply.text.starts_with("I'm Ava, here to help!"));
        assert!(reply.text.contains("\n1. can help you track"));
        assert!(reply.text.contains("\n2. how to request"));
        assert_eq!(reply.sources, vec!["Manual".to_string()]);
    }

    #[test]
    fn test_help_reply_without_capabilities() {
        let reply = compose(Intent::Help, &bot(), &[], &[]);
        assert_eq!(reply.confidence, 0.9);
        assert!(reply.text.contains("ask me questions"));
        assert!(reply.sources.is_empty());
    }

    #[test]
    fn test_general_without_documents() {
        let reply = compose(Intent::General, &bot(), &[], &[]);
        assert_eq!(reply.confidence, 0.2);
        assert!(reply.text.contains("not sure I understand"));
    }

    #[test]
    fn test_general_summarizes_first_document() {
        let docs = vec![
            doc(1, Some("Overview"), None, "Acme builds tools for small workshops everywhere."),
            doc(2, Some("Details"), None, "More detail lives in this second document."),
        ];
        let reply = compose(Intent::General, &bot(), &docs, &kw(&["acme"]));
        assert_eq!(reply.confidence, 0.7);
        assert!(reply.text.contains("Acme builds tools"));
        assert!(reply.text.contains("more information available"));
        assert_eq!(reply.sources, vec!["Overview".to_string()]);
    }

    #[test]
    fn test_display_name_fallback_label() {
        let docs = vec![doc(1, None, None, "Content without a name or url at all.")];
        let reply = compose(Intent::General, &bot(), &docs, &[]);
        assert_eq!(reply.sources, vec!["Knowledge base".to_string()]);
    }
}
