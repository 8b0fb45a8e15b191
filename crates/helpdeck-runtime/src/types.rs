//! Runtime types.

use helpdeck_respond::{Reply, Tier};
use serde::Serialize;

/// Queued sentiment work for one stored user message.
#[derive(Debug, Clone)]
pub struct SentimentJob {
    pub conversation_id: i64,
    pub message_id: i64,
    pub text: String,
}

/// Queued content-normalization work for one uploaded document.
#[derive(Debug, Clone, Copy)]
pub struct ProcessingJob {
    pub document_id: i64,
}

/// How a caller addresses the conversation for a message.
#[derive(Debug, Clone)]
pub enum ConversationRef {
    /// An existing conversation id; must belong to the chatbot.
    Id(i64),
    /// A widget session key. Resolves to that session's latest conversation,
    /// creating one (and a fresh session id when `None`) as needed.
    Session(Option<String>),
}

/// Everything the caller learns from handling one message.
#[derive(Debug, Clone, Serialize)]
pub struct MessageOutcome {
    pub reply: Reply,
    /// Chain tier that produced the reply. `None` for canned replies that
    /// never entered the chain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<Tier>,
    #[serde(rename = "conversationId", skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<i64>,
    #[serde(rename = "sessionId", skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(rename = "userMessageId", skip_serializing_if = "Option::is_none")]
    pub user_message_id: Option<i64>,
    #[serde(rename = "assistantMessageId", skip_serializing_if = "Option::is_none")]
    pub assistant_message_id: Option<i64>,
}

impl MessageOutcome {
    /// A reply produced outside the chain (blank input, unavailable bot,
    /// total failure). Nothing was persisted for it.
    pub(crate) fn canned(text: &str, confidence: f64) -> Self {
        Self {
            reply: Reply {
                text: text.to_string(),
                confidence,
                sources: Vec::new(),
            },
            tier: None,
            conversation_id: None,
            session_id: None,
            user_message_id: None,
            assistant_message_id: None,
        }
    }
}
