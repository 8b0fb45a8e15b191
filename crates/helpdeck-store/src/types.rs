//! Data types for chatbots, documents, conversations, and sentiment records.

use serde::{Deserialize, Serialize};

/// A chatbot row from the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chatbot {
    pub id: i64,
    pub account_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub instructions: String,
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub widget: Option<serde_json::Value>,
    pub created_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

impl Chatbot {
    /// Parse the widget JSON into a typed config. Missing or malformed
    /// fields fall back to defaults.
    pub fn widget_config(&self) -> WidgetConfig {
        match &self.widget {
            Some(v) => serde_json::from_value(v.clone()).unwrap_or_default(),
            None => WidgetConfig::default(),
        }
    }
}

/// Widget appearance configuration embedded on a chatbot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WidgetConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accent_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub greeting: Option<String>,
}

/// Lifecycle status of a document's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Processing,
    Processed,
    Failed,
}

impl DocumentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Processing => "processing",
            Self::Processed => "processed",
            Self::Failed => "failed",
        }
    }

    /// Parse a stored status string. Unknown values read as `Processing`,
    /// which keeps the row invisible to retrieval.
    pub fn parse(s: &str) -> Self {
        match s {
            "processed" => Self::Processed,
            "failed" => Self::Failed,
            _ => Self::Processing,
        }
    }
}

/// A document row from the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: i64,
    pub chatbot_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub status: DocumentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
    pub created_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

impl Document {
    /// Document content with a missing body read as empty text.
    pub fn content_text(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }

    /// Name shown in reply sources: name, else url, else a fixed label.
    pub fn display_name(&self) -> &str {
        if let Some(name) = self.name.as_deref() {
            if !name.is_empty() {
                return name;
            }
        }
        if let Some(url) = self.url.as_deref() {
            if !url.is_empty() {
                return url;
            }
        }
        "Knowledge base"
    }
}

/// A conversation row from the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: i64,
    pub chatbot_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub title: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub created_at: i64,
}

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::System => "system",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "assistant" => Self::Assistant,
            "system" => Self::System,
            _ => Self::User,
        }
    }
}

/// A message row from the database. Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub conversation_id: i64,
    pub role: Role,
    pub content: String,
    pub created_at: i64,
}

/// A sentiment record attached to a single user message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentRecord {
    pub id: i64,
    pub conversation_id: i64,
    pub message_id: i64,
    pub sentiment: String,
    pub score: f64,
    pub created_at: i64,
}

/// Fields for creating a chatbot.
#[derive(Debug, Clone, Default)]
pub struct NewChatbot {
    pub account_id: String,
    pub name: String,
    pub description: Option<String>,
    pub instructions: String,
    pub widget: Option<serde_json::Value>,
}

/// Partial update for a chatbot. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct ChatbotUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub active: Option<bool>,
    pub widget: Option<serde_json::Value>,
}

/// Fields for creating a document. Content arrives raw; the row starts in
/// `processing` status until the worker normalizes it.
#[derive(Debug, Clone, Default)]
pub struct NewDocument {
    pub chatbot_id: i64,
    pub name: Option<String>,
    pub url: Option<String>,
    pub content: String,
}

/// Fields for creating a conversation.
#[derive(Debug, Clone, Default)]
pub struct NewConversation {
    pub chatbot_id: i64,
    pub user_id: Option<String>,
    pub session_id: Option<String>,
    pub title: String,
    pub source: Option<String>,
}

/// Store-level statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreStats {
    pub total_chatbots: i64,
    pub total_documents: i64,
    pub documents_processing: i64,
    pub documents_processed: i64,
    pub documents_failed: i64,
    pub total_conversations: i64,
    pub total_messages: i64,
    pub total_sentiments: i64,
    pub db_path: String,
    pub db_size_mb: f64,
}
