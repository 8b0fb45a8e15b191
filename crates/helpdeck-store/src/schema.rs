//! Database schema SQL.

/// Platform tables: chatbots, documents, conversations, messages, sentiments.
///
/// Chatbot references on documents and conversations are soft (no FK), so a
/// chatbot can be deleted without locking its history. Messages cascade with
/// their conversation, sentiments cascade with their message.
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS chatbots (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    account_id TEXT NOT NULL,
    name TEXT NOT NULL,
    description TEXT,
    instructions TEXT NOT NULL DEFAULT '',
    active INTEGER NOT NULL DEFAULT 1,
    widget_json TEXT,
    created_at INTEGER NOT NULL,
    updated_at INTEGER
);

CREATE TABLE IF NOT EXISTS documents (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    chatbot_id INTEGER NOT NULL,
    name TEXT,
    url TEXT,
    content TEXT,
    status TEXT NOT NULL DEFAULT 'processing',
    content_hash TEXT,
    created_at INTEGER NOT NULL,
    updated_at INTEGER
);

CREATE TABLE IF NOT EXISTS conversations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    chatbot_id INTEGER NOT NULL,
    user_id TEXT,
    session_id TEXT,
    title TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'active',
    source TEXT,
    created_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS messages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    conversation_id INTEGER NOT NULL REFERENCES conversations(id) ON DELETE CASCADE,
    role TEXT NOT NULL,
    content TEXT NOT NULL,
    created_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS sentiments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    conversation_id INTEGER NOT NULL,
    message_id INTEGER NOT NULL UNIQUE REFERENCES messages(id) ON DELETE CASCADE,
    sentiment TEXT NOT NULL,
    score REAL NOT NULL,
    created_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_chatbots_account ON chatbots(account_id);
CREATE INDEX IF NOT EXISTS idx_documents_chatbot ON documents(chatbot_id, status);
CREATE UNIQUE INDEX IF NOT EXISTS idx_documents_hash ON documents(chatbot_id, content_hash);
CREATE INDEX IF NOT EXISTS idx_conversations_chatbot ON conversations(chatbot_id);
CREATE INDEX IF NOT EXISTS idx_conversations_session ON conversations(chatbot_id, session_id);
CREATE INDEX IF NOT EXISTS idx_messages_conversation ON messages(conversation_id);
"#;
