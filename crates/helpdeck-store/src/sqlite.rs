//! SQLite store for the chat platform.
//!
//! Single connection behind a mutex, WAL mode, cached statements. All
//! listing queries order by ascending id so downstream consumers see a
//! stable store order.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use sha2::{Digest, Sha256};
use tracing::info;

use crate::schema::SCHEMA_SQL;
use crate::types::*;
use helpdeck_core::{Error, Result};

/// Sha-256 hex digest of document content, used for per-chatbot dedup.
pub fn content_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

fn now_millis() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_millis() as i64
}

/// SQLite-backed store for all platform tables.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl SqliteStore {
    /// Open or create the SQLite store.
    ///
    /// `db_dir` is the directory (e.g., `helpdeck_data/db/`). The file will
    /// be `db_dir/helpdeck.db`.
    pub fn open(db_dir: impl AsRef<Path>) -> Result<Self> {
        let db_dir = db_dir.as_ref();
        std::fs::create_dir_all(db_dir).map_err(|e| Error::Storage(e.to_string()))?;
        let db_path = db_dir.join("helpdeck.db");

        let conn = Self::create_connection(&db_path)?;
        Self::init_schema(&conn)?;

        let store = Self {
            conn: Mutex::new(conn),
            db_path,
        };

        let bot_count = store.count_chatbots()?;
        let doc_count = store.count_documents()?;
        info!(
            "SqliteStore initialized: {} chatbots, {} documents, path={}",
            bot_count,
            doc_count,
            store.db_path.display()
        );

        Ok(store)
    }

    fn create_connection(db_path: &Path) -> Result<Connection> {
        let conn = Connection::open(db_path).map_err(|e| Error::Database(e.to_string()))?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA foreign_keys = ON;
             PRAGMA synchronous = NORMAL;",
        )
        .map_err(|e| Error::Database(e.to_string()))?;
        Ok(conn)
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(SCHEMA_SQL)
            .map_err(|e| Error::Database(format!("Schema init failed: {}", e)))?;
        Ok(())
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    // ---------------------------------------------------------------
    // Chatbot CRUD
    // ---------------------------------------------------------------

    /// Insert a chatbot. Returns the new chatbot ID.
    pub fn add_chatbot(&self, new: NewChatbot) -> Result<i64> {
        if new.account_id.trim().is_empty() {
            return Err(Error::Validation("account_id must not be empty".into()));
        }
        if new.name.trim().is_empty() {
            return Err(Error::Validation("chatbot name must not be empty".into()));
        }
        let now = now_millis();
        let widget_json = new.widget.as_ref().map(|w| serde_json::to_string(w).unwrap());

        let conn = self.conn.lock();
        let id = conn
            .prepare_cached(
                "INSERT INTO chatbots (account_id, name, description, instructions, widget_json, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )
            .map_err(|e| Error::Database(e.to_string()))?
            .insert(params![
                new.account_id,
                new.name,
                new.description,
                new.instructions,
                widget_json,
                now
            ])
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(id)
    }

    /// Get a chatbot by ID.
    pub fn get_chatbot(&self, chatbot_id: i64) -> Result<Option<Chatbot>> {
        let conn = self.conn.lock();
        let row = conn
            .prepare_cached("SELECT * FROM chatbots WHERE id = ?1")
            .map_err(|e| Error::Database(e.to_string()))?
            .query_row(params![chatbot_id], |row| Ok(Self::row_to_chatbot(row)))
            .optional()
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(row)
    }

    /// List chatbots for an account, oldest first.
    pub fn list_chatbots(&self, account_id: &str) -> Result<Vec<Chatbot>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached("SELECT * FROM chatbots WHERE account_id = ?1 ORDER BY id ASC")
            .map_err(|e| Error::Database(e.to_string()))?;
        let rows = stmt
            .query_map(params![account_id], |row| Ok(Self::row_to_chatbot(row)))
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    /// Apply a partial update to a chatbot. Returns false when it does not exist.
    pub fn update_chatbot(&self, chatbot_id: i64, update: ChatbotUpdate) -> Result<bool> {
        let Some(existing) = self.get_chatbot(chatbot_id)? else {
            return Ok(false);
        };

        let name = update.name.unwrap_or(existing.name);
        if name.trim().is_empty() {
            return Err(Error::Validation("chatbot name must not be empty".into()));
        }
        let description = update.description.or(existing.description);
        let instructions = update.instructions.unwrap_or(existing.instructions);
        let active = update.active.unwrap_or(existing.active);
        let widget = update.widget.or(existing.widget);
        let widget_json = widget.as_ref().map(|w| serde_json::to_string(w).unwrap());
        let now = now_millis();

        let conn = self.conn.lock();
        let count = conn
            .execute(
                "UPDATE chatbots SET name = ?1, description = ?2, instructions = ?3, \
                 active = ?4, widget_json = ?5, updated_at = ?6 WHERE id = ?7",
                params![name, description, instructions, active, widget_json, now, chatbot_id],
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(count > 0)
    }

    /// Delete a chatbot. Documents and conversations are soft-referenced and
    /// survive as orphans.
    pub fn delete_chatbot(&self, chatbot_id: i64) -> Result<bool> {
        let conn = self.conn.lock();
        let count = conn
            .execute("DELETE FROM chatbots WHERE id = ?1", params![chatbot_id])
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(count > 0)
    }

    /// Count total chatbots.
    pub fn count_chatbots(&self) -> Result<i64> {
        let conn = self.conn.lock();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM chatbots", [], |row| row.get(0))
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(count)
    }

    // ---------------------------------------------------------------
    // Document CRUD
    // ---------------------------------------------------------------

    /// Insert a document in `processing` status. Returns the new document ID.
    pub fn add_document(&self, new: NewDocument) -> Result<i64> {
        let now = now_millis();
        let hash = content_hash(&new.content);

        let conn = self.conn.lock();
        let id = conn
            .prepare_cached(
                "INSERT INTO documents (chatbot_id, name, url, content, status, content_hash, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )
            .map_err(|e| Error::Database(e.to_string()))?
            .insert(params![
                new.chatbot_id,
                new.name,
                new.url,
                new.content,
                DocumentStatus::Processing.as_str(),
                hash,
                now
            ])
            .map_err(|e| {
                if e.to_string().contains("UNIQUE constraint") {
                    Error::DuplicateContent(hash.clone())
                } else {
                    Error::Database(e.to_string())
                }
            })?;
        Ok(id)
    }

    /// Get a document by ID.
    pub fn get_document(&self, doc_id: i64) -> Result<Option<Document>> {
        let conn = self.conn.lock();
        let row = conn
            .prepare_cached("SELECT * FROM documents WHERE id = ?1")
            .map_err(|e| Error::Database(e.to_string()))?
            .query_row(params![doc_id], |row| Ok(Self::row_to_document(row)))
            .optional()
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(row)
    }

    /// List all documents for a chatbot regardless of status, oldest first.
    pub fn list_documents(&self, chatbot_id: i64) -> Result<Vec<Document>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached("SELECT * FROM documents WHERE chatbot_id = ?1 ORDER BY id ASC")
            .map_err(|e| Error::Database(e.to_string()))?;
        let rows = stmt
            .query_map(params![chatbot_id], |row| Ok(Self::row_to_document(row)))
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    /// List documents in `processed` status for a chatbot, oldest first.
    /// This is the only view retrieval is allowed to see.
    pub fn processed_documents(&self, chatbot_id: i64, limit: usize) -> Result<Vec<Document>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached(
                "SELECT * FROM documents WHERE chatbot_id = ?1 AND status = 'processed' \
                 ORDER BY id ASC LIMIT ?2",
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        let rows = stmt
            .query_map(params![chatbot_id, limit as i64], |row| {
                Ok(Self::row_to_document(row))
            })
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    /// Documents still in `processing` status, oldest first. Used by the
    /// worker's startup catch-up scan.
    pub fn pending_documents(&self, limit: usize) -> Result<Vec<Document>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached(
                "SELECT * FROM documents WHERE status = 'processing' ORDER BY id ASC LIMIT ?1",
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        let rows = stmt
            .query_map(params![limit as i64], |row| Ok(Self::row_to_document(row)))
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    /// Replace a document's content and status in one step.
    pub fn set_document_content(
        &self,
        doc_id: i64,
        content: &str,
        status: DocumentStatus,
    ) -> Result<bool> {
        let now = now_millis();
        let conn = self.conn.lock();
        let count = conn
            .execute(
                "UPDATE documents SET content = ?1, status = ?2, updated_at = ?3 WHERE id = ?4",
                params![content, status.as_str(), now, doc_id],
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(count > 0)
    }

    /// Flip a document's status without touching content.
    pub fn set_document_status(&self, doc_id: i64, status: DocumentStatus) -> Result<bool> {
        let now = now_millis();
        let conn = self.conn.lock();
        let count = conn
            .execute(
                "UPDATE documents SET status = ?1, updated_at = ?2 WHERE id = ?3",
                params![status.as_str(), now, doc_id],
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(count > 0)
    }

    /// Delete a document.
    pub fn delete_document(&self, doc_id: i64) -> Result<bool> {
        let conn = self.conn.lock();
        let count = conn
            .execute("DELETE FROM documents WHERE id = ?1", params![doc_id])
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(count > 0)
    }

    /// Count total documents.
    pub fn count_documents(&self) -> Result<i64> {
        let conn = self.conn.lock();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(count)
    }

    fn count_documents_with_status(&self, status: DocumentStatus) -> Result<i64> {
        let conn = self.conn.lock();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM documents WHERE status = ?1",
                params![status.as_str()],
                |row| row.get(0),
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(count)
    }

    // ---------------------------------------------------------------
    // Conversation CRUD
    // ---------------------------------------------------------------

    /// Insert a conversation. Returns the new conversation ID.
    pub fn add_conversation(&self, new: NewConversation) -> Result<i64> {
        if new.title.trim().is_empty() {
            return Err(Error::Validation("conversation title must not be empty".into()));
        }
        let now = now_millis();
        let conn = self.conn.lock();
        let id = conn
            .prepare_cached(
                "INSERT INTO conversations (chatbot_id, user_id, session_id, title, source, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )
            .map_err(|e| Error::Database(e.to_string()))?
            .insert(params![
                new.chatbot_id,
                new.user_id,
                new.session_id,
                new.title,
                new.source,
                now
            ])
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(id)
    }

    /// Get a conversation by ID.
    pub fn get_conversation(&self, conversation_id: i64) -> Result<Option<Conversation>> {
        let conn = self.conn.lock();
        let row = conn
            .prepare_cached("SELECT * FROM conversations WHERE id = ?1")
            .map_err(|e| Error::Database(e.to_string()))?
            .query_row(params![conversation_id], |row| {
                Ok(Self::row_to_conversation(row))
            })
            .optional()
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(row)
    }

    /// Find the latest conversation for a widget session.
    pub fn find_conversation_by_session(
        &self,
        chatbot_id: i64,
        session_id: &str,
    ) -> Result<Option<Conversation>> {
        let conn = self.conn.lock();
        let row = conn
            .prepare_cached(
                "SELECT * FROM conversations WHERE chatbot_id = ?1 AND session_id = ?2 \
                 ORDER BY id DESC LIMIT 1",
            )
            .map_err(|e| Error::Database(e.to_string()))?
            .query_row(params![chatbot_id, session_id], |row| {
                Ok(Self::row_to_conversation(row))
            })
            .optional()
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(row)
    }

    /// List conversations for a chatbot, newest first, optionally filtered
    /// by user.
    pub fn list_conversations(
        &self,
        chatbot_id: i64,
        user_id: Option<&str>,
    ) -> Result<Vec<Conversation>> {
        let conn = self.conn.lock();
        match user_id {
            Some(uid) => {
                let mut stmt = conn
                    .prepare_cached(
                        "SELECT * FROM conversations WHERE chatbot_id = ?1 AND user_id = ?2 \
                         ORDER BY id DESC",
                    )
                    .map_err(|e| Error::Database(e.to_string()))?;
                let rows = stmt
                    .query_map(params![chatbot_id, uid], |row| {
                        Ok(Self::row_to_conversation(row))
                    })
                    .map_err(|e| Error::Database(e.to_string()))?;
                Ok(rows.filter_map(|r| r.ok()).collect())
            }
            None => {
                let mut stmt = conn
                    .prepare_cached(
                        "SELECT * FROM conversations WHERE chatbot_id = ?1 ORDER BY id DESC",
                    )
                    .map_err(|e| Error::Database(e.to_string()))?;
                let rows = stmt
                    .query_map(params![chatbot_id], |row| Ok(Self::row_to_conversation(row)))
                    .map_err(|e| Error::Database(e.to_string()))?;
                Ok(rows.filter_map(|r| r.ok()).collect())
            }
        }
    }

    /// Delete a conversation. Messages and their sentiments cascade.
    pub fn delete_conversation(&self, conversation_id: i64) -> Result<bool> {
        let conn = self.conn.lock();
        let count = conn
            .execute(
                "DELETE FROM conversations WHERE id = ?1",
                params![conversation_id],
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(count > 0)
    }

    /// Count total conversations.
    pub fn count_conversations(&self) -> Result<i64> {
        let conn = self.conn.lock();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM conversations", [], |row| row.get(0))
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(count)
    }

    // ---------------------------------------------------------------
    // Messages
    // ---------------------------------------------------------------

    /// Append a message to a conversation. Returns the new message ID.
    pub fn add_message(&self, conversation_id: i64, role: Role, content: &str) -> Result<i64> {
        if content.trim().is_empty() {
            return Err(Error::Validation("message content must not be empty".into()));
        }
        let now = now_millis();
        let conn = self.conn.lock();
        let id = conn
            .prepare_cached(
                "INSERT INTO messages (conversation_id, role, content, created_at) \
                 VALUES (?1, ?2, ?3, ?4)",
            )
            .map_err(|e| Error::Database(e.to_string()))?
            .insert(params![conversation_id, role.as_str(), content, now])
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(id)
    }

    /// Message history for a conversation, oldest first.
    pub fn list_messages(&self, conversation_id: i64) -> Result<Vec<Message>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached("SELECT * FROM messages WHERE conversation_id = ?1 ORDER BY id ASC")
            .map_err(|e| Error::Database(e.to_string()))?;
        let rows = stmt
            .query_map(params![conversation_id], |row| Ok(Self::row_to_message(row)))
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    /// Count total messages.
    pub fn count_messages(&self) -> Result<i64> {
        let conn = self.conn.lock();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM messages", [], |row| row.get(0))
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(count)
    }

    // ---------------------------------------------------------------
    // Sentiments
    // ---------------------------------------------------------------

    /// Insert a sentiment record for a user message. At most one record per
    /// message; a second insert reports `DuplicateContent`.
    pub fn add_sentiment(
        &self,
        conversation_id: i64,
        message_id: i64,
        sentiment: &str,
        score: f64,
    ) -> Result<i64> {
        let now = now_millis();
        let conn = self.conn.lock();
        let id = conn
            .prepare_cached(
                "INSERT INTO sentiments (conversation_id, message_id, sentiment, score, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )
            .map_err(|e| Error::Database(e.to_string()))?
            .insert(params![conversation_id, message_id, sentiment, score, now])
            .map_err(|e| {
                if e.to_string().contains("UNIQUE constraint") {
                    Error::DuplicateContent(format!("sentiment for message {}", message_id))
                } else {
                    Error::Database(e.to_string())
                }
            })?;
        Ok(id)
    }

    /// Look up the sentiment record for a message, if any.
    pub fn get_sentiment_for_message(&self, message_id: i64) -> Result<Option<SentimentRecord>> {
        let conn = self.conn.lock();
        let row = conn
            .prepare_cached("SELECT * FROM sentiments WHERE message_id = ?1")
            .map_err(|e| Error::Database(e.to_string()))?
            .query_row(params![message_id], |row| Ok(Self::row_to_sentiment(row)))
            .optional()
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(row)
    }

    /// Count total sentiment records.
    pub fn count_sentiments(&self) -> Result<i64> {
        let conn = self.conn.lock();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM sentiments", [], |row| row.get(0))
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(count)
    }

    // ---------------------------------------------------------------
    // Stats
    // ---------------------------------------------------------------

    /// Aggregate store statistics for the ops endpoints.
    pub fn get_stats(&self) -> Result<StoreStats> {
        let total_chatbots = self.count_chatbots()?;
        let total_documents = self.count_documents()?;
        let documents_processing = self.count_documents_with_status(DocumentStatus::Processing)?;
        let documents_processed = self.count_documents_with_status(DocumentStatus::Processed)?;
        let documents_failed = self.count_documents_with_status(DocumentStatus::Failed)?;
        let total_conversations = self.count_conversations()?;
        let total_messages = self.count_messages()?;
        let total_sentiments = self.count_sentiments()?;

        let db_size = std::fs::metadata(&self.db_path).map(|m| m.len()).unwrap_or(0);

        Ok(StoreStats {
            total_chatbots,
            total_documents,
            documents_processing,
            documents_processed,
            documents_failed,
            total_conversations,
            total_messages,
            total_sentiments,
            db_path: self.db_path.to_string_lossy().to_string(),
            db_size_mb: db_size as f64 / (1024.0 * 1024.0),
        })
    }

    // ---------------------------------------------------------------
    // Row Mapping Helpers
    // ---------------------------------------------------------------

    fn row_to_chatbot(row: &rusqlite::Row<'_>) -> Chatbot {
        Chatbot {
            id: row.get("id").unwrap_or(0),
            account_id: row.get("account_id").unwrap_or_default(),
            name: row.get("name").unwrap_or_default(),
            description: row.get("description").ok().flatten(),
            instructions: row.get("instructions").unwrap_or_default(),
            active: row.get("active").unwrap_or(true),
            widget: row
                .get::<_, Option<String>>("widget_json")
                .ok()
                .flatten()
                .and_then(|s| serde_json::from_str(&s).ok()),
            created_at: row.get("created_at").unwrap_or(0),
            updated_at: row.get("updated_at").ok().flatten(),
        }
    }

    fn row_to_document(row: &rusqlite::Row<'_>) -> Document {
        Document {
            id: row.get("id").unwrap_or(0),
            chatbot_id: row.get("chatbot_id").unwrap_or(0),
            name: row.get("name").ok().flatten(),
            url: row.get("url").ok().flatten(),
            content: row.get("content").ok().flatten(),
            status: DocumentStatus::parse(&row.get::<_, String>("status").unwrap_or_default()),
            content_hash: row.get("content_hash").ok().flatten(),
            created_at: row.get("created_at").unwrap_or(0),
            updated_at: row.get("updated_at").ok().flatten(),
        }
    }

    fn row_to_conversation(row: &rusqlite::Row<'_>) -> Conversation {
        Conversation {
            id: row.get("id").unwrap_or(0),
            chatbot_id: row.get("chatbot_id").unwrap_or(0),
            user_id: row.get("user_id").ok().flatten(),
            session_id: row.get("session_id").ok().flatten(),
            title: row.get("title").unwrap_or_default(),
            status: row.get("status").unwrap_or_else(|_| "active".to_string()),
            source: row.get("source").ok().flatten(),
            created_at: row.get("created_at").unwrap_or(0),
        }
    }

    fn row_to_message(row: &rusqlite::Row<'_>) -> Message {
        Message {
            id: row.get("id").unwrap_or(0),
            conversation_id: row.get("conversation_id").unwrap_or(0),
            role: Role::parse(&row.get::<_, String>("role").unwrap_or_default()),
            content: row.get("content").unwrap_or_default(),
            created_at: row.get("created_at").unwrap_or(0),
        }
    }

    fn row_to_sentiment(row: &rusqlite::Row<'_>) -> SentimentRecord {
        SentimentRecord {
            id: row.get("id").unwrap_or(0),
            conversation_id: row.get("conversation_id").unwrap_or(0),
            message_id: row.get("message_id").unwrap_or(0),
            sentiment: row.get("sentiment").unwrap_or_default(),
            score: row.get("score").unwrap_or(0.0),
            created_at: row.get("created_at").unwrap_or(0),
        }
    }
}
