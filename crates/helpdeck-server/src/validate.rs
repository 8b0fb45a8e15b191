//! Database validation for the `validate` subcommand.
//!
//! Opens an existing data directory read-only and checks that the database
//! has the expected schema before a server is pointed at it.

use std::path::Path;

use rusqlite::Connection;

/// Result of a validation run.
#[derive(Debug)]
pub struct ValidationReport {
    pub db_valid: bool,
    pub chatbots: i64,
    pub documents: i64,
    pub conversations: i64,
    pub messages: i64,
    pub sentiments: i64,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

/// Validate that a data directory contains a compatible HelpDeck database.
pub fn validate(data_dir: &Path) -> ValidationReport {
    let mut report = ValidationReport {
        db_valid: false,
        chatbots: 0,
        documents: 0,
        conversations: 0,
        messages: 0,
        sentiments: 0,
        warnings: Vec::new(),
        errors: Vec::new(),
    };

    let db_path = data_dir.join("db/helpdeck.db");
    if !db_path.exists() {
        report.errors.push(format!("Database not found: {}", db_path.display()));
        return report;
    }

    let conn = match Connection::open_with_flags(
        &db_path,
        rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
    ) {
        Ok(c) => c,
        Err(e) => {
            report.errors.push(format!("Failed to open database: {}", e));
            return report;
        }
    };

    let required_tables = ["chatbots", "documents", "conversations", "messages", "sentiments"];
    for table in &required_tables {
        match table_exists(&conn, table) {
            Ok(true) => {}
            Ok(false) => {
                report.errors.push(format!("Missing required table: {}", table));
            }
            Err(e) => {
                report.errors.push(format!("Error checking table {}: {}", table, e));
            }
        }
    }

    if !report.errors.is_empty() {
        return report;
    }

    let chatbot_columns = get_column_names(&conn, "chatbots");
    let required_chatbot_cols = ["id", "account_id", "name", "instructions", "active", "created_at"];
    for col in &required_chatbot_cols {
        if !chatbot_columns.contains(&col.to_string()) {
            report.errors.push(format!("chatbots table missing column: {}", col));
        }
    }

    let document_columns = get_column_names(&conn, "documents");
    let required_document_cols = ["id", "chatbot_id", "content", "content_hash", "status", "created_at"];
    for col in &required_document_cols {
        if !document_columns.contains(&col.to_string()) {
            report.errors.push(format!("documents table missing column: {}", col));
        }
    }

    if !report.errors.is_empty() {
        return report;
    }

    report.db_valid = true;

    report.chatbots = count_rows(&conn, "chatbots").unwrap_or(0);
    report.documents = count_rows(&conn, "documents").unwrap_or(0);
    report.conversations = count_rows(&conn, "conversations").unwrap_or(0);
    report.messages = count_rows(&conn, "messages").unwrap_or(0);
    report.sentiments = count_rows(&conn, "sentiments").unwrap_or(0);

    // Documents stuck in `processing` are retried at startup, but flag them.
    if let Ok(stuck) = conn.query_row(
        "SELECT COUNT(*) FROM documents WHERE status = 'processing'",
        [],
        |row| row.get::<_, i64>(0),
    ) {
        if stuck > 0 {
            report.warnings.push(format!(
                "{} documents still in processing (will be picked up at startup)",
                stuck
            ));
        }
    }

    if let Ok(orphans) = conn.query_row(
        "SELECT COUNT(*) FROM messages WHERE conversation_id NOT IN (SELECT id FROM conversations)",
        [],
        |row| row.get::<_, i64>(0),
    ) {
        if orphans > 0 {
            report.warnings.push(format!("{} orphaned messages found", orphans));
        }
    }

    report
}

/// Print a validation report to stdout.
pub fn print_report(report: &ValidationReport) {
    println!("=== HelpDeck Database Report ===");
    println!();
    println!("Database valid:  {}", if report.db_valid { "YES" } else { "NO" });
    println!("Chatbots:        {}", report.chatbots);
    println!("Documents:       {}", report.documents);
    println!("Conversations:   {}", report.conversations);
    println!("Messages:        {}", report.messages);
    println!("Sentiments:      {}", report.sentiments);

    if !report.warnings.is_empty() {
        println!();
        println!("Warnings:");
        for w in &report.warnings {
            println!("  - {}", w);
        }
    }

    if !report.errors.is_empty() {
        println!();
        println!("Errors:");
        for e in &report.errors {
            println!("  - {}", e);
        }
    }

    println!();
    if report.errors.is_empty() && report.db_valid {
        println!("Status: OK");
    } else {
        println!("Status: INVALID");
    }
}

// Internal helpers

fn table_exists(conn: &Connection, table: &str) -> Result<bool, rusqlite::Error> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
        [table],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

fn get_column_names(conn: &Connection, table: &str) -> Vec<String> {
    // Table names come from the hardcoded lists above, never from input.
    let query = format!("PRAGMA table_info({})", table);
    let mut names = Vec::new();
    if let Ok(mut stmt) = conn.prepare(&query) {
        if let Ok(rows) = stmt.query_map([], |row| row.get::<_, String>(1)) {
            for name in rows.flatten() {
                names.push(name);
            }
        }
    }
    names
}

fn count_rows(conn: &Connection, table: &str) -> Result<i64, rusqlite::Error> {
    let query = format!("SELECT COUNT(*) FROM {}", table);
    conn.query_row(&query, [], |row| row.get(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    use helpdeck_store::{NewChatbot, SqliteStore};

    fn seeded_data_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(&dir.path().join("db")).unwrap();
        store
            .add_chatbot(NewChatbot {
                account_id: "acct_1".into(),
                name: "Ada".into(),
                instructions: "Handle support questions.".into(),
                ..Default::default()
            })
            .unwrap();
        dir
    }

    #[test]
    fn test_validate_fresh_store() {
        let dir = seeded_data_dir();
        let report = validate(dir.path());

        assert!(report.db_valid, "errors: {:?}", report.errors);
        assert_eq!(report.chatbots, 1);
        assert_eq!(report.documents, 0);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_validate_missing_database() {
        let dir = tempfile::tempdir().unwrap();
        let report = validate(dir.path());

        assert!(!report.db_valid);
        assert!(report.errors[0].contains("Database not found"));
    }

    #[test]
    fn test_validate_flags_missing_tables() {
        let dir = tempfile::tempdir().unwrap();
        let db_dir = dir.path().join("db");
        std::fs::create_dir_all(&db_dir).unwrap();
        let conn = Connection::open(db_dir.join("helpdeck.db")).unwrap();
        conn.execute_batch("CREATE TABLE chatbots (id INTEGER PRIMARY KEY);")
            .unwrap();
        drop(conn);

        let report = validate(dir.path());

        assert!(!report.db_valid);
        assert!(report
            .errors
            .iter()
            .any(|e| e.contains("Missing required table: documents")));
    }

    #[test]
    fn test_validate_warns_on_stuck_documents() {
        let dir = seeded_data_dir();
        {
            let store = SqliteStore::open(&dir.path().join("db")).unwrap();
            store
                .add_document(helpdeck_store::NewDocument {
                    chatbot_id: 1,
                    name: Some("FAQ".into()),
                    content: "Some content.".into(),
                    ..Default::default()
                })
                .unwrap();
        }

        let report = validate(dir.path());

        assert!(report.db_valid);
        assert_eq!(report.documents, 1);
        assert!(report.warnings.iter().any(|w| w.contains("still in processing")));
    }
}
