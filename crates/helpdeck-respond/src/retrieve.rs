//! Naive substring retrieval over processed documents.
//!
//! Deliberately simple: no index, no ranking. Fetch a bounded window of
//! processed documents in store order and keep the ones whose content
//! contains the query, case-insensitively.

use helpdeck_core::Result;
use helpdeck_store::{Document, SqliteStore};

/// Upper bound on documents fetched per chatbot before filtering.
pub const FETCH_WINDOW: usize = 100;
/// Default number of documents handed to the composer.
pub const DEFAULT_LIMIT: usize = 10;

/// Source of processed documents for retrieval. The SQLite store implements
/// this; tests substitute canned or failing sources.
pub trait DocumentSource {
    /// Processed documents for a chatbot in stable store order, capped at
    /// `limit`. Documents in any other status must never appear here.
    fn processed_documents(&self, chatbot_id: i64, limit: usize) -> Result<Vec<Document>>;
}

impl DocumentSource for SqliteStore {
    fn processed_documents(&self, chatbot_id: i64, limit: usize) -> Result<Vec<Document>> {
        SqliteStore::processed_documents(self, chatbot_id, limit)
    }
}

/// Return the first `limit` documents whose content contains `query`,
/// case-insensitively, preserving store order. An empty query matches
/// every document.
pub fn search(
    source: &dyn DocumentSource,
    chatbot_id: i64,
    query: &str,
    limit: usize,
) -> Result<Vec<Document>> {
    let documents = source.processed_documents(chatbot_id, FETCH_WINDOW)?;
    let needle = query.to_lowercase();
    Ok(documents
        .into_iter()
        .filter(|d| d.content_text().to_lowercase().contains(&needle))
        .take(limit)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use helpdeck_core::Error;
    use helpdeck_store::DocumentStatus;

    struct VecSource(Vec<Document>);

    impl DocumentSource for VecSource {
        fn processed_documents(&self, _chatbot_id: i64, limit: usize) -> Result<Vec<Document>> {
            Ok(self.0.iter().take(limit).cloned().collect())
        }
    }

    struct FailingSource;

    impl DocumentSource for FailingSource {
        fn processed_documents(&self, _chatbot_id: i64, _limit: usize) -> Result<Vec<Document>> {
            Err(Error::Database("database is closed".into()))
        }
    }

    fn doc(id: i64, content: &str) -> Document {
        Document {
            id,
            chatbot_id: 1,
            name: None,
            url: None,
            content: Some(content.to_string()),
            status: DocumentStatus::Processed,
            content_hash: None,
            created_at: 0,
            updated_at: None,
        }
    }

    #[test]
    fn test_substring_filter_case_insensitive() {
        let source = VecSource(vec![
            doc(1, "Our REFUND policy lasts 30 days."),
            doc(2, "Shipping takes about a week."),
        ]);
        let hits = search(&source, 1, "refund", 10).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 1);
    }

    #[test]
    fn test_order_preserved_and_limit() {
        let docs: Vec<Document> = (1..=8).map(|i| doc(i, "common topic")).collect();
        let source = VecSource(docs);
        let hits = search(&source, 1, "common", 3).unwrap();
        let ids: Vec<i64> = hits.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_empty_query_matches_everything() {
        let source = VecSource(vec![doc(1, "anything"), doc(2, "at all")]);
        let hits = search(&source, 1, "", 10).unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_missing_content_reads_as_empty() {
        let mut empty = doc(1, "");
        empty.content = None;
        let source = VecSource(vec![empty]);
        assert!(search(&source, 1, "refund", 10).unwrap().is_empty());
        // But the empty query still matches it.
        assert_eq!(search(&source, 1, "", 10).unwrap().len(), 1);
    }

    #[test]
    fn test_source_errors_propagate() {
        let result = search(&FailingSource, 1, "refund", 10);
        assert!(matches!(result, Err(Error::Database(_))));
    }
}
