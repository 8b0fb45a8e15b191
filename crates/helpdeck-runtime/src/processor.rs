//! Document content processing.
//!
//! Uploaded text is stored raw in `processing` status; this step normalizes
//! it and flips the row to `processed`, the only status retrieval reads.
//! Content that normalizes to nothing marks the row `failed`.

use helpdeck_core::{Error, Result};
use helpdeck_store::{DocumentStatus, SqliteStore};
use tracing::{info, warn};

/// Normalize one document's stored content and mark it processed.
///
/// A missing document is an error; a document whose content normalizes to
/// nothing is marked `failed` instead, so a worker loop can move on.
pub fn process_document(store: &SqliteStore, document_id: i64) -> Result<DocumentStatus> {
    let doc = store
        .get_document(document_id)?
        .ok_or_else(|| Error::NotFound(format!("document {}", document_id)))?;

    let normalized = normalize_content(doc.content_text());
    if normalized.is_empty() {
        warn!("Document {} has no usable text, marking failed", document_id);
        store.set_document_status(document_id, DocumentStatus::Failed)?;
        return Ok(DocumentStatus::Failed);
    }

    store.set_document_content(document_id, &normalized, DocumentStatus::Processed)?;
    info!(
        "Processed document {} ({} chars)",
        document_id,
        normalized.len()
    );
    Ok(DocumentStatus::Processed)
}

/// Flatten line endings, drop control characters, and collapse blank-line
/// runs down to one paragraph break.
fn normalize_content(raw: &str) -> String {
    let unified = raw.replace("\r\n", "\n").replace('\r', "\n");

    let mut out = String::with_capacity(unified.len());
    let mut newlines = 0;
    for c in unified.chars() {
        if c == '\n' {
            newlines += 1;
            if newlines <= 2 {
                out.push(c);
            }
            continue;
        }
        if c.is_control() && c != '\t' {
            continue;
        }
        newlines = 0;
        out.push(c);
    }
    out.trim().to_string()
}
