//! Background workers for sentiment tagging and document processing.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::state::AppState;

/// Start the sentiment worker. Jobs are queued by the orchestrator after each
/// user message; failures are logged and dropped without retry.
pub fn start_sentiment_worker(state: Arc<AppState>) {
    let mut rx = match state.take_sentiment_rx() {
        Some(rx) => rx,
        None => {
            error!("Sentiment worker already started");
            return;
        }
    };

    tokio::spawn(async move {
        info!("Sentiment worker started");
        while let Some(job) = rx.recv().await {
            match helpdeck_runtime::record_sentiment(&state.store, &job) {
                Ok(_) => debug!("Recorded sentiment for message {}", job.message_id),
                Err(e) => warn!("Sentiment tagging failed for message {}: {}", job.message_id, e),
            }
        }
        info!("Sentiment worker stopped");
    });
}

/// Start the document processing worker. Picks up documents left in
/// `processing` by a previous run before draining the live queue.
pub fn start_processing_worker(state: Arc<AppState>) {
    let mut rx = match state.take_processing_rx() {
        Some(rx) => rx,
        None => {
            error!("Processing worker already started");
            return;
        }
    };

    tokio::spawn(async move {
        info!("Document processing worker started");

        catch_up_pending(&state);

        while let Some(job) = rx.recv().await {
            if let Err(e) = helpdeck_runtime::process_document(&state.store, job.document_id) {
                error!("Failed to process document {}: {}", job.document_id, e);
            }
        }
        info!("Document processing worker stopped");
    });
}

fn catch_up_pending(state: &AppState) {
    let batch_size = 50;
    let mut total = 0;

    loop {
        let pending = match state.store.pending_documents(batch_size) {
            Ok(docs) => docs,
            Err(e) => {
                error!("Failed to list pending documents: {}", e);
                break;
            }
        };
        if pending.is_empty() {
            break;
        }

        let mut advanced = 0;
        for doc in &pending {
            match helpdeck_runtime::process_document(&state.store, doc.id) {
                Ok(_) => {
                    advanced += 1;
                    total += 1;
                }
                Err(e) => error!("Failed to process document {}: {}", doc.id, e),
            }
        }
        // A stuck batch would refetch forever; bail if nothing moved.
        if advanced == 0 {
            break;
        }
    }

    if total > 0 {
        info!("Processed {} documents left over from a previous run", total);
    }
}
