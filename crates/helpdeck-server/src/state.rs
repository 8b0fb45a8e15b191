//! Shared application state.

use helpdeck_core::HelpDeckConfig;
use helpdeck_runtime::{Orchestrator, ProcessingJob, SentimentJob};
use helpdeck_store::SqliteStore;
use tokio::sync::mpsc;

pub struct AppState {
    pub config: HelpDeckConfig,
    pub store: SqliteStore,
    pub orchestrator: Orchestrator,
    pub processing_tx: mpsc::UnboundedSender<ProcessingJob>,
    sentiment_rx: parking_lot::Mutex<Option<mpsc::UnboundedReceiver<SentimentJob>>>,
    processing_rx: parking_lot::Mutex<Option<mpsc::UnboundedReceiver<ProcessingJob>>>,
}

impl AppState {
    pub fn new(config: HelpDeckConfig, store: SqliteStore) -> Self {
        let (sentiment_tx, sentiment_rx) = mpsc::unbounded_channel();
        let (processing_tx, processing_rx) = mpsc::unbounded_channel();

        Self {
            config,
            store,
            orchestrator: Orchestrator::new(sentiment_tx),
            processing_tx,
            sentiment_rx: parking_lot::Mutex::new(Some(sentiment_rx)),
            processing_rx: parking_lot::Mutex::new(Some(processing_rx)),
        }
    }

    /// Take the sentiment job receiver (can only be taken once, by the worker).
    pub fn take_sentiment_rx(&self) -> Option<mpsc::UnboundedReceiver<SentimentJob>> {
        self.sentiment_rx.lock().take()
    }

    /// Take the document processing receiver (can only be taken once, by the worker).
    pub fn take_processing_rx(&self) -> Option<mpsc::UnboundedReceiver<ProcessingJob>> {
        self.processing_rx.lock().take()
    }
}
