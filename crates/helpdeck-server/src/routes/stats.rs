//! Health and stats routes.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(get_health))
        .route("/stats", get(get_stats))
}

/// GET /api/health — liveness check.
async fn get_health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "helpdeck",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// GET /api/stats — storage statistics.
async fn get_stats(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let stats = state.store.get_stats().unwrap_or_else(|_| helpdeck_store::StoreStats {
        total_chatbots: 0,
        total_documents: 0,
        documents_processing: 0,
        documents_processed: 0,
        documents_failed: 0,
        total_conversations: 0,
        total_messages: 0,
        total_sentiments: 0,
        db_path: String::new(),
        db_size_mb: 0.0,
    });

    Json(serde_json::json!({
        "chatbots": stats.total_chatbots,
        "conversations": stats.total_conversations,
        "messages": stats.total_messages,
        "sentiments": stats.total_sentiments,
        "documents": {
            "total": stats.total_documents,
            "processing": stats.documents_processing,
            "processed": stats.documents_processed,
            "failed": stats.documents_failed,
        },
        "dbPath": stats.db_path,
        "dbSizeMb": stats.db_size_mb,
    }))
}
