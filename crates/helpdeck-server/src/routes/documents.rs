//! Knowledge base document routes.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::warn;

use crate::state::AppState;
use helpdeck_runtime::ProcessingJob;
use helpdeck_store::NewDocument;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/chatbots/{id}/documents",
            get(list_documents).post(add_document),
        )
        .route("/documents/{id}", get(get_document).delete(delete_document))
}

#[derive(Deserialize)]
struct AddDocumentRequest {
    name: Option<String>,
    url: Option<String>,
    content: String,
}

/// POST /api/chatbots/{id}/documents — upload a document and queue it for
/// processing. The row stays in `processing` until the worker runs.
async fn add_document(
    State(state): State<Arc<AppState>>,
    Path(chatbot_id): Path<i64>,
    Json(req): Json<AddDocumentRequest>,
) -> impl IntoResponse {
    match state.store.get_chatbot(chatbot_id) {
        Ok(Some(_)) => {}
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({ "error": "Chatbot not found" })),
            );
        }
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": e.to_string() })),
            );
        }
    }

    let new = NewDocument {
        chatbot_id,
        name: req.name,
        url: req.url,
        content: req.content,
    };

    match state.store.add_document(new) {
        Ok(document_id) => {
            if state.processing_tx.send(ProcessingJob { document_id }).is_err() {
                warn!("Processing queue closed, document {} waits for restart", document_id);
            }
            (
                StatusCode::CREATED,
                Json(serde_json::json!({
                    "documentId": document_id,
                    "status": "processing",
                })),
            )
        }
        Err(helpdeck_core::Error::DuplicateContent(_)) => (
            StatusCode::CONFLICT,
            Json(serde_json::json!({ "error": "Duplicate content" })),
        ),
        Err(helpdeck_core::Error::Validation(msg)) => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": msg })),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": e.to_string() })),
        ),
    }
}

async fn list_documents(
    State(state): State<Arc<AppState>>,
    Path(chatbot_id): Path<i64>,
) -> impl IntoResponse {
    match state.store.list_documents(chatbot_id) {
        Ok(docs) => (
            StatusCode::OK,
            Json(serde_json::json!({ "documents": docs, "total": docs.len() })),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": e.to_string() })),
        ),
    }
}

async fn get_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match state.store.get_document(id) {
        Ok(Some(doc)) => (StatusCode::OK, Json(serde_json::json!({ "document": doc }))),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "Document not found" })),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": e.to_string() })),
        ),
    }
}

async fn delete_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match state.store.delete_document(id) {
        Ok(true) => (StatusCode::OK, Json(serde_json::json!({ "deleted": true, "id": id }))),
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "Document not found" })),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": e.to_string() })),
        ),
    }
}
