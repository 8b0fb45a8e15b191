//! Conversation and message routes.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::state::AppState;
use helpdeck_runtime::ConversationRef;
use helpdeck_store::NewConversation;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/chatbots/{id}/conversations",
            get(list_conversations).post(create_conversation),
        )
        .route(
            "/conversations/{id}",
            get(get_conversation).delete(delete_conversation),
        )
        .route(
            "/conversations/{id}/messages",
            get(list_messages).post(post_message),
        )
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateConversationRequest {
    user_id: Option<String>,
    title: Option<String>,
    source: Option<String>,
}

async fn create_conversation(
    State(state): State<Arc<AppState>>,
    Path(chatbot_id): Path<i64>,
    Json(req): Json<CreateConversationRequest>,
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

    let new = NewConversation {
        chatbot_id,
        user_id: req.user_id,
        session_id: None,
        title: req.title.unwrap_or_else(|| "New conversation".to_string()),
        source: req.source.or_else(|| Some("api".to_string())),
    };

    match state.store.add_conversation(new) {
        Ok(id) => match state.store.get_conversation(id) {
            Ok(Some(conv)) => (
                StatusCode::CREATED,
                Json(serde_json::json!({ "conversation": conv })),
            ),
            _ => (StatusCode::CREATED, Json(serde_json::json!({ "id": id }))),
        },
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

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListConversationsQuery {
    user_id: Option<String>,
}

async fn list_conversations(
    State(state): State<Arc<AppState>>,
    Path(chatbot_id): Path<i64>,
    Query(query): Query<ListConversationsQuery>,
) -> impl IntoResponse {
    match state.store.list_conversations(chatbot_id, query.user_id.as_deref()) {
        Ok(convs) => (
            StatusCode::OK,
            Json(serde_json::json!({ "conversations": convs, "total": convs.len() })),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": e.to_string() })),
        ),
    }
}

async fn get_conversation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match state.store.get_conversation(id) {
        Ok(Some(conv)) => (StatusCode::OK, Json(serde_json::json!({ "conversation": conv }))),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "Conversation not found" })),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": e.to_string() })),
        ),
    }
}

async fn list_messages(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match state.store.get_conversation(id) {
        Ok(Some(_)) => {}
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({ "error": "Conversation not found" })),
            );
        }
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": e.to_string() })),
            );
        }
    }

    match state.store.list_messages(id) {
        Ok(messages) => (
            StatusCode::OK,
            Json(serde_json::json!({ "messages": messages, "total": messages.len() })),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": e.to_string() })),
        ),
    }
}

#[derive(Deserialize)]
struct PostMessageRequest {
    message: String,
}

/// POST /api/conversations/{id}/messages — run one chat turn. The reply is
/// always 200 once the conversation exists; degraded answers carry a lower
/// confidence rather than an error status.
async fn post_message(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<PostMessageRequest>,
) -> impl IntoResponse {
    let conversation = match state.store.get_conversation(id) {
        Ok(Some(conv)) => conv,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({ "error": "Conversation not found" })),
            );
        }
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": e.to_string() })),
            );
        }
    };

    let outcome = state.orchestrator.handle_message(
        &state.store,
        conversation.chatbot_id,
        ConversationRef::Id(id),
        &req.message,
    );

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "reply": outcome.reply.text,
            "confidence": outcome.reply.confidence,
            "sources": outcome.reply.sources,
            "tier": outcome.tier,
            "conversationId": outcome.conversation_id,
            "userMessageId": outcome.user_message_id,
            "assistantMessageId": outcome.assistant_message_id,
        })),
    )
}

async fn delete_conversation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match state.store.delete_conversation(id) {
        Ok(true) => (StatusCode::OK, Json(serde_json::json!({ "deleted": true, "id": id }))),
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "Conversation not found" })),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": e.to_string() })),
        ),
    }
}
