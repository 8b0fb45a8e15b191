//! Embeddable widget routes. These power the chat bubble on customer sites,
//! keyed by session rather than by conversation ID.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::state::AppState;
use helpdeck_runtime::ConversationRef;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/widget/chat", post(widget_chat))
        .route("/widget/{chatbot_id}/config", get(widget_config))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WidgetChatRequest {
    chatbot_id: i64,
    message: String,
    session_id: Option<String>,
}

/// POST /api/widget/chat — one widget chat turn. A missing session ID starts
/// a fresh conversation; the generated session comes back in the response so
/// the widget can carry it forward.
async fn widget_chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<WidgetChatRequest>,
) -> impl IntoResponse {
    let outcome = state.orchestrator.handle_message(
        &state.store,
        req.chatbot_id,
        ConversationRef::Session(req.session_id),
        &req.message,
    );

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "reply": outcome.reply.text,
            "confidence": outcome.reply.confidence,
            "sessionId": outcome.session_id,
            "conversationId": outcome.conversation_id,
        })),
    )
}

/// GET /api/widget/{chatbot_id}/config — widget bootstrap config with
/// defaults filled in for anything the owner never customized.
async fn widget_config(
    State(state): State<Arc<AppState>>,
    Path(chatbot_id): Path<i64>,
) -> impl IntoResponse {
    let bot = match state.store.get_chatbot(chatbot_id) {
        Ok(Some(bot)) if bot.active => bot,
        Ok(_) => {
            return (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({ "error": "Chatbot not available" })),
            );
        }
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": e.to_string() })),
            );
        }
    };

    let cfg = bot.widget_config();

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "chatbotId": bot.id,
            "name": bot.name,
            "title": cfg.title.unwrap_or_else(|| bot.name.clone()),
            "accentColor": cfg.accent_color.unwrap_or_else(|| "#4f46e5".to_string()),
            "greeting": cfg
                .greeting
                .unwrap_or_else(|| format!("Hi! I'm {}. How can I help?", bot.name)),
        })),
    )
}
