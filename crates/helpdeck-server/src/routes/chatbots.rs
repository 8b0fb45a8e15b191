//! Chatbot CRUD routes for the account dashboard.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::state::AppState;
use helpdeck_store::{ChatbotUpdate, NewChatbot};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/chatbots", get(list_chatbots).post(create_chatbot))
        .route(
            "/chatbots/{id}",
            get(get_chatbot).put(update_chatbot).delete(delete_chatbot),
        )
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateChatbotRequest {
    account_id: String,
    name: String,
    description: Option<String>,
    instructions: Option<String>,
    widget: Option<serde_json::Value>,
}

async fn create_chatbot(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateChatbotRequest>,
) -> impl IntoResponse {
    let new = NewChatbot {
        account_id: req.account_id,
        name: req.name,
        description: req.description,
        instructions: req.instructions.unwrap_or_default(),
        widget: req.widget,
    };

    match state.store.add_chatbot(new) {
        Ok(id) => match state.store.get_chatbot(id) {
            Ok(Some(bot)) => (StatusCode::CREATED, Json(serde_json::json!({ "chatbot": bot }))),
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
struct ListChatbotsQuery {
    account_id: String,
}

async fn list_chatbots(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListChatbotsQuery>,
) -> impl IntoResponse {
    match state.store.list_chatbots(&query.account_id) {
        Ok(bots) => (
            StatusCode::OK,
            Json(serde_json::json!({ "chatbots": bots, "total": bots.len() })),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": e.to_string() })),
        ),
    }
}

async fn get_chatbot(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match state.store.get_chatbot(id) {
        Ok(Some(bot)) => (StatusCode::OK, Json(serde_json::json!({ "chatbot": bot }))),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "Chatbot not found" })),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": e.to_string() })),
        ),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateChatbotRequest {
    name: Option<String>,
    description: Option<String>,
    instructions: Option<String>,
    active: Option<bool>,
    widget: Option<serde_json::Value>,
}

async fn update_chatbot(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateChatbotRequest>,
) -> impl IntoResponse {
    let update = ChatbotUpdate {
        name: req.name,
        description: req.description,
        instructions: req.instructions,
        active: req.active,
        widget: req.widget,
    };

    match state.store.update_chatbot(id, update) {
        Ok(true) => match state.store.get_chatbot(id) {
            Ok(Some(bot)) => (StatusCode::OK, Json(serde_json::json!({ "chatbot": bot }))),
            _ => (StatusCode::OK, Json(serde_json::json!({ "updated": true }))),
        },
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "Chatbot not found" })),
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

async fn delete_chatbot(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match state.store.delete_chatbot(id) {
        Ok(true) => (StatusCode::OK, Json(serde_json::json!({ "deleted": true, "id": id }))),
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "Chatbot not found" })),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": e.to_string() })),
        ),
    }
}
