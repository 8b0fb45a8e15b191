//! API shape tests — validates that response shapes match what the widget
//! script and dashboard client expect.
//!
//! These check field names and types on the JSON each route produces, so a
//! rename in a handler shows up here before it breaks an embedded widget.

/// Widget chat response: { reply, confidence, sessionId, conversationId }.
/// The widget stores sessionId and echoes it on every subsequent turn.
#[test]
fn test_widget_chat_response_shape() {
    let response = serde_json::json!({
        "reply": "Hello! I'm Ada. How can I help you today?",
        "confidence": 0.9,
        "sessionId": "0b5c7c54-9f1d-4f2e-8a3b-2f8e6f1c9d10",
        "conversationId": 12,
    });

    assert!(response["reply"].is_string());
    assert!(response["confidence"].is_number());
    assert!(response["sessionId"].is_string());
    assert!(response["conversationId"].is_number());
}

/// A degraded widget turn (unknown chatbot) still returns the same shape,
/// with null session and conversation IDs.
#[test]
fn test_widget_chat_degraded_response_shape() {
    let response = serde_json::json!({
        "reply": "Sorry, this assistant isn't available right now. Please try again later.",
        "confidence": 0.0,
        "sessionId": null,
        "conversationId": null,
    });

    assert!(response["reply"].is_string());
    assert!(response["confidence"].is_number());
    assert!(response["sessionId"].is_null());
    assert!(response["conversationId"].is_null());
}

/// Conversation message response: the dashboard reads reply, confidence,
/// sources, tier, and the two message IDs.
#[test]
fn test_post_message_response_shape() {
    let response = serde_json::json!({
        "reply": "Based on my knowledge base, here's what I found: Refunds are processed within 30 days.",
        "confidence": 0.8,
        "sources": ["Refund policy"],
        "tier": "native",
        "conversationId": 3,
        "userMessageId": 41,
        "assistantMessageId": 42,
    });

    assert!(response["reply"].is_string());
    assert!(response["confidence"].is_number());
    assert!(response["sources"].is_array());
    assert!(response["tier"].is_string());
    assert!(response["conversationId"].is_number());
    assert!(response["userMessageId"].is_number());
    assert!(response["assistantMessageId"].is_number());
}

/// Tier serializes lowercase; the dashboard shows it as a badge.
#[test]
fn test_tier_values_are_lowercase() {
    for tier in ["native", "template", "generic"] {
        let response = serde_json::json!({ "tier": tier });
        assert_eq!(response["tier"].as_str().unwrap(), tier);
    }
}

/// Chatbot entity as serialized inside { "chatbot": ... } envelopes.
#[test]
fn test_chatbot_entity_shape() {
    let response = serde_json::json!({
        "chatbot": {
            "id": 1,
            "account_id": "acct_42",
            "name": "Ada",
            "description": "Support assistant for Acme",
            "instructions": "You help customers with billing and shipping.",
            "active": true,
            "created_at": 1756100000000_i64,
        }
    });

    let bot = &response["chatbot"];
    assert!(bot["id"].is_number());
    assert!(bot["account_id"].is_string());
    assert!(bot["name"].is_string());
    assert!(bot["instructions"].is_string());
    assert!(bot["active"].is_boolean());
    assert!(bot["created_at"].is_number());
}

/// Document upload response: { documentId, status } with status always
/// "processing" until the worker runs.
#[test]
fn test_add_document_response_shape() {
    let response = serde_json::json!({
        "documentId": 7,
        "status": "processing",
    });

    assert!(response["documentId"].is_number());
    assert_eq!(response["status"].as_str().unwrap(), "processing");
}

/// Widget config response: everything resolved, no nulls. The widget reads
/// title, accentColor, and greeting without fallback logic of its own.
#[test]
fn test_widget_config_response_shape() {
    let response = serde_json::json!({
        "chatbotId": 1,
        "name": "Ada",
        "title": "Chat with Ada",
        "accentColor": "#4f46e5",
        "greeting": "Hi! I'm Ada. How can I help?",
    });

    assert!(response["chatbotId"].is_number());
    assert!(response["name"].is_string());
    assert!(response["title"].is_string());
    assert!(response["accentColor"].is_string());
    assert!(response["greeting"].is_string());
}

/// Stats response shape used by the dashboard overview page.
#[test]
fn test_stats_response_shape() {
    let response = serde_json::json!({
        "chatbots": 4,
        "conversations": 120,
        "messages": 840,
        "sentiments": 410,
        "documents": {
            "total": 31,
            "processing": 1,
            "processed": 29,
            "failed": 1,
        },
        "dbPath": "/data/db/helpdeck.db",
        "dbSizeMb": 2.4,
    });

    assert!(response["chatbots"].is_number());
    assert!(response["conversations"].is_number());
    assert!(response["messages"].is_number());
    assert!(response["sentiments"].is_number());
    assert!(response["documents"].is_object());
    assert!(response["documents"]["total"].is_number());
    assert!(response["documents"]["processing"].is_number());
    assert!(response["documents"]["processed"].is_number());
    assert!(response["documents"]["failed"].is_number());
    assert!(response["dbSizeMb"].is_number());
}

/// Health response shape used by deploy probes.
#[test]
fn test_health_response_shape() {
    let response = serde_json::json!({
        "status": "ok",
        "service": "helpdeck",
        "timestamp": "2026-08-25T12:00:00+00:00",
    });

    assert_eq!(response["status"].as_str().unwrap(), "ok");
    assert_eq!(response["service"].as_str().unwrap(), "helpdeck");
    assert!(response["timestamp"].is_string());
}

/// Error envelope: every non-2xx body is { "error": string }.
#[test]
fn test_error_response_shape() {
    let response = serde_json::json!({ "error": "Chatbot not found" });

    assert!(response["error"].is_string());
    assert!(response.get("reply").is_none());
}
