//! Assistant chat route handlers.
//!
//! The transcript is held by the client and sent back with every message.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use shopyz_core::chat::accepts_user_input;
use shopyz_core::{ChatMessage, Language, Product};

use crate::error::{AppError, Result};
use crate::routes::products::LanguageParams;
use crate::state::AppState;

/// Chat request.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Conversation so far, oldest first.
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    pub message: String,
    #[serde(default)]
    pub language: Language,
}

/// Chat response.
#[derive(Debug, Serialize)]
pub struct ChatView {
    /// Conversation including the new user message and the reply.
    pub messages: Vec<ChatMessage>,
    pub reply: ChatMessage,
}

/// Opening message in the shopper's language.
pub async fn welcome(Query(params): Query<LanguageParams>) -> Json<ChatMessage> {
    Json(ChatMessage::welcome(params.lang))
}

/// Send a message and get the assistant's reply.
///
/// Generation failures still produce a reply: the localized apology.
#[instrument(skip(state, request), fields(language = ?request.language))]
pub async fn send(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatView>> {
    if !accepts_user_input(&request.message) {
        return Err(AppError::BadRequest("message is empty".to_string()));
    }

    let mut messages = request.messages;
    messages.push(ChatMessage::user(request.message.trim()));

    let products: Vec<Product> = state.catalog().read().await.products().to_vec();
    let reply = state
        .assistant()
        .reply(&messages, &products, request.language)
        .await;

    messages.push(reply.clone());
    Ok(Json(ChatView { messages, reply }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_defaults() {
        let request: ChatRequest = serde_json::from_str(r#"{"message": "hi"}"#).unwrap();
        assert!(request.messages.is_empty());
        assert_eq!(request.language, Language::En);
    }
}
