use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::llm_client::prompts::build_chat_messages;
use crate::llm_client::ChatMessage;
use crate::rag::DEFAULT_TOP_K;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub history: Option<Vec<ChatMessage>>,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// POST /chat
/// Grounds the model on the top résumé snippets for the message, then forwards
/// the conversation to the chat backend.
pub async fn chat_handler(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let message = req.message.trim();
    if message.is_empty() {
        return Err(AppError::Validation("message must not be empty".to_string()));
    }
    if req.top_k < 1 {
        return Err(AppError::Validation("top_k must be at least 1".to_string()));
    }

    let history = req.history.unwrap_or_default();
    let index = state.index().await?;
    let snippets = index.search(message, req.top_k);
    let messages = build_chat_messages(
        &index.resume().basics.name,
        &snippets,
        &history,
        message,
    );

    tracing::debug!(
        "Chat request: {} snippets, {} history turns",
        snippets.len(),
        history.len()
    );

    let reply = state.llm.complete(&messages).await?;
    Ok(Json(ChatResponse { reply }))
}
