//! Chat routes — the butler's conversational surface.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use butler_chat::ChatMessage;
use serde::Deserialize;
use tracing::warn;

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/chat", get(get_chat).post(post_chat))
}

#[derive(Debug, Deserialize)]
pub struct ChatBody {
    pub prompt: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatQuery {
    pub prompt: Option<String>,
}

/// POST /api/v1/chat — `{"prompt": ...}` in, `{"response": ...}` out.
async fn post_chat(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ChatBody>,
) -> impl IntoResponse {
    let context = home_context(&state).await;
    match state.llm.chat(&body.prompt, context.as_deref()).await {
        Ok(message) => (
            StatusCode::OK,
            Json(serde_json::json!({ "response": message.content })),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": e.to_string() })),
        ),
    }
}

/// GET /api/v1/chat?prompt=... — returns the full chat message; failures
/// come back as an error-role message.
async fn get_chat(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ChatQuery>,
) -> impl IntoResponse {
    let Some(prompt) = query.prompt else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "missing prompt" })),
        );
    };

    let context = home_context(&state).await;
    let (status, message) = match state.llm.chat(&prompt, context.as_deref()).await {
        Ok(message) => (StatusCode::OK, message),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, ChatMessage::error(&e)),
    };
    (
        status,
        Json(serde_json::to_value(&message).unwrap_or_default()),
    )
}

/// Fetch the home context block when Home Assistant is configured. Context
/// failures degrade to a contextless prompt rather than failing the chat.
async fn home_context(state: &AppState) -> Option<String> {
    let home = state.home.as_ref()?;
    match home.context().await {
        Ok(context) if !context.is_empty() => Some(context),
        Ok(_) => None,
        Err(e) => {
            warn!("failed to fetch home context: {}", e);
            None
        }
    }
}
