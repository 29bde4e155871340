use crate::auth::models::AuthUser;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use seva_core::AppError;
use seva_services::ChatMessage;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChatRequest {
    pub message: String,
    /// Prior turns of the conversation, oldest first.
    #[serde(default)]
    pub history: Vec<HistoryMessage>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct HistoryMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChatResponse {
    pub reply: String,
}

#[utoipa::path(
    post,
    path = "/api/assistant/chat",
    tag = "assistant",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Assistant reply", body = ChatResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Assistant not configured", body = ErrorResponse),
        (status = 503, description = "Assistant backend unavailable", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(user_id = %auth.user_id, operation = "assistant_chat"))]
pub async fn chat(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(request): Json<ChatRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let assistant = state
        .assistant
        .as_ref()
        .ok_or_else(|| AppError::NotFound("Assistant is not configured".to_string()))?;

    if request.message.trim().is_empty() {
        return Err(AppError::InvalidInput("Message must not be empty".to_string()).into());
    }

    let mut messages: Vec<ChatMessage> = request
        .history
        .into_iter()
        .map(|m| ChatMessage {
            role: m.role,
            content: m.content,
        })
        .collect();
    messages.push(ChatMessage::user(request.message));

    let reply = assistant.chat(&messages).await?;
    Ok(Json(ChatResponse { reply }))
}
