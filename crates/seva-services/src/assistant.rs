//! Chat assistant proxy.
//!
//! Thin client for the configured chat-completions backend. Unlike the
//! verification dispatcher, upstream failures here are surfaced as
//! `UpstreamUnavailable` - there is no domain result to absorb them into,
//! and the caller can simply retry.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::json;
use seva_core::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        ChatMessage {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Pull the assistant reply out of an upstream response body. Accepts the
/// plain `{reply}` / `{message}` shapes as well as the chat-completions
/// `{choices: [{message: {content}}]}` layout.
fn extract_reply(value: &serde_json::Value) -> Option<String> {
    if let Some(reply) = value.get("reply").and_then(|v| v.as_str()) {
        return Some(reply.to_string());
    }
    if let Some(message) = value.get("message").and_then(|v| v.as_str()) {
        return Some(message.to_string());
    }
    value
        .get("choices")?
        .get(0)?
        .get("message")?
        .get("content")?
        .as_str()
        .map(|s| s.to_string())
}

#[derive(Clone)]
pub struct AssistantService {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl AssistantService {
    pub fn new(
        endpoint: String,
        api_key: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| {
                AppError::Internal(format!("Failed to create assistant HTTP client: {}", e))
            })?;
        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }

    /// Forward the conversation to the assistant backend and return its reply.
    pub async fn chat(&self, messages: &[ChatMessage]) -> Result<String, AppError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "messages": messages }));
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await.map_err(|e| {
            tracing::warn!(error = %e, "Assistant backend request failed");
            if e.is_timeout() {
                AppError::UpstreamUnavailable("Assistant backend timed out".to_string())
            } else {
                AppError::UpstreamUnavailable("Assistant backend unreachable".to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = %status, "Assistant backend returned an error status");
            return Err(AppError::UpstreamUnavailable(format!(
                "Assistant backend responded with status {}",
                status
            )));
        }

        let body: serde_json::Value = response.json().await.map_err(|e| {
            AppError::UpstreamUnavailable(format!("Assistant backend sent malformed JSON: {}", e))
        })?;

        extract_reply(&body).ok_or_else(|| {
            AppError::UpstreamUnavailable("Assistant backend sent an empty reply".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_reply_plain_shapes() {
        let value = json!({"reply": "Namaste! How can I help?"});
        assert_eq!(
            extract_reply(&value).as_deref(),
            Some("Namaste! How can I help?")
        );

        let value = json!({"message": "hello"});
        assert_eq!(extract_reply(&value).as_deref(), Some("hello"));
    }

    #[test]
    fn test_extract_reply_chat_completions_shape() {
        let value = json!({
            "choices": [{"message": {"role": "assistant", "content": "You may be eligible for Ayushman Bharat."}}]
        });
        assert_eq!(
            extract_reply(&value).as_deref(),
            Some("You may be eligible for Ayushman Bharat.")
        );
    }

    #[test]
    fn test_extract_reply_rejects_unknown_shapes() {
        assert!(extract_reply(&json!({})).is_none());
        assert!(extract_reply(&json!({"choices": []})).is_none());
        assert!(extract_reply(&json!({"reply": 42})).is_none());
    }

    #[test]
    fn test_chat_message_constructor() {
        let message = ChatMessage::user("what schemes do I qualify for?");
        assert_eq!(message.role, "user");
        assert_eq!(message.content, "what schemes do I qualify for?");
    }
}
