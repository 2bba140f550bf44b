//! LLM client abstraction
//!
//! The single capability seam in front of the remote model. The resolver and
//! fallback logic only ever see this trait, so the whole pipeline is testable
//! with a scripted in-memory client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Conversation roles understood by chat-completion APIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One conversation turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: ChatRole::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: ChatRole::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: ChatRole::Assistant, content: content.into() }
    }
}

/// Transport-level failure from the model gateway.
///
/// These are values, not panics: nothing escapes the gateway boundary except
/// this type. Retrying is a resolver policy decision; the gateway itself
/// never retries.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Network failure or timeout before a response arrived.
    #[error("API request failed: {0}")]
    Transport(String),

    /// Non-2xx HTTP status, with whatever body was available.
    #[error("API error {status}: {body}")]
    Status { status: u16, body: String },

    /// A 2xx response that carried no usable completion.
    #[error("model returned no choices")]
    EmptyResponse,
}

/// Chat-completion client used by the intent resolver.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send an ordered conversation expecting a JSON-object completion, and
    /// return the raw text content of the first choice.
    async fn chat_json(&self, messages: &[ChatMessage]) -> Result<String, GatewayError>;

    /// Model name, for logging.
    fn model_name(&self) -> &str;
}
