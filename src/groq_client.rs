//! Groq chat-completions gateway
//!
//! The only I/O-performing component. Issues a single JSON-mode completion
//! request at low sampling temperature with a bounded timeout, and maps every
//! transport problem into a `GatewayError` value.

use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::llm_client::{ChatMessage, GatewayError, LlmClient};

const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Default model offered to callers that do not pick one.
pub const DEFAULT_MODEL: &str = "llama3-70b-8192";

/// Low temperature to bias extraction toward determinism.
const TEMPERATURE: f32 = 0.1;

/// Upper bound on a single remote call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Chat-completions client for the Groq API.
#[derive(Clone)]
pub struct GroqClient {
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl GroqClient {
    /// Create a client with an explicit API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Create from the `GROQ_API_KEY` environment variable, on the default
    /// model.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GROQ_API_KEY")
            .map_err(|_| anyhow!("GROQ_API_KEY environment variable not set"))?;
        Ok(Self::new(api_key, DEFAULT_MODEL))
    }
}

#[async_trait]
impl LlmClient for GroqClient {
    async fn chat_json(&self, messages: &[ChatMessage]) -> Result<String, GatewayError> {
        let body = serde_json::json!({
            "model": &self.model,
            "messages": messages,
            "temperature": TEMPERATURE,
            "response_format": {"type": "json_object"},
        });

        let started = Instant::now();
        let response = self
            .client
            .post(GROQ_API_URL)
            .timeout(REQUEST_TIMEOUT)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status { status: status.as_u16(), body });
        }

        #[derive(Deserialize)]
        struct Message {
            content: String,
        }
        #[derive(Deserialize)]
        struct Choice {
            message: Message,
        }
        #[derive(Deserialize)]
        struct ApiResponse {
            choices: Vec<Choice>,
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        debug!(
            model = %self.model,
            latency_ms = started.elapsed().as_millis() as u64,
            "chat completion returned"
        );

        api_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(GatewayError::EmptyResponse)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
