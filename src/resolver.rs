//! Intent resolution pipeline
//!
//! Builds the extraction prompt from the catalog, the ticket schema and the
//! customer inputs, drives the remote model through at most two calls, and
//! degrades to deterministic fallback synthesis whenever the model path
//! cannot produce a schema-valid ticket.
//!
//! The call policy is a small state machine:
//!
//! ```text
//! FirstCall ── transport error ──────────────► Fallback
//!     │ parse ok ──► Accept ── schema ok ──► return ticket
//!     │                  └── schema fail ──► Fallback
//!     └ parse fail ──► Retry ── transport error / parse fail ──► Fallback
//!                        └── parse ok ──► Accept (as above)
//! ```
//!
//! Exactly one self-correction retry, and only for decode failures. A schema
//! failure is never retried against the model.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ResolveError;
use crate::fallback;
use crate::groq_client::GroqClient;
use crate::llm_client::{ChatMessage, LlmClient};
use crate::menu::Menu;
use crate::preferences::PreferenceInput;
use crate::schema::TicketSchema;
use crate::ticket::ResolvedTicket;

/// Orchestrates prompt construction, model invocation, validation and
/// fallback for one order at a time.
pub struct IntentResolver {
    client: Arc<dyn LlmClient>,
    menu: Arc<Menu>,
    schema: Arc<TicketSchema>,
}

/// Transitions of the resolution state machine.
enum Step {
    FirstCall,
    Retry { invalid_output: String, reason: String },
    Accept(Value),
    Fallback { reason: String },
}

impl IntentResolver {
    /// Resolver over the builtin catalog and schema. The builtin data is
    /// shared, not copied; constructing a resolver per request is cheap.
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self::with_catalog(client, Menu::builtin_shared(), TicketSchema::builtin_shared())
    }

    /// Resolver over a substituted catalog and schema.
    pub fn with_catalog(client: Arc<dyn LlmClient>, menu: Arc<Menu>, schema: Arc<TicketSchema>) -> Self {
        Self { client, menu, schema }
    }

    /// Resolve one order into a kitchen ticket. Never fails: every model-path
    /// problem degrades to the deterministic fallback ticket.
    pub async fn resolve(&self, user_text: &str, prefs: &PreferenceInput) -> ResolvedTicket {
        let mut conversation = vec![
            ChatMessage::system(self.build_system_prompt()),
            ChatMessage::user(build_user_message(user_text, prefs)),
        ];

        let mut step = Step::FirstCall;
        loop {
            step = match step {
                Step::FirstCall => match self.call_model(&conversation).await {
                    Err(reason) => Step::Fallback { reason },
                    Ok(content) => match parse_ticket_json(&content) {
                        Ok(value) => Step::Accept(value),
                        Err(reason) => Step::Retry { invalid_output: content, reason },
                    },
                },

                Step::Retry { invalid_output, reason } => {
                    warn!(%reason, "model output was not decodable, retrying once");
                    conversation.push(ChatMessage::assistant(invalid_output));
                    conversation.push(ChatMessage::user(format!(
                        "Your response was not valid JSON: {}. Fix it and respond with ONLY the corrected JSON object.",
                        reason
                    )));
                    match self.call_model(&conversation).await {
                        Err(reason) => Step::Fallback { reason },
                        Ok(content) => match parse_ticket_json(&content) {
                            Ok(value) => Step::Accept(value),
                            Err(reason) => Step::Fallback {
                                reason: format!("model failed to produce decodable JSON twice: {}", reason),
                            },
                        },
                    }
                }

                Step::Accept(value) => match self.schema.validate(&value) {
                    Ok(()) => {
                        debug!("ticket accepted from model");
                        return ResolvedTicket::from_value(value);
                    }
                    Err(reason) => Step::Fallback { reason: format!("schema validation failed: {}", reason) },
                },

                Step::Fallback { reason } => {
                    return fallback::synthesize(&self.menu, user_text, prefs, &reason);
                }
            };
        }
    }

    async fn call_model(&self, conversation: &[ChatMessage]) -> Result<String, String> {
        debug!(
            model = self.client.model_name(),
            turns = conversation.len(),
            "issuing chat completion"
        );
        self.client.chat_json(conversation).await.map_err(|e| {
            warn!(error = %e, "chat completion failed");
            e.to_string()
        })
    }

    fn build_system_prompt(&self) -> String {
        format!(
            r#"# Kitchen Ticket Extraction

You are the order-intake engine for an Indian restaurant. Convert the customer's intent (structured preference controls plus free text) into a kitchen-ready JSON ticket.

## Menu

{menu}

## Rules

1. Strict mapping: order items ONLY from the menu above. Never invent dishes.
2. Dietary safety: if a stated constraint (e.g. Vegan) conflicts with a matched item's tags (e.g. "dairy"), set "conflict_flag": true and explain in "conflict_message". If the request is unsafe (raw or undercooked food), set "confirm_with_customer": true.
3. Taste profile: merge the explicit preference controls with the free text. The text takes precedence wherever both specify a value.
4. Output format: respond with a single JSON object strictly matching this schema:

{schema}

5. Ambiguity: if the text is vague (e.g. "bring me food"), set "confirm_with_customer": true and fill "clarification_question".
6. Confidence: score your matching confidence from 0.0 to 1.0, and list "ambiguity_reasons" whenever it is below 1.0.
"#,
            menu = self.menu.as_prompt_context(),
            schema = self.schema.as_prompt_context(),
        )
    }
}

fn build_user_message(user_text: &str, prefs: &PreferenceInput) -> String {
    format!(
        "## Customer Inputs\n- Free text: \"{}\"\n- Preference controls: {}\n\nProduce the kitchen ticket JSON.",
        user_text,
        prefs.as_prompt_json()
    )
}

/// Strip an optional leading code-fence marker and an optional trailing one,
/// then decode. The strip is idempotent: already-bare JSON passes through.
fn parse_ticket_json(content: &str) -> Result<Value, String> {
    let mut cleaned = content.trim();
    if let Some(rest) = cleaned.strip_prefix("```json") {
        cleaned = rest;
    } else if let Some(rest) = cleaned.strip_prefix("```") {
        cleaned = rest;
    }
    if let Some(rest) = cleaned.strip_suffix("```") {
        cleaned = rest;
    }
    serde_json::from_str(cleaned.trim()).map_err(|e| e.to_string())
}

/// Resolve one customer order end to end.
///
/// An empty `api_key` falls back to the `GROQ_API_KEY` environment variable;
/// absence of both is the only error this function returns, and it is
/// detected before any remote interaction.
pub async fn resolve_order(
    user_text: &str,
    prefs: &PreferenceInput,
    api_key: &str,
    model_name: &str,
) -> Result<ResolvedTicket, ResolveError> {
    let key = if api_key.is_empty() {
        std::env::var("GROQ_API_KEY").map_err(|_| ResolveError::MissingApiKey)?
    } else {
        api_key.to_string()
    };

    let client = Arc::new(GroqClient::new(key, model_name));
    let resolver = IntentResolver::new(client);
    Ok(resolver.resolve(user_text, prefs).await)
}
