//! End-to-end tests of the resolution state machine against a scripted
//! in-memory model client: call counting, the single self-correction retry,
//! transport-error and schema-failure routing, and fallback synthesis.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use waiter_agentic::{
    fallback, ChatMessage, ChatRole, DishRecord, GatewayError, IntentResolver, LlmClient, Menu,
    MenuCategory, PreferenceInput, TicketSchema,
};

/// Replays a fixed sequence of gateway outcomes and records every
/// conversation it was sent.
struct ScriptedClient {
    responses: Mutex<Vec<Result<String, GatewayError>>>,
    calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedClient {
    fn new(responses: Vec<Result<String, GatewayError>>) -> Self {
        let mut responses = responses;
        responses.reverse();
        Self {
            responses: Mutex::new(responses),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn conversation(&self, call: usize) -> Vec<ChatMessage> {
        self.calls.lock().unwrap()[call].clone()
    }
}

#[async_trait]
impl LlmClient for ScriptedClient {
    async fn chat_json(&self, messages: &[ChatMessage]) -> Result<String, GatewayError> {
        self.calls.lock().unwrap().push(messages.to_vec());
        self.responses
            .lock()
            .unwrap()
            .pop()
            .expect("scripted client ran out of responses")
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

fn resolver_with(client: Arc<ScriptedClient>) -> IntentResolver {
    IntentResolver::new(client)
}

fn valid_ticket_json() -> Value {
    json!({
        "ordered_items": [
            {"name": "Masala Dosa", "quantity": 1, "notes": "crispy"}
        ],
        "dietary_constraints": ["Vegetarian"],
        "taste_profile": {
            "spice_level": "Medium",
            "oil_level": "Low",
            "sweetness": "Low",
            "salt_level": "Normal"
        },
        "cooking_notes": "",
        "confirm_with_customer": false,
        "confidence_score": 0.95,
        "ambiguity_reasons": [],
        "conflict_flag": false,
        "extra_model_field": {"kept": true}
    })
}

#[tokio::test]
async fn valid_first_response_is_returned_unchanged() {
    let expected = valid_ticket_json();
    let client = Arc::new(ScriptedClient::new(vec![Ok(expected.to_string())]));
    let resolver = resolver_with(client.clone());

    let ticket = resolver
        .resolve("one masala dosa", &PreferenceInput::default())
        .await;

    assert_eq!(client.call_count(), 1);
    // The accepted value passes through untouched, unknown fields included.
    assert_eq!(ticket.as_value(), &expected);
}

#[tokio::test]
async fn fenced_response_decodes_like_bare_response() {
    let expected = valid_ticket_json();
    let fenced = format!("```json\n{}\n```", expected);
    let client = Arc::new(ScriptedClient::new(vec![Ok(fenced)]));
    let resolver = resolver_with(client.clone());

    let ticket = resolver.resolve("dosa", &PreferenceInput::default()).await;

    assert_eq!(client.call_count(), 1);
    assert_eq!(ticket.as_value(), &expected);
}

#[tokio::test]
async fn transport_error_on_first_call_goes_straight_to_fallback() {
    let client = Arc::new(ScriptedClient::new(vec![Err(GatewayError::Transport(
        "connection timed out".into(),
    ))]));
    let resolver = resolver_with(client.clone());

    let ticket = resolver
        .resolve("I want a Masala Dosa", &PreferenceInput::default())
        .await;

    // No retry for transport failures.
    assert_eq!(client.call_count(), 1);
    assert!(ticket.confirm_with_customer());
    assert_eq!(ticket.confidence_score(), 0.1);
    assert!(ticket
        .ambiguity_reasons()
        .iter()
        .any(|r| r.contains("connection timed out")));

    let items = ticket.ordered_items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "Masala Dosa");
    assert_eq!(items[0].quantity, 1);
}

#[tokio::test]
async fn decode_failure_retries_once_with_correction_turns() {
    let expected = valid_ticket_json();
    let client = Arc::new(ScriptedClient::new(vec![
        Ok("this is not json".into()),
        Ok(expected.to_string()),
    ]));
    let resolver = resolver_with(client.clone());

    let ticket = resolver.resolve("dosa", &PreferenceInput::default()).await;

    assert_eq!(client.call_count(), 2);
    assert_eq!(ticket.as_value(), &expected);

    // The retry conversation replays the invalid output and asks for a fix.
    let retry = client.conversation(1);
    assert_eq!(retry.len(), 4);
    assert_eq!(retry[2].role, ChatRole::Assistant);
    assert_eq!(retry[2].content, "this is not json");
    assert_eq!(retry[3].role, ChatRole::User);
    assert!(retry[3].content.contains("not valid JSON"));
}

#[tokio::test]
async fn second_decode_failure_is_terminal() {
    let client = Arc::new(ScriptedClient::new(vec![
        Ok("garbage one".into()),
        Ok("garbage two".into()),
    ]));
    let resolver = resolver_with(client.clone());

    let ticket = resolver.resolve("dosa", &PreferenceInput::default()).await;

    // Exactly two calls, then fallback. Never a third.
    assert_eq!(client.call_count(), 2);
    assert!(ticket.confirm_with_customer());
    assert_eq!(ticket.confidence_score(), 0.1);
}

#[tokio::test]
async fn transport_error_on_retry_goes_to_fallback() {
    let client = Arc::new(ScriptedClient::new(vec![
        Ok("{ broken".into()),
        Err(GatewayError::Status { status: 503, body: "overloaded".into() }),
    ]));
    let resolver = resolver_with(client.clone());

    let ticket = resolver.resolve("dosa", &PreferenceInput::default()).await;

    assert_eq!(client.call_count(), 2);
    assert!(ticket.confirm_with_customer());
    assert!(ticket.ambiguity_reasons().iter().any(|r| r.contains("503")));
}

#[tokio::test]
async fn schema_failure_falls_back_without_retry() {
    let mut missing_profile = valid_ticket_json();
    missing_profile.as_object_mut().unwrap().remove("taste_profile");
    let client = Arc::new(ScriptedClient::new(vec![Ok(missing_profile.to_string())]));
    let resolver = resolver_with(client.clone());

    let ticket = resolver.resolve("dosa", &PreferenceInput::default()).await;

    // Decoded fine, so the retry path is never entered; schema failure
    // routes straight to fallback.
    assert_eq!(client.call_count(), 1);
    assert!(ticket.confirm_with_customer());
    assert!(ticket
        .ambiguity_reasons()
        .iter()
        .any(|r| r.contains("taste_profile")));
}

#[tokio::test]
async fn retried_ticket_is_still_schema_checked() {
    let mut invalid = valid_ticket_json();
    invalid["ordered_items"] = json!("not a list");
    let client = Arc::new(ScriptedClient::new(vec![
        Ok("nonsense".into()),
        Ok(invalid.to_string()),
    ]));
    let resolver = resolver_with(client.clone());

    let ticket = resolver.resolve("dosa", &PreferenceInput::default()).await;

    assert_eq!(client.call_count(), 2);
    assert!(ticket.confirm_with_customer());
    assert!(ticket
        .ambiguity_reasons()
        .iter()
        .any(|r| r.contains("ordered_items")));
}

#[tokio::test]
async fn first_conversation_embeds_order_and_controls() {
    let client = Arc::new(ScriptedClient::new(vec![Ok(valid_ticket_json().to_string())]));
    let resolver = resolver_with(client.clone());

    let prefs = PreferenceInput { spice: 5, ..Default::default() };
    resolver.resolve("extra hot Chana Masala", &prefs).await;

    let first = client.conversation(0);
    assert_eq!(first.len(), 2);
    assert_eq!(first[0].role, ChatRole::System);
    assert!(first[0].content.contains("Chana Masala")); // menu context
    assert!(first[0].content.contains("confirm_with_customer")); // schema context
    assert_eq!(first[1].role, ChatRole::User);
    assert!(first[1].content.contains("\"extra hot Chana Masala\""));
    assert!(first[1].content.contains("\"spice\":5"));
}

#[tokio::test]
async fn substituted_catalog_drives_prompt_and_fallback() {
    let menu = Arc::new(Menu::new(vec![MenuCategory {
        category: "Specials".into(),
        items: vec![DishRecord {
            name: "Chef's Thali".into(),
            description: "Daily selection of the kitchen.".into(),
            tags: vec!["veg".into()],
            price: 250,
        }],
    }]));
    let client = Arc::new(ScriptedClient::new(vec![Err(GatewayError::Transport(
        "down".into(),
    ))]));
    let resolver = IntentResolver::with_catalog(
        client.clone(),
        menu,
        TicketSchema::builtin_shared(),
    );

    let ticket = resolver
        .resolve("one chef's thali please", &PreferenceInput::default())
        .await;

    // The injected catalog reaches the prompt in place of the builtin one...
    let first = client.conversation(0);
    assert!(first[0].content.contains("Chef's Thali"));
    assert!(!first[0].content.contains("Butter Chicken"));

    // ...and drives fallback keyword matching too.
    let items = ticket.ordered_items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "Chef's Thali");
}

#[tokio::test]
async fn every_fallback_ticket_satisfies_the_schema() {
    let schema = TicketSchema::builtin();
    for text in ["", "I want a Masala Dosa", "two Samosa and a Lassi", "??!"] {
        let ticket = fallback::synthesize(
            Menu::builtin(),
            text,
            &PreferenceInput::default(),
            "scripted failure",
        );
        assert!(schema.validate(ticket.as_value()).is_ok());
    }
}

#[tokio::test]
async fn missing_credentials_is_reported_before_any_call() {
    // Force the no-key-anywhere state.
    unsafe {
        std::env::remove_var("GROQ_API_KEY");
    }

    let err = waiter_agentic::resolve_order(
        "a dosa",
        &PreferenceInput::default(),
        "",
        waiter_agentic::DEFAULT_MODEL,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, waiter_agentic::ResolveError::MissingApiKey));
}
