//! LLM-powered order intake for a restaurant kitchen
//!
//! Converts a customer's free-text order plus structured preference controls
//! (spice, oil, diet, allergies, ...) into a validated, kitchen-ready ticket,
//! using a remote chat-completion model as the extraction engine and a
//! deterministic fallback when the model path fails.
//!
//! ## Architecture
//!
//! ```text
//! free text + controls → prompt → model call → parse/validate
//!                                     │ (one self-correction retry)
//!                                     └──► accept, or fallback synthesis
//! ```
//!
//! The remote call sits behind the [`LlmClient`] trait, so the whole pipeline
//! runs against a scripted client in tests. Every model-path failure degrades
//! to a safe, human-verify-required ticket; the only hard error a caller sees
//! is missing credentials.

// Model gateway
pub mod groq_client;
pub mod llm_client;

// Core resolution pipeline
pub mod error;
pub mod fallback;
pub mod menu;
pub mod preferences;
pub mod resolver;
pub mod schema;
pub mod ticket;

// Presentation (chef ticket / customer menu rendering)
pub mod format;

// Re-exports for convenience
pub use error::ResolveError;
pub use groq_client::{GroqClient, DEFAULT_MODEL};
pub use llm_client::{ChatMessage, ChatRole, GatewayError, LlmClient};
pub use menu::{DishRecord, Menu, MenuCategory};
pub use preferences::{Allergen, DietType, OilLevel, PreferenceInput, SaltLevel};
pub use resolver::{resolve_order, IntentResolver};
pub use schema::TicketSchema;
pub use ticket::{OrderedItem, ResolvedTicket, TasteProfile};
