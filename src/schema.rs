//! Expected shape of the kitchen ticket and its validator
//!
//! The schema document is embedded both as prompt context for the model and
//! as the source of the required-field list. Validation is intentionally
//! shallow: it checks that the required top-level fields are present and that
//! `ordered_items` is an array, nothing deeper. Callers must not assume
//! nested types or enum values have been checked.

use std::sync::Arc;

use once_cell::sync::Lazy;
use serde_json::Value;

/// The declarative ticket schema plus its required-field list.
#[derive(Debug, Clone)]
pub struct TicketSchema {
    document: Value,
    required: Vec<String>,
}

static BUILTIN_SCHEMA: Lazy<Arc<TicketSchema>> = Lazy::new(|| {
    let document: Value = serde_json::from_str(include_str!("schemas/ticket_schema.json"))
        .expect("builtin ticket schema JSON is well-formed");
    let required = document["required"]
        .as_array()
        .expect("ticket schema declares a required list")
        .iter()
        .filter_map(|v| v.as_str())
        .map(str::to_string)
        .collect();
    Arc::new(TicketSchema { document, required })
});

impl TicketSchema {
    /// The embedded ticket schema.
    pub fn builtin() -> &'static TicketSchema {
        &**BUILTIN_SCHEMA
    }

    /// Shared handle to the embedded schema; clones share one allocation.
    pub fn builtin_shared() -> Arc<TicketSchema> {
        Arc::clone(&BUILTIN_SCHEMA)
    }

    /// Field names every ticket must carry at the top level.
    pub fn required_fields(&self) -> &[String] {
        &self.required
    }

    /// Serialized schema document embedded verbatim in the extraction prompt.
    pub fn as_prompt_context(&self) -> String {
        serde_json::to_string_pretty(&self.document).expect("ticket schema serializes to JSON")
    }

    /// Shallow conformance check of a decoded candidate ticket.
    pub fn validate(&self, candidate: &Value) -> Result<(), String> {
        let obj = candidate
            .as_object()
            .ok_or_else(|| "ticket must be a JSON object".to_string())?;

        for field in &self.required {
            if !obj.contains_key(field) {
                return Err(format!("missing required field: {}", field));
            }
        }

        if let Some(items) = obj.get("ordered_items") {
            if !items.is_array() {
                return Err("ordered_items must be an array".to_string());
            }
        }

        Ok(())
    }
}
