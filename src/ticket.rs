//! The resolved kitchen ticket
//!
//! A ticket is the decoded JSON value accepted from the model path, or the
//! value built by the fallback synthesizer. Either way it carries the
//! required fields (`ordered_items`, `dietary_constraints`, `taste_profile`,
//! `confirm_with_customer`, `confidence_score`) — that is the contract the
//! rest of the system depends on.
//!
//! The underlying value is kept as decoded, field order included, so an
//! accepted model ticket reaches the caller unchanged. Rendering goes
//! through the lenient accessors below, which never panic on absent or
//! oddly-typed optional fields.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A kitchen-ready structured ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResolvedTicket {
    raw: Value,
}

/// One line item, as projected from `ordered_items`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderedItem {
    pub name: String,
    pub quantity: u32,
    pub notes: Option<String>,
}

/// Taste profile fields, each absent when the ticket omits it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TasteProfile {
    pub spice_level: Option<String>,
    pub oil_level: Option<String>,
    pub sweetness: Option<String>,
    pub salt_level: Option<String>,
}

impl ResolvedTicket {
    /// Wrap a value that has already passed the schema check (or was built
    /// by the fallback synthesizer, which satisfies it by construction).
    pub(crate) fn from_value(raw: Value) -> Self {
        Self { raw }
    }

    /// The ticket as its underlying JSON value.
    pub fn as_value(&self) -> &Value {
        &self.raw
    }

    /// Consume the ticket, yielding the underlying JSON value.
    pub fn into_value(self) -> Value {
        self.raw
    }

    /// Line items. Elements without a usable name are skipped; quantity
    /// defaults to 1 when absent or not a positive integer.
    pub fn ordered_items(&self) -> Vec<OrderedItem> {
        let Some(items) = self.raw["ordered_items"].as_array() else {
            return Vec::new();
        };
        items
            .iter()
            .filter_map(|item| {
                let name = item["name"].as_str()?.to_string();
                let quantity = item["quantity"].as_u64().map(|q| q.max(1) as u32).unwrap_or(1);
                let notes = item["notes"].as_str().map(str::to_string);
                Some(OrderedItem { name, quantity, notes })
            })
            .collect()
    }

    pub fn dietary_constraints(&self) -> Vec<String> {
        self.raw["dietary_constraints"]
            .as_array()
            .map(|a| {
                a.iter()
                    .filter_map(|v| v.as_str())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn taste_profile(&self) -> TasteProfile {
        let tp = &self.raw["taste_profile"];
        let field = |key: &str| tp[key].as_str().map(str::to_string);
        TasteProfile {
            spice_level: field("spice_level"),
            oil_level: field("oil_level"),
            sweetness: field("sweetness"),
            salt_level: field("salt_level"),
        }
    }

    pub fn cooking_notes(&self) -> Option<&str> {
        self.raw["cooking_notes"].as_str()
    }

    pub fn confirm_with_customer(&self) -> bool {
        self.raw["confirm_with_customer"].as_bool().unwrap_or(false)
    }

    pub fn clarification_question(&self) -> Option<&str> {
        self.raw["clarification_question"].as_str()
    }

    pub fn confidence_score(&self) -> f64 {
        self.raw["confidence_score"].as_f64().unwrap_or(0.0)
    }

    pub fn ambiguity_reasons(&self) -> Vec<String> {
        self.raw["ambiguity_reasons"]
            .as_array()
            .map(|a| {
                a.iter()
                    .filter_map(|v| v.as_str())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn conflict_flag(&self) -> bool {
        self.raw["conflict_flag"].as_bool().unwrap_or(false)
    }

    pub fn conflict_message(&self) -> Option<&str> {
        self.raw["conflict_message"].as_str()
    }
}
