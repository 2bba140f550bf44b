//! Deterministic fallback ticket synthesis
//!
//! Used whenever the model path cannot produce a schema-valid ticket. No
//! I/O, cannot fail, and always satisfies the ticket contract. The result is
//! deliberately conservative: the customer must re-confirm with staff, and no
//! conflict detection is attempted.

use serde_json::json;
use tracing::warn;

use crate::menu::Menu;
use crate::preferences::PreferenceInput;
use crate::ticket::ResolvedTicket;

/// Confidence pinned on every fallback ticket.
pub const FALLBACK_CONFIDENCE: f64 = 0.1;

/// Fixed first entry of `ambiguity_reasons` on a fallback ticket.
pub const FALLBACK_MARKER: &str = "model generation failed";

/// Build a safe ticket from the structured controls plus case-insensitive
/// keyword matches of catalog dish names against the free text.
pub fn synthesize(
    menu: &Menu,
    user_text: &str,
    prefs: &PreferenceInput,
    failure: &str,
) -> ResolvedTicket {
    warn!(failure, "synthesizing fallback ticket");

    let lower_text = user_text.to_lowercase();
    let detected: Vec<_> = menu
        .all_dishes()
        .filter(|dish| lower_text.contains(&dish.name.to_lowercase()))
        .map(|dish| {
            json!({
                "name": dish.name,
                "quantity": 1,
                "notes": "detected via keyword match",
            })
        })
        .collect();

    ResolvedTicket::from_value(json!({
        "ordered_items": detected,
        "dietary_constraints": prefs.constraint_labels(),
        "taste_profile": {
            "spice_level": format!("Fallback: {}/5", prefs.spice),
            "oil_level": prefs.oil.to_string(),
            "sweetness": prefs.sweetness.to_string(),
            "salt_level": prefs.salt.to_string(),
        },
        "cooking_notes": "Fallback mode: the ordering assistant was unavailable. Chef, please verify this order manually.",
        "confirm_with_customer": true,
        "clarification_question": "Our ordering system is having trouble. Please confirm your order with the staff.",
        "confidence_score": FALLBACK_CONFIDENCE,
        "ambiguity_reasons": [FALLBACK_MARKER, failure],
        "conflict_flag": false,
    }))
}
