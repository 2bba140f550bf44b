//! Chef-facing ticket rendering and the customer menu listing
//!
//! Pure functions of their inputs; nothing here feeds back into resolution.

use std::fmt::Write;

use crate::menu::Menu;
use crate::ticket::ResolvedTicket;

/// Render a resolved ticket as a plain-text kitchen ticket.
pub fn render_chef_ticket(ticket: &ResolvedTicket) -> String {
    let mut out = String::new();

    out.push_str("==============================\n");
    out.push_str("        KITCHEN TICKET\n");
    out.push_str("==============================\n");

    out.push_str("ITEMS\n");
    let items = ticket.ordered_items();
    if items.is_empty() {
        out.push_str("  (none)\n");
    }
    for item in &items {
        let _ = writeln!(out, "  {}x {}", item.quantity, item.name);
        if let Some(notes) = &item.notes {
            let _ = writeln!(out, "     note: {}", notes);
        }
    }

    out.push_str("------------------------------\n");
    out.push_str("DIET & PREFERENCES\n");
    let constraints = ticket.dietary_constraints();
    let constraints = if constraints.is_empty() {
        "None".to_string()
    } else {
        constraints.join(", ")
    };
    let _ = writeln!(out, "  Constraints: {}", constraints);

    let tp = ticket.taste_profile();
    let level = |v: Option<String>| v.unwrap_or_else(|| "-".to_string());
    let _ = writeln!(out, "  Spice: {}", level(tp.spice_level));
    let _ = writeln!(out, "  Oil: {}", level(tp.oil_level));
    let _ = writeln!(out, "  Sweetness: {}", level(tp.sweetness));
    let _ = writeln!(out, "  Salt: {}", level(tp.salt_level));

    out.push_str("------------------------------\n");
    out.push_str("COOKING NOTES\n");
    let _ = writeln!(out, "  {}", ticket.cooking_notes().unwrap_or("-"));
    let _ = writeln!(out, "  Confidence: {:.2}", ticket.confidence_score());

    if ticket.conflict_flag() {
        let _ = writeln!(
            out,
            "\n!! CONFLICT DETECTED: {}",
            ticket.conflict_message().unwrap_or("see constraints above")
        );
    }

    if ticket.confirm_with_customer() {
        let _ = writeln!(
            out,
            "\n!! CONFIRM WITH CUSTOMER: {}",
            ticket
                .clarification_question()
                .unwrap_or("please double-check this order")
        );
    }

    out
}

/// Render the catalog as a customer-facing markdown listing.
pub fn render_menu(menu: &Menu) -> String {
    let mut out = String::new();
    for cat in menu.categories() {
        let _ = writeln!(out, "\n### {}", cat.category);
        for dish in &cat.items {
            let _ = writeln!(
                out,
                "- **{}** (₹{}): {} _[{}]_",
                dish.name,
                dish.price,
                dish.description,
                dish.tags.join(", ")
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback;
    use crate::preferences::PreferenceInput;

    #[test]
    fn fallback_ticket_renders_with_confirm_banner() {
        let prefs = PreferenceInput::default();
        let ticket = fallback::synthesize(Menu::builtin(), "a Samosa please", &prefs, "down");
        let text = render_chef_ticket(&ticket);

        assert!(text.contains("KITCHEN TICKET"));
        assert!(text.contains("1x Samosa"));
        assert!(text.contains("CONFIRM WITH CUSTOMER"));
        assert!(!text.contains("CONFLICT DETECTED"));
    }

    #[test]
    fn menu_listing_groups_by_category() {
        let text = render_menu(Menu::builtin());
        assert!(text.contains("### Desserts"));
        assert!(text.contains("**Gulab Jamun** (₹80)"));
    }
}
