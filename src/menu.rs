//! Static restaurant menu catalog
//!
//! Categorized dish records with descriptions, tags and prices. The tags are
//! the markers the extraction engine uses for dietary conflict detection and
//! the fallback path uses for keyword matching.

use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single orderable dish. Names are unique across the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DishRecord {
    pub name: String,
    pub description: String,
    /// Dietary/flavor/ingredient markers, e.g. "veg", "dairy", "very-spicy".
    pub tags: Vec<String>,
    /// Price in whole currency units.
    pub price: u32,
}

/// One menu section in declaration order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuCategory {
    pub category: String,
    pub items: Vec<DishRecord>,
}

/// The full catalog. Loaded once at startup and never mutated; safe to share
/// across any number of resolutions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Menu {
    categories: Vec<MenuCategory>,
}

static BUILTIN_MENU: Lazy<Arc<Menu>> = Lazy::new(|| {
    Arc::new(serde_json::from_str(include_str!("data/menu.json")).expect("builtin menu JSON is well-formed"))
});

impl Menu {
    /// The embedded restaurant catalog.
    pub fn builtin() -> &'static Menu {
        &**BUILTIN_MENU
    }

    /// Shared handle to the embedded catalog. Every clone points at the same
    /// allocation; nothing is re-parsed or copied per request.
    pub fn builtin_shared() -> Arc<Menu> {
        Arc::clone(&BUILTIN_MENU)
    }

    /// Build a catalog from explicit sections. Intended for tests that
    /// substitute a smaller menu.
    pub fn new(categories: Vec<MenuCategory>) -> Self {
        Self { categories }
    }

    pub fn categories(&self) -> &[MenuCategory] {
        &self.categories
    }

    /// All dishes flattened in declaration order.
    pub fn all_dishes(&self) -> impl Iterator<Item = &DishRecord> {
        self.categories.iter().flat_map(|c| c.items.iter())
    }

    /// Serialized category → items representation embedded verbatim in the
    /// extraction prompt.
    pub fn as_prompt_context(&self) -> String {
        let mut map = serde_json::Map::new();
        for cat in &self.categories {
            let items = serde_json::to_value(&cat.items).expect("dish records serialize to JSON");
            map.insert(cat.category.clone(), items);
        }
        serde_json::to_string_pretty(&Value::Object(map)).expect("menu serializes to JSON")
    }
}
