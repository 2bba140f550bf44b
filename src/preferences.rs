//! Structured preference controls supplied with each order
//!
//! These mirror the slider/radio/checkbox controls the customer fills in
//! alongside the free-text order. They are constructed per request and
//! read-only during resolution.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// How much oil to cook with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OilLevel {
    Low,
    Medium,
    High,
}

/// Salt preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaltLevel {
    Low,
    Normal,
    High,
}

/// Declared diet type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DietType {
    None,
    Vegetarian,
    Vegan,
    Jain,
    Eggetarian,
    #[serde(rename = "Non-Veg")]
    NonVeg,
}

/// Declared allergies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Allergen {
    Nuts,
    Dairy,
    Gluten,
    Soy,
    Shellfish,
}

/// The full set of structured controls for one order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferenceInput {
    /// Spice slider, 0 (none) to 5 (maximum).
    pub spice: u8,
    pub oil: OilLevel,
    /// Sweetness slider, 0 to 5.
    pub sweetness: u8,
    pub salt: SaltLevel,
    pub diet: DietType,
    pub allergies: Vec<Allergen>,
    /// False means the kitchen must leave out onion and garlic.
    pub onion_garlic_allowed: bool,
}

impl Default for PreferenceInput {
    fn default() -> Self {
        Self {
            spice: 2,
            oil: OilLevel::Medium,
            sweetness: 1,
            salt: SaltLevel::Normal,
            diet: DietType::None,
            allergies: Vec::new(),
            onion_garlic_allowed: true,
        }
    }
}

impl PreferenceInput {
    /// Serialized control state embedded in the user turn of the extraction
    /// prompt. The onion/garlic toggle is inverted into a constraint-style
    /// flag, with an explicit extra constraint marker when disallowed.
    pub fn as_prompt_json(&self) -> Value {
        let mut state = json!({
            "spice": self.spice,
            "oil": self.oil,
            "sweetness": self.sweetness,
            "salt": self.salt,
            "diet": self.diet,
            "allergies": self.allergies,
            "no_onion_garlic": !self.onion_garlic_allowed,
        });
        if !self.onion_garlic_allowed {
            state["dietary_constraints_extra"] = json!(["No Onion/Garlic"]);
        }
        state
    }

    /// The caller-stated constraints as labels: diet (unless `None`) plus
    /// every declared allergy. Used by the fallback synthesizer.
    pub fn constraint_labels(&self) -> Vec<String> {
        let mut labels = Vec::new();
        if self.diet != DietType::None {
            labels.push(self.diet.to_string());
        }
        labels.extend(self.allergies.iter().map(|a| a.to_string()));
        labels
    }
}

impl fmt::Display for OilLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OilLevel::Low => "Low",
            OilLevel::Medium => "Medium",
            OilLevel::High => "High",
        };
        f.write_str(s)
    }
}

impl fmt::Display for SaltLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SaltLevel::Low => "Low",
            SaltLevel::Normal => "Normal",
            SaltLevel::High => "High",
        };
        f.write_str(s)
    }
}

impl fmt::Display for DietType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DietType::None => "None",
            DietType::Vegetarian => "Vegetarian",
            DietType::Vegan => "Vegan",
            DietType::Jain => "Jain",
            DietType::Eggetarian => "Eggetarian",
            DietType::NonVeg => "Non-Veg",
        };
        f.write_str(s)
    }
}

impl fmt::Display for Allergen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Allergen::Nuts => "Nuts",
            Allergen::Dairy => "Dairy",
            Allergen::Gluten => "Gluten",
            Allergen::Soy => "Soy",
            Allergen::Shellfish => "Shellfish",
        };
        f.write_str(s)
    }
}

impl FromStr for OilLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(OilLevel::Low),
            "medium" => Ok(OilLevel::Medium),
            "high" => Ok(OilLevel::High),
            other => Err(format!("unknown oil level '{}'", other)),
        }
    }
}

impl FromStr for SaltLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(SaltLevel::Low),
            "normal" => Ok(SaltLevel::Normal),
            "high" => Ok(SaltLevel::High),
            other => Err(format!("unknown salt level '{}'", other)),
        }
    }
}

impl FromStr for DietType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(DietType::None),
            "vegetarian" => Ok(DietType::Vegetarian),
            "vegan" => Ok(DietType::Vegan),
            "jain" => Ok(DietType::Jain),
            "eggetarian" => Ok(DietType::Eggetarian),
            "non-veg" | "nonveg" => Ok(DietType::NonVeg),
            other => Err(format!("unknown diet type '{}'", other)),
        }
    }
}

impl FromStr for Allergen {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nuts" => Ok(Allergen::Nuts),
            "dairy" => Ok(Allergen::Dairy),
            "gluten" => Ok(Allergen::Gluten),
            "soy" => Ok(Allergen::Soy),
            "shellfish" => Ok(Allergen::Shellfish),
            other => Err(format!("unknown allergen '{}'", other)),
        }
    }
}
