//! Canonical recognition result shape
//!
//! Every path through the resolver (live inference, repaired live output,
//! sampled fallback) produces a fully populated [`RecognitionResult`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Top-level waste category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WasteCategory {
    #[serde(rename = "Plastic")]
    Plastic,
    #[serde(rename = "Paper/Cardboard")]
    PaperCardboard,
    #[serde(rename = "Metal")]
    Metal,
    #[serde(rename = "Glass")]
    Glass,
    #[serde(rename = "E-Waste")]
    EWaste,
    #[serde(rename = "Organic")]
    Organic,
    #[serde(rename = "Other")]
    Other,
}

impl WasteCategory {
    pub const ALL: [WasteCategory; 7] = [
        WasteCategory::Plastic,
        WasteCategory::PaperCardboard,
        WasteCategory::Metal,
        WasteCategory::Glass,
        WasteCategory::EWaste,
        WasteCategory::Organic,
        WasteCategory::Other,
    ];

    /// Display / wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            WasteCategory::Plastic => "Plastic",
            WasteCategory::PaperCardboard => "Paper/Cardboard",
            WasteCategory::Metal => "Metal",
            WasteCategory::Glass => "Glass",
            WasteCategory::EWaste => "E-Waste",
            WasteCategory::Organic => "Organic",
            WasteCategory::Other => "Other",
        }
    }

    /// Case-insensitive match that ignores punctuation and spacing
    ///
    /// Accepts both wire names ("Paper/Cardboard", "E-Waste") and identifier
    /// forms ("PaperCardboard", "ewaste").
    pub fn parse_loose(raw: &str) -> Option<Self> {
        let key: String = raw
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(|c| c.to_lowercase())
            .collect();

        match key.as_str() {
            "plastic" => Some(WasteCategory::Plastic),
            "papercardboard" => Some(WasteCategory::PaperCardboard),
            "metal" => Some(WasteCategory::Metal),
            "glass" => Some(WasteCategory::Glass),
            "ewaste" => Some(WasteCategory::EWaste),
            "organic" => Some(WasteCategory::Organic),
            "other" => Some(WasteCategory::Other),
            _ => None,
        }
    }
}

impl fmt::Display for WasteCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Estimated savings from disposing of the item correctly
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalImpact {
    #[serde(rename = "co2SavedKg")]
    pub co2_saved_kg: f64,
    #[serde(rename = "waterSavedL")]
    pub water_saved_l: f64,
    #[serde(rename = "energySavedKWh")]
    pub energy_saved_kwh: f64,
    pub description: String,
}

/// Canonical recognition result returned to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionResult {
    pub item_name: String,
    pub category: WasteCategory,
    pub recyclable: bool,
    pub reusable: bool,
    pub material_type: String,
    pub disposal_instructions: String,
    pub environmental_impact: EnvironmentalImpact,
}

impl RecognitionResult {
    /// Check the shape invariants: non-empty text fields and finite,
    /// non-negative impact numbers rounded to one decimal place.
    ///
    /// Returns a description of the first violation found.
    pub fn check_invariants(&self) -> Result<(), String> {
        let text_fields = [
            ("itemName", &self.item_name),
            ("materialType", &self.material_type),
            ("disposalInstructions", &self.disposal_instructions),
        ];
        for (name, value) in text_fields {
            if value.trim().is_empty() {
                return Err(format!("{} is empty", name));
            }
        }

        let impact = &self.environmental_impact;
        let numbers = [
            ("co2SavedKg", impact.co2_saved_kg),
            ("waterSavedL", impact.water_saved_l),
            ("energySavedKWh", impact.energy_saved_kwh),
        ];
        for (name, value) in numbers {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{} must be a non-negative number, got {}", name, value));
            }
            if round_one_decimal(value) != value {
                return Err(format!("{} is not rounded to one decimal: {}", name, value));
            }
        }

        Ok(())
    }
}

/// Every f64 at or above 2^52 is already a whole number
const INTEGRAL_THRESHOLD: f64 = 4_503_599_627_370_496.0;

/// Round to one decimal place; non-finite and negative values become 0
///
/// Values too large to carry a fractional part are returned as-is, so the
/// `* 10.0` step can never overflow to infinity.
pub fn round_one_decimal(value: f64) -> f64 {
    if !value.is_finite() || value <= 0.0 {
        return 0.0;
    }
    if value >= INTEGRAL_THRESHOLD {
        return value;
    }
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bottle() -> RecognitionResult {
        RecognitionResult {
            item_name: "Plastic Water Bottle".to_string(),
            category: WasteCategory::Plastic,
            recyclable: true,
            reusable: true,
            material_type: "PET plastic (Type 1)".to_string(),
            disposal_instructions: "1. Empty. 2. Recycle.".to_string(),
            environmental_impact: EnvironmentalImpact {
                co2_saved_kg: 0.3,
                water_saved_l: 85.0,
                energy_saved_kwh: 1.2,
                description: "Saves energy.".to_string(),
            },
        }
    }

    #[test]
    fn test_serializes_canonical_field_names() {
        let value = serde_json::to_value(bottle()).unwrap();
        assert_eq!(value["itemName"], "Plastic Water Bottle");
        assert_eq!(value["category"], "Plastic");
        assert_eq!(value["materialType"], "PET plastic (Type 1)");
        assert_eq!(value["disposalInstructions"], "1. Empty. 2. Recycle.");
        assert_eq!(value["environmentalImpact"]["co2SavedKg"], json!(0.3));
        assert_eq!(value["environmentalImpact"]["waterSavedL"], json!(85.0));
        assert_eq!(value["environmentalImpact"]["energySavedKWh"], json!(1.2));
    }

    #[test]
    fn test_category_wire_names() {
        assert_eq!(
            serde_json::to_value(WasteCategory::PaperCardboard).unwrap(),
            json!("Paper/Cardboard")
        );
        assert_eq!(serde_json::to_value(WasteCategory::EWaste).unwrap(), json!("E-Waste"));
        for category in WasteCategory::ALL {
            let wire = serde_json::to_value(category).unwrap();
            assert_eq!(wire, json!(category.as_str()));
        }
    }

    #[test]
    fn test_parse_loose() {
        assert_eq!(WasteCategory::parse_loose("plastic"), Some(WasteCategory::Plastic));
        assert_eq!(WasteCategory::parse_loose("GLASS"), Some(WasteCategory::Glass));
        assert_eq!(
            WasteCategory::parse_loose("paper/cardboard"),
            Some(WasteCategory::PaperCardboard)
        );
        assert_eq!(
            WasteCategory::parse_loose("PaperCardboard"),
            Some(WasteCategory::PaperCardboard)
        );
        assert_eq!(WasteCategory::parse_loose("e-waste"), Some(WasteCategory::EWaste));
        assert_eq!(WasteCategory::parse_loose("EWaste"), Some(WasteCategory::EWaste));
        assert_eq!(WasteCategory::parse_loose(" Organic "), Some(WasteCategory::Organic));
        assert_eq!(WasteCategory::parse_loose("styrofoam"), None);
        assert_eq!(WasteCategory::parse_loose(""), None);
    }

    #[test]
    fn test_round_one_decimal() {
        assert_eq!(round_one_decimal(0.34), 0.3);
        assert_eq!(round_one_decimal(2.25), 2.3);
        assert_eq!(round_one_decimal(85.0), 85.0);
        assert_eq!(round_one_decimal(-4.0), 0.0);
        assert_eq!(round_one_decimal(f64::NAN), 0.0);
        assert_eq!(round_one_decimal(f64::INFINITY), 0.0);
        assert_eq!(round_one_decimal(1e308), 1e308);
        assert_eq!(round_one_decimal(f64::MAX), f64::MAX);
        assert_eq!(round_one_decimal(round_one_decimal(1e300)), 1e300);
    }

    #[test]
    fn test_check_invariants() {
        assert!(bottle().check_invariants().is_ok());

        let mut blank = bottle();
        blank.item_name = "  ".to_string();
        assert!(blank.check_invariants().is_err());

        let mut negative = bottle();
        negative.environmental_impact.water_saved_l = -1.0;
        assert!(negative.check_invariants().is_err());

        let mut unrounded = bottle();
        unrounded.environmental_impact.co2_saved_kg = 0.33;
        assert!(unrounded.check_invariants().is_err());
    }
}
