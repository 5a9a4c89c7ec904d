//! Repairs loosely shaped model output into a canonical result
//!
//! Upstream output is untrusted: every field goes through an explicit
//! coercion rule and falls back to a safe default. This is the only place
//! allowed to silently repair data, and it never fails.

use serde_json::{Map, Value};

use super::types::{round_one_decimal, EnvironmentalImpact, RecognitionResult, WasteCategory};

pub const DEFAULT_ITEM_NAME: &str = "Unidentified Item";
pub const DEFAULT_MATERIAL_TYPE: &str = "Unknown";
pub const DEFAULT_DISPOSAL_INSTRUCTIONS: &str =
    "Please try again with a clearer image or check your local recycling guidelines.";
pub const DEFAULT_IMPACT_DESCRIPTION: &str =
    "Unable to determine the environmental impact for this item.";

const CO2_KEYS: &[&str] = &["co2SavedKg", "co2Saved", "co2_saved_kg", "co2_saved"];
const WATER_KEYS: &[&str] = &["waterSavedL", "waterSaved", "water_saved_l", "water_saved"];
const ENERGY_KEYS: &[&str] = &[
    "energySavedKWh",
    "energySavedKwh",
    "energySaved",
    "energy_saved_kwh",
    "energy_saved",
];

/// Normalize a parsed (possibly partial) object into a canonical result
///
/// Non-object input is treated as an empty object.
pub fn normalize(partial: &Value) -> RecognitionResult {
    let empty = Map::new();
    let fields = partial.as_object().unwrap_or(&empty);

    RecognitionResult {
        item_name: non_empty_string(fields.get("itemName"))
            .unwrap_or_else(|| DEFAULT_ITEM_NAME.to_string()),
        category: fields
            .get("category")
            .and_then(Value::as_str)
            .and_then(WasteCategory::parse_loose)
            .unwrap_or(WasteCategory::Other),
        recyclable: fields.get("recyclable").map(is_truthy).unwrap_or(false),
        reusable: fields.get("reusable").map(is_truthy).unwrap_or(false),
        material_type: non_empty_string(fields.get("materialType"))
            .unwrap_or_else(|| DEFAULT_MATERIAL_TYPE.to_string()),
        disposal_instructions: instructions(fields.get("disposalInstructions"))
            .unwrap_or_else(|| DEFAULT_DISPOSAL_INSTRUCTIONS.to_string()),
        environmental_impact: impact(fields.get("environmentalImpact")),
    }
}

fn non_empty_string(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Disposal steps arrive either as one string or as a list of steps
fn instructions(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Array(steps) => {
            let steps: Vec<&str> = steps
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect();
            if steps.is_empty() {
                return None;
            }
            let numbered: Vec<String> = steps
                .iter()
                .enumerate()
                .map(|(i, step)| format!("{}. {}", i + 1, step))
                .collect();
            Some(numbered.join(" "))
        }
        other => non_empty_string(Some(other)),
    }
}

/// Loose boolean coercion
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(false),
        Value::String(s) => {
            let s = s.trim().to_ascii_lowercase();
            !matches!(s.as_str(), "" | "false" | "no" | "n" | "0")
        }
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Coerce to a non-negative number rounded to one decimal
pub fn non_negative_number(value: Option<&Value>) -> f64 {
    let raw = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    raw.map(round_one_decimal).unwrap_or(0.0)
}

fn first_present<'a>(fields: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| fields.get(*key))
}

fn impact(value: Option<&Value>) -> EnvironmentalImpact {
    let Some(fields) = value.and_then(Value::as_object) else {
        return EnvironmentalImpact {
            co2_saved_kg: 0.0,
            water_saved_l: 0.0,
            energy_saved_kwh: 0.0,
            description: DEFAULT_IMPACT_DESCRIPTION.to_string(),
        };
    };

    EnvironmentalImpact {
        co2_saved_kg: non_negative_number(first_present(fields, CO2_KEYS)),
        water_saved_l: non_negative_number(first_present(fields, WATER_KEYS)),
        energy_saved_kwh: non_negative_number(first_present(fields, ENERGY_KEYS)),
        description: non_empty_string(fields.get("description"))
            .unwrap_or_else(|| DEFAULT_IMPACT_DESCRIPTION.to_string()),
    }
}
