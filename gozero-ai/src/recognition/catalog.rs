//! Sample catalog for offline recognition
//!
//! A fixed, versioned list of hand-written results used when live inference is
//! unavailable. Loaded once at startup; a catalog that fails validation
//! aborts initialization.

use serde::Deserialize;
use thiserror::Error;

use super::types::{RecognitionResult, WasteCategory};

const BUILTIN_CATALOG_JSON: &str = include_str!("../../data/sample_catalog.json");

/// Minimum number of entries a catalog must carry
pub const MIN_CATALOG_ENTRIES: usize = 5;

/// Catalog loading errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Catalog has {0} entries, at least {} required", MIN_CATALOG_ENTRIES)]
    TooFewEntries(usize),

    #[error("Catalog entry {index} ({item}) is invalid: {reason}")]
    InvalidEntry {
        index: usize,
        item: String,
        reason: String,
    },

    #[error("Catalog has no entry for category {0}")]
    MissingCategory(WasteCategory),
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    version: u32,
    entries: Vec<RecognitionResult>,
}

/// Immutable sample catalog
#[derive(Debug, Clone)]
pub struct SampleCatalog {
    version: u32,
    entries: Vec<RecognitionResult>,
}

impl SampleCatalog {
    /// Load the catalog compiled into the binary
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG_JSON)
    }

    /// Parse and validate a catalog document
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_str(json)?;
        Self::from_entries(document.version, document.entries)
    }

    /// Validate entries and build a catalog
    pub fn from_entries(
        version: u32,
        entries: Vec<RecognitionResult>,
    ) -> Result<Self, CatalogError> {
        if entries.len() < MIN_CATALOG_ENTRIES {
            return Err(CatalogError::TooFewEntries(entries.len()));
        }

        for (index, entry) in entries.iter().enumerate() {
            entry
                .check_invariants()
                .map_err(|reason| CatalogError::InvalidEntry {
                    index,
                    item: entry.item_name.clone(),
                    reason,
                })?;
        }

        for category in WasteCategory::ALL {
            if !entries.iter().any(|e| e.category == category) {
                return Err(CatalogError::MissingCategory(category));
            }
        }

        Ok(Self { version, entries })
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// Number of entries (never zero)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&RecognitionResult> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[RecognitionResult] {
        &self.entries
    }

    /// True if `result` is bit-identical to a catalog entry
    pub fn contains(&self, result: &RecognitionResult) -> bool {
        self.entries.iter().any(|e| e == result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn builtin_document() -> Value {
        serde_json::from_str(BUILTIN_CATALOG_JSON).unwrap()
    }

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = SampleCatalog::builtin().unwrap();
        assert_eq!(catalog.version(), 1);
        assert!(catalog.len() >= MIN_CATALOG_ENTRIES);
        assert!(!catalog.is_empty());
    }

    #[test]
    fn test_builtin_catalog_first_entry_is_plastic_bottle() {
        let catalog = SampleCatalog::builtin().unwrap();
        let first = catalog.get(0).unwrap();
        assert_eq!(first.item_name, "Plastic Water Bottle");
        assert_eq!(first.category, WasteCategory::Plastic);
    }

    #[test]
    fn test_builtin_catalog_covers_every_category() {
        let catalog = SampleCatalog::builtin().unwrap();
        for category in WasteCategory::ALL {
            assert!(
                catalog.entries().iter().any(|e| e.category == category),
                "missing {}",
                category
            );
        }
    }

    #[test]
    fn test_rejects_too_few_entries() {
        let mut doc = builtin_document();
        doc["entries"].as_array_mut().unwrap().truncate(3);
        let err = SampleCatalog::from_json(&doc.to_string()).unwrap_err();
        assert!(matches!(err, CatalogError::TooFewEntries(3)));
    }

    #[test]
    fn test_rejects_missing_category() {
        let mut doc = builtin_document();
        let entries = doc["entries"].as_array_mut().unwrap();
        for entry in entries.iter_mut() {
            if entry["category"] == "Organic" {
                entry["category"] = json!("Other");
            }
        }
        let err = SampleCatalog::from_json(&doc.to_string()).unwrap_err();
        assert!(matches!(err, CatalogError::MissingCategory(WasteCategory::Organic)));
    }

    #[test]
    fn test_rejects_negative_impact() {
        let mut doc = builtin_document();
        doc["entries"][2]["environmentalImpact"]["co2SavedKg"] = json!(-0.5);
        let err = SampleCatalog::from_json(&doc.to_string()).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidEntry { index: 2, .. }));
    }

    #[test]
    fn test_rejects_malformed_document() {
        let err = SampleCatalog::from_json("{\"version\": 1}").unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));

        let mut doc = builtin_document();
        doc["entries"][0]["category"] = json!("Styrofoam");
        assert!(matches!(
            SampleCatalog::from_json(&doc.to_string()),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn test_contains() {
        let catalog = SampleCatalog::builtin().unwrap();
        let mut entry = catalog.get(1).unwrap().clone();
        assert!(catalog.contains(&entry));
        entry.item_name.push_str(" (edited)");
        assert!(!catalog.contains(&entry));
    }
}
