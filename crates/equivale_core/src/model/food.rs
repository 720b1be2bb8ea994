//! Food nutrition record model.
//!
//! # Responsibility
//! - Define the canonical record read from a food-group partition.
//! - Resolve the caloric value across its historical column aliases.
//!
//! # Invariants
//! - `name` is non-empty after trimming.
//! - Alias precedence is `energy_kcal`, then `calories`, then `kcal`.
//! - A zero or non-finite alias value counts as absent.

use crate::model::catalog::FoodGroup;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

// Imported tables carry values such as "89", "89,5", "52 kcal" or markers
// like "NA"/"Tr" that must not be read as numbers.
static NUMERIC_TEXT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*([+-]?\d+(?:[.,]\d+)?)\s*(?:kcal|g)?\s*$").expect("valid numeric regex")
});

/// One food item's nutrition entry as stored in its partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodRecord {
    pub name: String,
    /// Primary caloric column, kcal per `reference_quantity_g` grams.
    #[serde(default)]
    pub energy_kcal: Option<f64>,
    /// First fallback alias.
    #[serde(default)]
    pub calories: Option<f64>,
    /// Second fallback alias.
    #[serde(default)]
    pub kcal: Option<f64>,
    #[serde(default, rename = "quantity_g")]
    pub reference_quantity_g: Option<f64>,
}

impl FoodRecord {
    /// Creates a record with a primary caloric value and reference quantity.
    pub fn new(name: impl Into<String>, energy_kcal: f64, reference_quantity_g: f64) -> Self {
        Self {
            name: name.into(),
            energy_kcal: Some(energy_kcal),
            calories: None,
            kcal: None,
            reference_quantity_g: Some(reference_quantity_g),
        }
    }

    /// Returns the first usable caloric value across the alias columns.
    ///
    /// `None` means the record can still be suggested but cannot take part in
    /// an equivalence computation.
    pub fn caloric_value(&self) -> Option<f64> {
        [self.energy_kcal, self.calories, self.kcal]
            .into_iter()
            .flatten()
            .find(|value| value.is_finite() && *value != 0.0)
    }

    /// Case-insensitive substring match against an already lower-cased needle.
    pub fn name_contains(&self, needle_lower: &str) -> bool {
        self.name.to_lowercase().contains(needle_lower)
    }

    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

/// A record tagged with the partition it was resolved from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedFood {
    #[serde(flatten)]
    pub record: FoodRecord,
    pub group: FoodGroup,
}

impl ResolvedFood {
    pub fn new(record: FoodRecord, group: FoodGroup) -> Self {
        Self { record, group }
    }

    pub fn name(&self) -> &str {
        &self.record.name
    }
}

/// Parses a nutrient value stored as text.
///
/// Accepts `.` or `,` as decimal separator and an optional `kcal`/`g` unit
/// suffix. Returns `None` for markers such as `NA`, `Tr` or `*`.
pub fn parse_nutrient_text(raw: &str) -> Option<f64> {
    let captures = NUMERIC_TEXT_RE.captures(raw)?;
    captures
        .get(1)?
        .as_str()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
}

/// Normalizes free-text food input for matching: trimmed and lower-cased.
pub fn normalize_query(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::{normalize_query, parse_nutrient_text, FoodRecord};

    fn record(energy: Option<f64>, calories: Option<f64>, kcal: Option<f64>) -> FoodRecord {
        FoodRecord {
            name: "arroz".to_string(),
            energy_kcal: energy,
            calories,
            kcal,
            reference_quantity_g: Some(100.0),
        }
    }

    #[test]
    fn caloric_value_prefers_primary_column() {
        assert_eq!(record(Some(128.0), Some(1.0), Some(2.0)).caloric_value(), Some(128.0));
    }

    #[test]
    fn caloric_value_falls_back_through_aliases() {
        assert_eq!(record(None, Some(52.0), Some(9.0)).caloric_value(), Some(52.0));
        assert_eq!(record(None, None, Some(9.0)).caloric_value(), Some(9.0));
        assert_eq!(record(Some(0.0), None, Some(9.0)).caloric_value(), Some(9.0));
    }

    #[test]
    fn caloric_value_is_none_when_all_aliases_empty() {
        assert_eq!(record(None, None, None).caloric_value(), None);
        assert_eq!(record(Some(f64::NAN), Some(0.0), None).caloric_value(), None);
    }

    #[test]
    fn nutrient_text_accepts_comma_decimals_and_units() {
        assert_eq!(parse_nutrient_text("89"), Some(89.0));
        assert_eq!(parse_nutrient_text(" 89,5 "), Some(89.5));
        assert_eq!(parse_nutrient_text("52 kcal"), Some(52.0));
        assert_eq!(parse_nutrient_text("100g"), Some(100.0));
    }

    #[test]
    fn nutrient_text_rejects_markers() {
        assert_eq!(parse_nutrient_text("NA"), None);
        assert_eq!(parse_nutrient_text("Tr"), None);
        assert_eq!(parse_nutrient_text("*"), None);
        assert_eq!(parse_nutrient_text(""), None);
    }

    #[test]
    fn name_match_is_case_insensitive_for_accented_text() {
        let feijao = FoodRecord::new("Feijão Carioca", 76.0, 100.0);
        assert!(feijao.name_contains(&normalize_query("  FEIJÃO ")));
        assert!(!feijao.name_contains("preto"));
    }

    #[test]
    fn record_reads_partial_json_rows() {
        let parsed: FoodRecord =
            serde_json::from_str(r#"{ "name": "caqui", "calories": 70, "quantity_g": 100 }"#)
                .unwrap();
        assert_eq!(parsed.energy_kcal, None);
        assert_eq!(parsed.caloric_value(), Some(70.0));
        assert_eq!(parsed.reference_quantity_g, Some(100.0));
    }
}
