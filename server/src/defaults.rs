//! Built-in conversion catalog for common ingredients.
//!
//! Saves users from computing factors by hand: when an ingredient is created
//! with no rules and opts in, the catalog entry for its name seeds the
//! conversion and size-estimation rules. Factors are expressed as shopping
//! units per source unit.

use serde::Deserialize;
use std::collections::HashMap;
use std::sync::LazyLock;

/// One seeded conversion: `shopping_units = source_quantity * factor`.
#[derive(Debug, Deserialize)]
pub struct DefaultConversion {
    pub from_unit: String,
    pub factor: f64,
}

/// Seeded size estimate, e.g. a medium onion is about 150 grams.
#[derive(Debug, Deserialize)]
pub struct DefaultSizeRule {
    pub size: String,
    pub reference_unit: String,
    pub value: f64,
}

/// Catalog entry for one ingredient. `shopping_unit` names the unit the
/// factors target; entries only apply when the user picked the same unit.
#[derive(Debug, Deserialize)]
pub struct DefaultEntry {
    pub shopping_unit: String,
    pub conversions: Vec<DefaultConversion>,
    #[serde(default)]
    pub size_estimation: Vec<DefaultSizeRule>,
}

#[derive(Deserialize)]
struct CatalogFile {
    ingredients: HashMap<String, DefaultEntry>,
}

/// Embedded catalog data.
static CATALOG_JSON: &str = include_str!("data/default_conversions.json");

static CATALOG: LazyLock<CatalogFile> = LazyLock::new(|| {
    serde_json::from_str(CATALOG_JSON).expect("default_conversions.json should be valid JSON")
});

/// Find the catalog entry for an ingredient name.
/// Exact match first, then case-insensitive.
pub fn lookup(name: &str) -> Option<&'static DefaultEntry> {
    if let Some(entry) = CATALOG.ingredients.get(name) {
        return Some(entry);
    }
    CATALOG
        .ingredients
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, entry)| entry)
}

/// Ingredient names with defaults available, sorted for stable display.
pub fn available_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = CATALOG.ingredients.keys().map(String::as_str).collect();
    names.sort_unstable();
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use colander_core::SizeQualifier;

    #[test]
    fn test_lookup_exact() {
        let entry = lookup("Onion").unwrap();
        assert_eq!(entry.shopping_unit, "piece");
        assert_eq!(entry.size_estimation.len(), 3);
    }

    #[test]
    fn test_lookup_case_insensitive() {
        assert!(lookup("onion").is_some());
        assert!(lookup("BELL PEPPER").is_some());
    }

    #[test]
    fn test_lookup_unknown() {
        assert!(lookup("unicorn tears").is_none());
    }

    #[test]
    fn test_available_names_sorted() {
        let names = available_names();
        assert!(names.contains(&"Onion"));
        assert!(names.contains(&"Cashews"));
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_catalog_entries_well_formed() {
        for name in available_names() {
            let entry = lookup(name).unwrap();
            assert!(!entry.conversions.is_empty(), "{name} has no conversions");
            for conv in &entry.conversions {
                assert!(conv.factor > 0.0, "{name} has a non-positive factor");
            }
            for rule in &entry.size_estimation {
                assert!(rule.value > 0.0, "{name} has a non-positive size value");
                assert!(
                    SizeQualifier::from_str(&rule.size).is_some(),
                    "{name} has an unknown size qualifier"
                );
            }
        }
    }
}
