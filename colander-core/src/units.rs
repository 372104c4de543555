//! Unit catalog and the standard same-category conversion tables.
//!
//! The tables are keyed by canonical unit name. Volume routes through
//! teaspoons, weight through grams; count units have no standard table
//! (a head of lettuce is not a bunch of kale), so count-to-count conversion
//! always requires an ingredient-specific rule.

use std::collections::HashMap;

use uuid::Uuid;

use crate::error::StoreError;
use crate::store::ReferenceStore;
use crate::types::{UnitCategory, UnitType};

/// Teaspoons per unit of volume
const TEASPOONS_PER: &[(&str, f64)] = &[
    ("cup", 48.0),
    ("tablespoon", 3.0),
    ("teaspoon", 1.0),
    ("fluid_ounce", 6.0),
    ("milliliter", 0.202884),
    ("liter", 202.884),
];

/// Grams per unit of weight
const GRAMS_PER: &[(&str, f64)] = &[
    ("gram", 1.0),
    ("kilogram", 1000.0),
    ("ounce", 28.3495),
    ("pound", 453.592),
];

/// Shopping units bought in whole packages. Totals in these units are
/// rounded up and carry the exact recipe need alongside.
pub const CONTAINER_UNITS: &[&str] = &["package", "can", "bottle", "jar", "container"];

pub fn is_container_unit(name: &str) -> bool {
    CONTAINER_UNITS.contains(&name)
}

fn teaspoons_per(name: &str) -> Option<f64> {
    TEASPOONS_PER
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, factor)| *factor)
}

fn grams_per(name: &str) -> Option<f64> {
    GRAMS_PER
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, factor)| *factor)
}

/// Standard conversion between two units of the same measurable category.
/// Returns `None` when the categories differ or either unit has no table
/// entry; the caller decides whether that is an error.
pub fn standard_convert(quantity: f64, from: &UnitType, to: &UnitType) -> Option<f64> {
    match (from.category, to.category) {
        (UnitCategory::Volume, UnitCategory::Volume) => {
            let from_tsp = teaspoons_per(&from.name)?;
            let to_tsp = teaspoons_per(&to.name)?;
            Some(quantity * from_tsp / to_tsp)
        }
        (UnitCategory::Weight, UnitCategory::Weight) => {
            let from_g = grams_per(&from.name)?;
            let to_g = grams_per(&to.name)?;
            Some(quantity * from_g / to_g)
        }
        _ => None,
    }
}

/// All known units for one generation request, indexed by id. Loaded once
/// per request and only read afterwards.
#[derive(Debug, Clone)]
pub struct UnitCatalog {
    by_id: HashMap<Uuid, UnitType>,
}

impl UnitCatalog {
    pub fn load(store: &dyn ReferenceStore) -> Result<Self, StoreError> {
        Ok(Self::from_units(store.unit_types(None)?))
    }

    pub fn from_units(units: Vec<UnitType>) -> Self {
        UnitCatalog {
            by_id: units.into_iter().map(|u| (u.id, u)).collect(),
        }
    }

    pub fn get(&self, id: Uuid) -> Option<&UnitType> {
        self.by_id.get(&id)
    }

    pub fn category(&self, id: Uuid) -> Option<UnitCategory> {
        self.get(id).map(|u| u.category)
    }

    pub fn is_special(&self, id: Uuid) -> bool {
        self.category(id) == Some(UnitCategory::Special)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&UnitType> {
        self.by_id.values().find(|u| u.name == name)
    }

    /// Unit name for messages; falls back to the raw id so errors about
    /// unknown units still identify them
    pub fn display_name(&self, id: Uuid) -> String {
        match self.get(id) {
            Some(unit) => unit.name.clone(),
            None => id.to_string(),
        }
    }
}
