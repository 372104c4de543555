use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unit semantics. Quantities convert between units of the same category;
/// crossing categories requires an ingredient-specific conversion rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitCategory {
    Volume,
    Weight,
    Count,
    Special,
}

impl UnitCategory {
    pub const ALL: &'static [UnitCategory] = &[
        UnitCategory::Volume,
        UnitCategory::Weight,
        UnitCategory::Count,
        UnitCategory::Special,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UnitCategory::Volume => "volume",
            UnitCategory::Weight => "weight",
            UnitCategory::Count => "count",
            UnitCategory::Special => "special",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "volume" => Some(UnitCategory::Volume),
            "weight" => Some(UnitCategory::Weight),
            "count" => Some(UnitCategory::Count),
            "special" => Some(UnitCategory::Special),
            _ => None,
        }
    }
}

/// A canonical unit of measure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitType {
    pub id: Uuid,
    pub name: String,
    pub category: UnitCategory,
}

/// Grouping label for shopping-list sections ("Vegetables", "Spices", ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientType {
    pub id: Uuid,
    pub name: String,
}

/// Coarse size descriptor used when a recipe specifies quantity by size
/// rather than by measured unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeQualifier {
    Small,
    Medium,
    Large,
}

impl SizeQualifier {
    pub fn as_str(&self) -> &'static str {
        match self {
            SizeQualifier::Small => "small",
            SizeQualifier::Medium => "medium",
            SizeQualifier::Large => "large",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "small" => Some(SizeQualifier::Small),
            "medium" => Some(SizeQualifier::Medium),
            "large" => Some(SizeQualifier::Large),
            _ => None,
        }
    }
}

/// Ingredient-scoped conversion:
/// `quantity_in_to_unit = quantity_in_from_unit * factor`.
/// An ingredient carries at most one rule per source unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConversionRule {
    pub from_unit_id: Uuid,
    pub to_unit_id: Uuid,
    pub factor: f64,
}

/// Estimated amount for one size qualifier, e.g. a medium onion is about
/// 150 grams. Consulted only as a conversion fallback.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeEstimationRule {
    pub size_qualifier: SizeQualifier,
    pub reference_value: f64,
    pub reference_unit_id: Uuid,
}

/// An ingredient plus the rule sets the resolver consults. `type_name` is
/// joined in by the store because the formatter groups by it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: Uuid,
    pub name: String,
    pub type_id: Uuid,
    pub type_name: String,
    pub shopping_unit_id: Uuid,
    pub conversion_rules: Vec<ConversionRule>,
    pub size_rules: Vec<SizeEstimationRule>,
}

impl Ingredient {
    /// The rule converting out of `from_unit_id`, if one exists
    pub fn rule_from(&self, from_unit_id: Uuid) -> Option<&ConversionRule> {
        self.conversion_rules
            .iter()
            .find(|r| r.from_unit_id == from_unit_id)
    }

    pub fn size_rule(&self, qualifier: SizeQualifier) -> Option<&SizeEstimationRule> {
        self.size_rules
            .iter()
            .find(|r| r.size_qualifier == qualifier)
    }
}

/// One line of a recipe: either a direct ingredient amount or a quantity of
/// another recipe's yield
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "item_type", rename_all = "snake_case")]
pub enum RecipeItem {
    Ingredient {
        ingredient_id: Uuid,
        quantity: f64,
        unit_id: Uuid,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        size_qualifier: Option<SizeQualifier>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        preparation_notes: Option<String>,
    },
    SubRecipe {
        sub_recipe_id: Uuid,
        quantity: f64,
        unit_id: Uuid,
    },
}

/// A recipe and its ordered items. The reference graph over sub-recipes must
/// stay acyclic; the expander rejects violations at generation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: Uuid,
    pub name: String,
    pub is_sub_recipe: bool,
    pub yield_quantity: f64,
    pub yield_unit_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_number: Option<i32>,
    pub items: Vec<RecipeItem>,
}

/// Caller input: which recipe, how many batches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeSelection {
    pub recipe_id: Uuid,
    pub batches: u32,
}

/// Flattened recipe-tree entry, owned transiently by the expander and never
/// persisted. `scale` is the cumulative multiplier applied to the written
/// quantity, carried for tracing.
#[derive(Debug, Clone, PartialEq)]
pub enum ExpandedLeaf {
    Ingredient {
        ingredient_id: Uuid,
        quantity: f64,
        unit_id: Uuid,
        size_qualifier: Option<SizeQualifier>,
        scale: f64,
    },
    SubRecipe {
        sub_recipe_id: Uuid,
        quantity: f64,
        unit_id: Uuid,
        scale: f64,
    },
}

/// One merged shopping-list line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatedLine {
    /// Stable identity string used for checked-state tracking, reproducible
    /// across regenerations of the same selection
    pub identity_key: String,
    pub name: String,
    pub quantity: f64,
    pub unit_id: Uuid,
    pub unit_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_qualifier: Option<SizeQualifier>,
    pub is_sub_recipe: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yield_quantity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yield_unit_name: Option<String>,
    /// Exact pre-rounding need in fluid ounces, container-unit lines only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe_volume: Option<f64>,
    /// Exact pre-rounding need in grams, container-unit lines only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe_weight: Option<f64>,
}

/// Immutable record of one generation, kept for history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShoppingListSnapshot {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub recipe_selections: Vec<RecipeSelection>,
    pub shopping_list: Vec<AggregatedLine>,
}

/// Listing view of a snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotSummary {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// A selected top-level recipe, shown in the formatted footer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeUsed {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_number: Option<i32>,
}
