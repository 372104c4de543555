pub mod aggregate;
pub mod convert;
pub mod error;
pub mod expand;
pub mod format;
pub mod shopping_list;
pub mod store;
pub mod types;
pub mod units;

pub use aggregate::{aggregate, ingredient_key, sub_recipe_key};
pub use convert::{to_shopping_unit, Converted};
pub use error::{GenerateError, StoreError};
pub use expand::{expand_selections, would_create_cycle, MAX_DEPTH};
pub use format::{format_quantity, render_text};
pub use shopping_list::{format_shopping_list, generate_shopping_list};
pub use store::{MemoryStore, ReferenceStore, SnapshotStore};
pub use types::{
    AggregatedLine, ConversionRule, ExpandedLeaf, Ingredient, IngredientType, Recipe, RecipeItem,
    RecipeSelection, RecipeUsed, ShoppingListSnapshot, SizeEstimationRule, SizeQualifier,
    SnapshotSummary, UnitCategory, UnitType,
};
pub use units::{is_container_unit, standard_convert, UnitCatalog, CONTAINER_UNITS};
