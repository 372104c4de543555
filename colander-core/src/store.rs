//! Data-access seams for the engine.
//!
//! The engine never talks to a database directly: reference data (units,
//! ingredients, recipes) comes in through [`ReferenceStore`] and generated
//! lists go out through [`SnapshotStore`]. `MemoryStore` implements both for
//! tests and for callers that want to run the engine over in-process data.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;
use uuid::Uuid;

use crate::error::StoreError;
use crate::types::{
    AggregatedLine, Ingredient, Recipe, RecipeSelection, ShoppingListSnapshot, SnapshotSummary,
    UnitCategory, UnitType,
};

/// Read-only reference data the engine consumes. Lookup misses are
/// `Ok(None)`; `Err` is reserved for backend failures.
///
/// Implementations must be safe for concurrent readers: a generation request
/// may run while other requests read the same store.
pub trait ReferenceStore: Send + Sync {
    /// All units, optionally filtered by category
    fn unit_types(&self, category: Option<UnitCategory>) -> Result<Vec<UnitType>, StoreError>;

    /// An ingredient with its conversion and size rule sets, and the joined
    /// ingredient type name
    fn ingredient(&self, id: Uuid) -> Result<Option<Ingredient>, StoreError>;

    /// A recipe with its ordered items
    fn recipe(&self, id: Uuid) -> Result<Option<Recipe>, StoreError>;
}

/// Append-only history of generated lists
pub trait SnapshotStore: Send + Sync {
    /// Record one generation. The store assigns the id and timestamp.
    fn record(
        &self,
        selections: &[RecipeSelection],
        shopping_list: &[AggregatedLine],
    ) -> Result<ShoppingListSnapshot, StoreError>;

    fn fetch(&self, id: Uuid) -> Result<Option<ShoppingListSnapshot>, StoreError>;

    /// Summaries of every recorded snapshot, newest first
    fn list(&self) -> Result<Vec<SnapshotSummary>, StoreError>;
}

/// In-memory store backing tests and in-process callers.
///
/// Reference data is loaded up front through the `add_*` methods; snapshots
/// live behind an `RwLock` so recording works through a shared reference.
#[derive(Debug, Default)]
pub struct MemoryStore {
    units: Vec<UnitType>,
    ingredients: HashMap<Uuid, Ingredient>,
    recipes: HashMap<Uuid, Recipe>,
    snapshots: RwLock<Vec<ShoppingListSnapshot>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a unit and return it (tests mostly need the generated id)
    pub fn add_unit(&mut self, name: &str, category: UnitCategory) -> UnitType {
        let unit = UnitType {
            id: Uuid::new_v4(),
            name: name.to_string(),
            category,
        };
        self.units.push(unit.clone());
        unit
    }

    pub fn add_ingredient(&mut self, ingredient: Ingredient) -> Uuid {
        let id = ingredient.id;
        self.ingredients.insert(id, ingredient);
        id
    }

    pub fn add_recipe(&mut self, recipe: Recipe) -> Uuid {
        let id = recipe.id;
        self.recipes.insert(id, recipe);
        id
    }
}

impl ReferenceStore for MemoryStore {
    fn unit_types(&self, category: Option<UnitCategory>) -> Result<Vec<UnitType>, StoreError> {
        Ok(self
            .units
            .iter()
            .filter(|u| category.is_none_or(|c| u.category == c))
            .cloned()
            .collect())
    }

    fn ingredient(&self, id: Uuid) -> Result<Option<Ingredient>, StoreError> {
        Ok(self.ingredients.get(&id).cloned())
    }

    fn recipe(&self, id: Uuid) -> Result<Option<Recipe>, StoreError> {
        Ok(self.recipes.get(&id).cloned())
    }
}

impl SnapshotStore for MemoryStore {
    fn record(
        &self,
        selections: &[RecipeSelection],
        shopping_list: &[AggregatedLine],
    ) -> Result<ShoppingListSnapshot, StoreError> {
        let snapshot = ShoppingListSnapshot {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            recipe_selections: selections.to_vec(),
            shopping_list: shopping_list.to_vec(),
        };
        let mut snapshots = self
            .snapshots
            .write()
            .map_err(|_| StoreError::new("snapshot lock poisoned"))?;
        snapshots.push(snapshot.clone());
        Ok(snapshot)
    }

    fn fetch(&self, id: Uuid) -> Result<Option<ShoppingListSnapshot>, StoreError> {
        let snapshots = self
            .snapshots
            .read()
            .map_err(|_| StoreError::new("snapshot lock poisoned"))?;
        Ok(snapshots.iter().find(|s| s.id == id).cloned())
    }

    fn list(&self) -> Result<Vec<SnapshotSummary>, StoreError> {
        let snapshots = self
            .snapshots
            .read()
            .map_err(|_| StoreError::new("snapshot lock poisoned"))?;
        let mut summaries: Vec<SnapshotSummary> = snapshots
            .iter()
            .map(|s| SnapshotSummary {
                id: s.id,
                created_at: s.created_at,
            })
            .collect();
        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(summaries)
    }
}
