//! Diesel-backed implementation of the engine's store traits.
//!
//! The engine sees reference data through `ReferenceStore` and writes
//! history through `SnapshotStore`; this module is the only place those
//! traits meet the database. Handlers construct a [`PgStore`] per request.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use colander_core::{
    AggregatedLine, ConversionRule, Ingredient, Recipe, RecipeItem, RecipeSelection,
    ReferenceStore, ShoppingListSnapshot, SizeEstimationRule, SizeQualifier, SnapshotStore,
    SnapshotSummary, StoreError, UnitCategory, UnitType,
};

use crate::db::DbPool;
use crate::models;
use crate::schema::{
    conversion_rules, ingredient_types, ingredients, recipe_items, recipes,
    shopping_list_snapshots, size_estimation_rules, unit_types,
};

type PooledConn = diesel::r2d2::PooledConnection<diesel::r2d2::ConnectionManager<PgConnection>>;

/// Engine store over the shared connection pool. Cheap to construct; each
/// trait method checks out its own connection.
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: &DbPool) -> Self {
        PgStore { pool: pool.clone() }
    }

    fn conn(&self) -> Result<PooledConn, StoreError> {
        self.pool
            .get()
            .map_err(|e| StoreError::new(format!("database connection failed: {e}")))
    }
}

fn unit_from_row(row: models::UnitType) -> Result<UnitType, StoreError> {
    let category = UnitCategory::from_str(&row.category).ok_or_else(|| {
        StoreError::new(format!(
            "unit \"{}\" has unknown category \"{}\"",
            row.name, row.category
        ))
    })?;
    Ok(UnitType {
        id: row.id,
        name: row.name,
        category,
    })
}

fn size_rule_from_row(row: models::SizeEstimationRule) -> Result<SizeEstimationRule, StoreError> {
    let size_qualifier = SizeQualifier::from_str(&row.size_qualifier).ok_or_else(|| {
        StoreError::new(format!(
            "unknown size qualifier \"{}\" on rule {}",
            row.size_qualifier, row.id
        ))
    })?;
    Ok(SizeEstimationRule {
        size_qualifier,
        reference_value: row.reference_value,
        reference_unit_id: row.reference_unit_id,
    })
}

fn item_from_row(row: models::RecipeItem) -> Result<RecipeItem, StoreError> {
    match row.item_type.as_str() {
        "ingredient" => {
            let ingredient_id = row.ingredient_id.ok_or_else(|| {
                StoreError::new(format!("ingredient item {} has no ingredient id", row.id))
            })?;
            let size_qualifier = match row.size_qualifier.as_deref() {
                None => None,
                Some(s) => Some(SizeQualifier::from_str(s).ok_or_else(|| {
                    StoreError::new(format!("unknown size qualifier \"{s}\" on item {}", row.id))
                })?),
            };
            Ok(RecipeItem::Ingredient {
                ingredient_id,
                quantity: row.quantity,
                unit_id: row.unit_id,
                size_qualifier,
                preparation_notes: row.preparation_notes,
            })
        }
        "sub_recipe" => {
            let sub_recipe_id = row.sub_recipe_id.ok_or_else(|| {
                StoreError::new(format!("sub-recipe item {} has no sub-recipe id", row.id))
            })?;
            Ok(RecipeItem::SubRecipe {
                sub_recipe_id,
                quantity: row.quantity,
                unit_id: row.unit_id,
            })
        }
        other => Err(StoreError::new(format!(
            "unknown item type \"{other}\" on item {}",
            row.id
        ))),
    }
}

impl ReferenceStore for PgStore {
    fn unit_types(&self, category: Option<UnitCategory>) -> Result<Vec<UnitType>, StoreError> {
        let mut conn = self.conn()?;

        let mut query = unit_types::table
            .order(unit_types::name.asc())
            .into_boxed();
        if let Some(category) = category {
            query = query.filter(unit_types::category.eq(category.as_str()));
        }

        let rows: Vec<models::UnitType> = query
            .select(models::UnitType::as_select())
            .load(&mut conn)
            .map_err(|e| StoreError::new(format!("failed to load units: {e}")))?;

        rows.into_iter().map(unit_from_row).collect()
    }

    fn ingredient(&self, id: Uuid) -> Result<Option<Ingredient>, StoreError> {
        let mut conn = self.conn()?;

        let row: Option<(models::Ingredient, String)> = ingredients::table
            .inner_join(ingredient_types::table)
            .filter(ingredients::id.eq(id))
            .select((models::Ingredient::as_select(), ingredient_types::name))
            .first(&mut conn)
            .optional()
            .map_err(|e| StoreError::new(format!("failed to load ingredient {id}: {e}")))?;

        let Some((row, type_name)) = row else {
            return Ok(None);
        };

        let rule_rows: Vec<models::ConversionRule> = conversion_rules::table
            .filter(conversion_rules::ingredient_id.eq(id))
            .select(models::ConversionRule::as_select())
            .load(&mut conn)
            .map_err(|e| StoreError::new(format!("failed to load conversion rules: {e}")))?;

        let size_rows: Vec<models::SizeEstimationRule> = size_estimation_rules::table
            .filter(size_estimation_rules::ingredient_id.eq(id))
            .select(models::SizeEstimationRule::as_select())
            .load(&mut conn)
            .map_err(|e| StoreError::new(format!("failed to load size rules: {e}")))?;

        let conversion_rules = rule_rows
            .into_iter()
            .map(|r| ConversionRule {
                from_unit_id: r.from_unit_id,
                to_unit_id: r.to_unit_id,
                factor: r.conversion_factor,
            })
            .collect();
        let size_rules = size_rows
            .into_iter()
            .map(size_rule_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(Ingredient {
            id: row.id,
            name: row.name,
            type_id: row.type_id,
            type_name,
            shopping_unit_id: row.shopping_unit_id,
            conversion_rules,
            size_rules,
        }))
    }

    fn recipe(&self, id: Uuid) -> Result<Option<Recipe>, StoreError> {
        let mut conn = self.conn()?;

        let row: Option<models::Recipe> = recipes::table
            .filter(recipes::id.eq(id))
            .select(models::Recipe::as_select())
            .first(&mut conn)
            .optional()
            .map_err(|e| StoreError::new(format!("failed to load recipe {id}: {e}")))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let item_rows: Vec<models::RecipeItem> = recipe_items::table
            .filter(recipe_items::recipe_id.eq(id))
            .order(recipe_items::position.asc())
            .select(models::RecipeItem::as_select())
            .load(&mut conn)
            .map_err(|e| StoreError::new(format!("failed to load recipe items: {e}")))?;

        let items = item_rows
            .into_iter()
            .map(item_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(Recipe {
            id: row.id,
            name: row.name,
            is_sub_recipe: row.is_sub_recipe,
            yield_quantity: row.yield_quantity,
            yield_unit_id: row.yield_unit_id,
            page_number: row.page_number,
            items,
        }))
    }
}

impl SnapshotStore for PgStore {
    fn record(
        &self,
        selections: &[RecipeSelection],
        shopping_list: &[AggregatedLine],
    ) -> Result<ShoppingListSnapshot, StoreError> {
        let mut conn = self.conn()?;

        let recipe_selections = serde_json::to_value(selections)
            .map_err(|e| StoreError::new(format!("failed to encode selections: {e}")))?;
        let list_json = serde_json::to_value(shopping_list)
            .map_err(|e| StoreError::new(format!("failed to encode shopping list: {e}")))?;

        let new_snapshot = models::NewShoppingListSnapshot {
            recipe_selections,
            shopping_list: list_json,
        };

        let (id, created_at): (Uuid, DateTime<Utc>) =
            diesel::insert_into(shopping_list_snapshots::table)
                .values(&new_snapshot)
                .returning((
                    shopping_list_snapshots::id,
                    shopping_list_snapshots::created_at,
                ))
                .get_result(&mut conn)
                .map_err(|e| StoreError::new(format!("failed to record snapshot: {e}")))?;

        Ok(ShoppingListSnapshot {
            id,
            created_at,
            recipe_selections: selections.to_vec(),
            shopping_list: shopping_list.to_vec(),
        })
    }

    fn fetch(&self, id: Uuid) -> Result<Option<ShoppingListSnapshot>, StoreError> {
        let mut conn = self.conn()?;

        let row: Option<models::ShoppingListSnapshot> = shopping_list_snapshots::table
            .filter(shopping_list_snapshots::id.eq(id))
            .select(models::ShoppingListSnapshot::as_select())
            .first(&mut conn)
            .optional()
            .map_err(|e| StoreError::new(format!("failed to load snapshot {id}: {e}")))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let recipe_selections: Vec<RecipeSelection> =
            serde_json::from_value(row.recipe_selections)
                .map_err(|e| StoreError::new(format!("failed to decode selections: {e}")))?;
        let shopping_list: Vec<AggregatedLine> = serde_json::from_value(row.shopping_list)
            .map_err(|e| StoreError::new(format!("failed to decode shopping list: {e}")))?;

        Ok(Some(ShoppingListSnapshot {
            id: row.id,
            created_at: row.created_at,
            recipe_selections,
            shopping_list,
        }))
    }

    fn list(&self) -> Result<Vec<SnapshotSummary>, StoreError> {
        let mut conn = self.conn()?;

        let rows: Vec<(Uuid, DateTime<Utc>)> = shopping_list_snapshots::table
            .order(shopping_list_snapshots::created_at.desc())
            .select((
                shopping_list_snapshots::id,
                shopping_list_snapshots::created_at,
            ))
            .load(&mut conn)
            .map_err(|e| StoreError::new(format!("failed to list snapshots: {e}")))?;

        Ok(rows
            .into_iter()
            .map(|(id, created_at)| SnapshotSummary { id, created_at })
            .collect())
    }
}
