//! Merges expanded leaves into shopping-list lines.
//!
//! Lines are keyed by what they are, not how much: ingredient id + reported
//! unit + size qualifier, or sub-recipe id + unit. Matching leaves sum their
//! converted quantities; first-seen key order is preserved. Container-unit
//! totals are rounded up to whole packages and carry the exact recipe need
//! (volume and weight) alongside when a derivation exists.

use std::collections::HashMap;

use uuid::Uuid;

use crate::convert;
use crate::error::GenerateError;
use crate::store::ReferenceStore;
use crate::types::{AggregatedLine, ExpandedLeaf, Ingredient, Recipe, SizeQualifier, UnitType};
use crate::units::{is_container_unit, standard_convert, UnitCatalog};

const FLUID_OUNCES_PER_CUP: f64 = 8.0;

/// Stable identity for an ingredient line. Quantity is deliberately absent
/// so a persisted checked-set survives regeneration with other batch counts.
pub fn ingredient_key(
    ingredient_id: Uuid,
    unit_id: Uuid,
    size_qualifier: Option<SizeQualifier>,
) -> String {
    let qualifier = size_qualifier.map(|q| q.as_str()).unwrap_or("");
    format!("ingredient-{ingredient_id}-{unit_id}-{qualifier}")
}

/// Stable identity for a sub-recipe line
pub fn sub_recipe_key(sub_recipe_id: Uuid, unit_id: Uuid) -> String {
    format!("subrecipe-{sub_recipe_id}-{unit_id}")
}

/// Exact pre-rounding need for a container-unit line, accumulated while
/// merging. `None` means no leaf offered a derivation; zero is never
/// fabricated.
#[derive(Debug, Default, Clone, Copy)]
struct RecipeNeed {
    cups: Option<f64>,
    grams: Option<f64>,
}

pub fn aggregate(
    store: &dyn ReferenceStore,
    catalog: &UnitCatalog,
    leaves: &[ExpandedLeaf],
) -> Result<Vec<AggregatedLine>, GenerateError> {
    let mut lines: Vec<AggregatedLine> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut needs: HashMap<String, RecipeNeed> = HashMap::new();
    let mut ingredients: HashMap<Uuid, Ingredient> = HashMap::new();
    let mut recipes: HashMap<Uuid, Recipe> = HashMap::new();

    for leaf in leaves {
        match leaf {
            ExpandedLeaf::Ingredient {
                ingredient_id,
                quantity,
                unit_id,
                size_qualifier,
                ..
            } => {
                if !ingredients.contains_key(ingredient_id) {
                    let record = store
                        .ingredient(*ingredient_id)?
                        .ok_or(GenerateError::IngredientNotFound(*ingredient_id))?;
                    ingredients.insert(*ingredient_id, record);
                }
                let ingredient = &ingredients[ingredient_id];

                let converted = convert::to_shopping_unit(
                    ingredient,
                    *quantity,
                    *unit_id,
                    *size_qualifier,
                    catalog,
                )?;
                let key = ingredient_key(ingredient.id, converted.unit_id, *size_qualifier);
                let unit_name = catalog.display_name(converted.unit_id);

                if is_container_unit(&unit_name) {
                    track_need(
                        needs.entry(key.clone()).or_default(),
                        ingredient,
                        *quantity,
                        *unit_id,
                        converted.quantity,
                        catalog,
                    );
                }

                let summable = !catalog.is_special(converted.unit_id);
                merge(
                    &mut lines,
                    &mut index,
                    AggregatedLine {
                        identity_key: key,
                        name: ingredient.name.clone(),
                        quantity: converted.quantity,
                        unit_id: converted.unit_id,
                        unit_name,
                        size_qualifier: *size_qualifier,
                        is_sub_recipe: false,
                        type_name: Some(ingredient.type_name.clone()),
                        yield_quantity: None,
                        yield_unit_name: None,
                        recipe_volume: None,
                        recipe_weight: None,
                    },
                    summable,
                );
            }
            ExpandedLeaf::SubRecipe {
                sub_recipe_id,
                quantity,
                unit_id,
                ..
            } => {
                if !recipes.contains_key(sub_recipe_id) {
                    let record = store
                        .recipe(*sub_recipe_id)?
                        .ok_or(GenerateError::RecipeNotFound(*sub_recipe_id))?;
                    recipes.insert(*sub_recipe_id, record);
                }
                let sub = &recipes[sub_recipe_id];

                // Sub-recipes are consumed as discrete yield amounts in the
                // consuming item's unit; no shopping-unit conversion.
                let summable = !catalog.is_special(*unit_id);
                merge(
                    &mut lines,
                    &mut index,
                    AggregatedLine {
                        identity_key: sub_recipe_key(*sub_recipe_id, *unit_id),
                        name: sub.name.clone(),
                        quantity: *quantity,
                        unit_id: *unit_id,
                        unit_name: catalog.display_name(*unit_id),
                        size_qualifier: None,
                        is_sub_recipe: true,
                        type_name: None,
                        yield_quantity: Some(sub.yield_quantity),
                        yield_unit_name: Some(catalog.display_name(sub.yield_unit_id)),
                        recipe_volume: None,
                        recipe_weight: None,
                    },
                    summable,
                );
            }
        }
    }

    // Containers are bought whole; everything else keeps its exact sum.
    for line in &mut lines {
        if line.is_sub_recipe || !is_container_unit(&line.unit_name) {
            continue;
        }
        line.quantity = line.quantity.ceil();
        if let Some(need) = needs.get(&line.identity_key) {
            line.recipe_volume = need.cups.map(|c| c * FLUID_OUNCES_PER_CUP);
            line.recipe_weight = need.grams;
        }
    }

    Ok(lines)
}

fn merge(
    lines: &mut Vec<AggregatedLine>,
    index: &mut HashMap<String, usize>,
    line: AggregatedLine,
    summable: bool,
) {
    match index.get(&line.identity_key) {
        // Special pass-through amounts are not numbers to add up; the
        // first-seen quantity stands.
        Some(&at) => {
            if summable {
                lines[at].quantity += line.quantity;
            }
        }
        None => {
            index.insert(line.identity_key.clone(), lines.len());
            lines.push(line);
        }
    }
}

fn track_need(
    need: &mut RecipeNeed,
    ingredient: &Ingredient,
    leaf_quantity: f64,
    leaf_unit_id: Uuid,
    shopping_quantity: f64,
    catalog: &UnitCatalog,
) {
    if let Some(cup) = catalog.find_by_name("cup") {
        if let Some(cups) = derive_need(
            ingredient,
            leaf_quantity,
            leaf_unit_id,
            cup,
            shopping_quantity,
            catalog,
        ) {
            *need.cups.get_or_insert(0.0) += cups;
        }
    }
    if let Some(gram) = catalog.find_by_name("gram") {
        if let Some(grams) = derive_need(
            ingredient,
            leaf_quantity,
            leaf_unit_id,
            gram,
            shopping_quantity,
            catalog,
        ) {
            *need.grams.get_or_insert(0.0) += grams;
        }
    }
}

/// The leaf amount expressed in `target` units, when any path exists: same
/// unit, an ingredient rule, the standard table, or reading the shopping
/// amount back through the ingredient's target→shopping rule.
fn derive_need(
    ingredient: &Ingredient,
    leaf_quantity: f64,
    leaf_unit_id: Uuid,
    target: &UnitType,
    shopping_quantity: f64,
    catalog: &UnitCatalog,
) -> Option<f64> {
    if leaf_unit_id == target.id {
        return Some(leaf_quantity);
    }
    if let Some(rule) = ingredient
        .rule_from(leaf_unit_id)
        .filter(|r| r.to_unit_id == target.id)
    {
        return Some(leaf_quantity * rule.factor);
    }
    if let Some(leaf_unit) = catalog.get(leaf_unit_id) {
        if let Some(standard) = standard_convert(leaf_quantity, leaf_unit, target) {
            return Some(standard);
        }
    }
    let reverse = ingredient
        .rule_from(target.id)
        .filter(|r| r.to_unit_id == ingredient.shopping_unit_id)?;
    (reverse.factor != 0.0).then(|| shopping_quantity / reverse.factor)
}
