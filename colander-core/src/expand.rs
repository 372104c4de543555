//! Flattens recipe selections into leaf entries.
//!
//! Expansion is a depth-first walk over the sub-recipe tree. Each sub-recipe
//! item contributes a reference leaf (the amount of the sub-recipe itself,
//! for the final list) and then its own items, scaled by the ratio of the
//! needed amount to the sub-recipe's yield.

use std::collections::HashSet;

use uuid::Uuid;

use crate::error::GenerateError;
use crate::store::ReferenceStore;
use crate::types::{ExpandedLeaf, Recipe, RecipeItem, RecipeSelection};

/// Deepest allowed sub-recipe nesting. The cycle check catches loops; this
/// catches absurdly long non-cyclic chains in malformed data.
pub const MAX_DEPTH: usize = 50;

pub fn expand_selections(
    store: &dyn ReferenceStore,
    selections: &[RecipeSelection],
) -> Result<Vec<ExpandedLeaf>, GenerateError> {
    if selections.is_empty() {
        return Err(GenerateError::InvalidSelection(
            "no recipes selected".to_string(),
        ));
    }
    if let Some(selection) = selections.iter().find(|s| s.batches == 0) {
        return Err(GenerateError::InvalidSelection(format!(
            "recipe {} selected with zero batches",
            selection.recipe_id
        )));
    }

    let mut leaves = Vec::new();
    for selection in selections {
        let recipe = store
            .recipe(selection.recipe_id)?
            .ok_or(GenerateError::RecipeNotFound(selection.recipe_id))?;
        tracing::debug!(recipe = %recipe.name, batches = selection.batches, "expanding selection");
        expand_recipe(
            store,
            &recipe,
            f64::from(selection.batches),
            &HashSet::new(),
            0,
            &mut leaves,
        )?;
    }
    Ok(leaves)
}

fn expand_recipe(
    store: &dyn ReferenceStore,
    recipe: &Recipe,
    multiplier: f64,
    ancestry: &HashSet<Uuid>,
    depth: usize,
    out: &mut Vec<ExpandedLeaf>,
) -> Result<(), GenerateError> {
    if ancestry.contains(&recipe.id) {
        return Err(GenerateError::CyclicRecipeReference {
            name: recipe.name.clone(),
        });
    }
    if depth >= MAX_DEPTH {
        return Err(GenerateError::RecipeTooDeep {
            name: recipe.name.clone(),
            max: MAX_DEPTH,
        });
    }

    // Each branch walks with its own copy of the path, so sibling branches
    // of a multi-recipe selection cannot see each other's ancestry.
    let mut ancestry = ancestry.clone();
    ancestry.insert(recipe.id);

    for item in &recipe.items {
        match item {
            RecipeItem::Ingredient {
                ingredient_id,
                quantity,
                unit_id,
                size_qualifier,
                ..
            } => {
                out.push(ExpandedLeaf::Ingredient {
                    ingredient_id: *ingredient_id,
                    quantity: quantity * multiplier,
                    unit_id: *unit_id,
                    size_qualifier: *size_qualifier,
                    scale: multiplier,
                });
            }
            RecipeItem::SubRecipe {
                sub_recipe_id,
                quantity,
                unit_id,
            } => {
                let needed = quantity * multiplier;
                out.push(ExpandedLeaf::SubRecipe {
                    sub_recipe_id: *sub_recipe_id,
                    quantity: needed,
                    unit_id: *unit_id,
                    scale: multiplier,
                });

                let sub = store
                    .recipe(*sub_recipe_id)?
                    .ok_or(GenerateError::RecipeNotFound(*sub_recipe_id))?;
                if sub.yield_quantity <= 0.0 {
                    return Err(GenerateError::ZeroYield {
                        name: sub.name.clone(),
                    });
                }
                // The item asks for `needed` of a recipe yielding
                // `yield_quantity`, so the sub-recipe's own items scale by
                // the ratio. Never a batch count past the top level.
                expand_recipe(
                    store,
                    &sub,
                    needed / sub.yield_quantity,
                    &ancestry,
                    depth + 1,
                    out,
                )?;
            }
        }
    }
    Ok(())
}

/// Editor-side precheck: would adding `sub_recipe_id` as an item of
/// `recipe_id` close a loop? True exactly when `recipe_id` is reachable
/// from `sub_recipe_id` over sub-recipe references.
pub fn would_create_cycle(
    store: &dyn ReferenceStore,
    recipe_id: Uuid,
    sub_recipe_id: Uuid,
) -> Result<bool, GenerateError> {
    let mut visited = HashSet::new();
    let mut stack = vec![sub_recipe_id];
    while let Some(current) = stack.pop() {
        if current == recipe_id {
            return Ok(true);
        }
        if !visited.insert(current) {
            continue;
        }
        // Dangling references are the editor's existence check to reject,
        // not ours.
        let Some(recipe) = store.recipe(current)? else {
            continue;
        };
        for item in &recipe.items {
            if let RecipeItem::SubRecipe { sub_recipe_id, .. } = item {
                stack.push(*sub_recipe_id);
            }
        }
    }
    Ok(false)
}
