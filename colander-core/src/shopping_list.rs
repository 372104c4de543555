//! Engine entry points: one call per generation request, no state held
//! between calls.

use std::collections::HashSet;

use crate::aggregate;
use crate::error::GenerateError;
use crate::expand;
use crate::format;
use crate::store::ReferenceStore;
use crate::types::{AggregatedLine, RecipeSelection, RecipeUsed};
use crate::units::UnitCatalog;

/// Expand, convert, and merge the selections into the structured list.
pub fn generate_shopping_list(
    store: &dyn ReferenceStore,
    selections: &[RecipeSelection],
) -> Result<Vec<AggregatedLine>, GenerateError> {
    let catalog = UnitCatalog::load(store)?;
    let leaves = expand::expand_selections(store, selections)?;
    let lines = aggregate::aggregate(store, &catalog, &leaves)?;
    tracing::debug!(
        selections = selections.len(),
        leaves = leaves.len(),
        lines = lines.len(),
        "generated shopping list"
    );
    Ok(lines)
}

/// Generate and render in one step, honoring a persisted checked-set. Two
/// calls with the same inputs produce byte-identical text.
pub fn format_shopping_list(
    store: &dyn ReferenceStore,
    selections: &[RecipeSelection],
    checked_item_ids: &[String],
) -> Result<String, GenerateError> {
    let lines = generate_shopping_list(store, selections)?;
    let recipes_used = recipes_used(store, selections)?;
    let checked: HashSet<String> = checked_item_ids.iter().cloned().collect();
    Ok(format::render_text(&lines, &checked, &recipes_used))
}

/// Footer entries for the selected top-level recipes, in selection order,
/// one per distinct recipe
fn recipes_used(
    store: &dyn ReferenceStore,
    selections: &[RecipeSelection],
) -> Result<Vec<RecipeUsed>, GenerateError> {
    let mut seen = HashSet::new();
    let mut used = Vec::new();
    for selection in selections {
        if !seen.insert(selection.recipe_id) {
            continue;
        }
        let recipe = store
            .recipe(selection.recipe_id)?
            .ok_or(GenerateError::RecipeNotFound(selection.recipe_id))?;
        used.push(RecipeUsed {
            name: recipe.name,
            page_number: recipe.page_number,
        });
    }
    Ok(used)
}
