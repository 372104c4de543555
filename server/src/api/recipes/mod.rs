pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use crate::models::NewRecipeItem;
use crate::AppState;
use axum::routing::get;
use axum::Router;
use colander_core::SizeQualifier;
use serde::Deserialize;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

/// Returns the router for /api/recipes endpoints (mounted at /api/recipes)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_recipes).post(create::create_recipe))
        .route(
            "/{id}",
            get(get::get_recipe)
                .put(update::update_recipe)
                .delete(delete::delete_recipe),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        create::create_recipe,
        list::list_recipes,
        get::get_recipe,
        update::update_recipe,
        delete::delete_recipe,
    ),
    components(schemas(
        RecipeItemPayload,
        create::CreateRecipeRequest,
        create::CreateRecipeResponse,
        list::RecipeSummary,
        get::RecipeResponse,
        get::RecipeItemResponse,
        update::UpdateRecipeRequest,
        update::UpdateRecipeResponse,
        delete::DeleteRecipeResponse,
        delete::RecipeRef,
    ))
)]
pub struct ApiDoc;

/// One recipe line as sent by the editor: a measured ingredient or a
/// quantity of another recipe's yield
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(tag = "item_type", rename_all = "snake_case")]
pub enum RecipeItemPayload {
    Ingredient {
        ingredient_id: Uuid,
        quantity: f64,
        unit_id: Uuid,
        #[serde(default)]
        size_qualifier: Option<String>,
        #[serde(default)]
        preparation_notes: Option<String>,
    },
    SubRecipe {
        sub_recipe_id: Uuid,
        quantity: f64,
        unit_id: Uuid,
    },
}

/// Shared request validation for create and update. Returns the first
/// problem found.
fn validate_recipe_input(
    name: &str,
    yield_quantity: f64,
    items: &[RecipeItemPayload],
) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Recipe name cannot be empty".to_string());
    }
    if yield_quantity <= 0.0 {
        return Err("Yield quantity must be positive".to_string());
    }
    for item in items {
        let quantity = match item {
            RecipeItemPayload::Ingredient { quantity, .. } => *quantity,
            RecipeItemPayload::SubRecipe { quantity, .. } => *quantity,
        };
        if quantity <= 0.0 {
            return Err("Item quantities must be positive".to_string());
        }
        if let RecipeItemPayload::Ingredient {
            size_qualifier: Some(qualifier),
            ..
        } = item
        {
            if SizeQualifier::from_str(qualifier).is_none() {
                return Err(format!("Unknown size qualifier \"{qualifier}\""));
            }
        }
    }
    Ok(())
}

/// Maps payload items onto insertable rows. Position follows payload order
/// so items read back in the order they were written.
fn item_rows(recipe_id: Uuid, items: &[RecipeItemPayload]) -> Vec<NewRecipeItem<'_>> {
    items
        .iter()
        .enumerate()
        .map(|(position, item)| match item {
            RecipeItemPayload::Ingredient {
                ingredient_id,
                quantity,
                unit_id,
                size_qualifier,
                preparation_notes,
            } => NewRecipeItem {
                recipe_id,
                item_type: "ingredient",
                ingredient_id: Some(*ingredient_id),
                sub_recipe_id: None,
                quantity: *quantity,
                unit_id: *unit_id,
                size_qualifier: size_qualifier.as_deref(),
                preparation_notes: preparation_notes.as_deref(),
                position: position as i32,
            },
            RecipeItemPayload::SubRecipe {
                sub_recipe_id,
                quantity,
                unit_id,
            } => NewRecipeItem {
                recipe_id,
                item_type: "sub_recipe",
                ingredient_id: None,
                sub_recipe_id: Some(*sub_recipe_id),
                quantity: *quantity,
                unit_id: *unit_id,
                size_qualifier: None,
                preparation_notes: None,
                position: position as i32,
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ingredient_item(quantity: f64, size_qualifier: Option<&str>) -> RecipeItemPayload {
        RecipeItemPayload::Ingredient {
            ingredient_id: Uuid::new_v4(),
            quantity,
            unit_id: Uuid::new_v4(),
            size_qualifier: size_qualifier.map(str::to_string),
            preparation_notes: None,
        }
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        assert!(validate_recipe_input("  ", 1.0, &[]).is_err());
        assert!(validate_recipe_input("Soup", 1.0, &[]).is_ok());
    }

    #[test]
    fn test_validate_rejects_non_positive_quantities() {
        assert!(validate_recipe_input("Soup", 0.0, &[]).is_err());
        assert!(validate_recipe_input("Soup", 4.0, &[ingredient_item(0.0, None)]).is_err());
        assert!(validate_recipe_input("Soup", 4.0, &[ingredient_item(2.0, None)]).is_ok());
    }

    #[test]
    fn test_validate_rejects_unknown_size_qualifier() {
        assert!(validate_recipe_input("Soup", 4.0, &[ingredient_item(1.0, Some("jumbo"))]).is_err());
        assert!(validate_recipe_input("Soup", 4.0, &[ingredient_item(1.0, Some("large"))]).is_ok());
    }

    #[test]
    fn test_item_payload_tagged_deserialization() {
        let json = r#"{
            "item_type": "sub_recipe",
            "sub_recipe_id": "6f8ad1f2-54ac-4e7e-9fd3-7f7a3fe1d87a",
            "quantity": 2.0,
            "unit_id": "b7d5dc3e-31c8-4b3b-86b3-3a524e4a8f13"
        }"#;
        let item: RecipeItemPayload = serde_json::from_str(json).unwrap();
        assert!(matches!(item, RecipeItemPayload::SubRecipe { quantity, .. } if quantity == 2.0));
    }

    #[test]
    fn test_item_rows_keep_payload_order() {
        let recipe_id = Uuid::new_v4();
        let items = vec![
            ingredient_item(1.0, None),
            RecipeItemPayload::SubRecipe {
                sub_recipe_id: Uuid::new_v4(),
                quantity: 2.0,
                unit_id: Uuid::new_v4(),
            },
            ingredient_item(3.0, Some("small")),
        ];
        let rows = item_rows(recipe_id, &items);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].position, 0);
        assert_eq!(rows[1].position, 1);
        assert_eq!(rows[1].item_type, "sub_recipe");
        assert_eq!(rows[2].position, 2);
        assert_eq!(rows[2].size_qualifier, Some("small"));
    }
}
