use crate::api::ErrorResponse;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::{Recipe, RecipeItem};
use crate::schema::{ingredients, recipe_items, recipes, unit_types};
use axum::extract::{Path, State};
use axum::{http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeItemResponse {
    pub item_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredient_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredient_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_recipe_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_recipe_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_recipe_yield_quantity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_recipe_yield_unit_name: Option<String>,
    pub quantity: f64,
    pub unit_id: Uuid,
    pub unit_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_qualifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preparation_notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeResponse {
    pub id: Uuid,
    pub name: String,
    pub is_sub_recipe: bool,
    pub yield_quantity: f64,
    pub yield_unit_id: Uuid,
    pub yield_unit_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_number: Option<i32>,
    pub items: Vec<RecipeItemResponse>,
}

#[utoipa::path(
    get,
    path = "/api/recipes/{id}",
    tag = "recipes",
    operation_id = "get_recipe",
    params(("id" = Uuid, Path, description = "Recipe ID")),
    responses(
        (status = 200, description = "Recipe with its items in written order", body = RecipeResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    )
)]
pub async fn get_recipe(
    Path(recipe_id): Path<Uuid>,
    State(pool): State<Arc<DbPool>>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let recipe: Option<(Recipe, String)> = match recipes::table
        .inner_join(unit_types::table)
        .filter(recipes::id.eq(recipe_id))
        .select((Recipe::as_select(), unit_types::name))
        .first(&mut conn)
        .optional()
    {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("Failed to fetch recipe: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch recipe".to_string(),
                }),
            )
                .into_response();
        }
    };

    let Some((recipe, yield_unit_name)) = recipe else {
        return (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Recipe not found".to_string(),
            }),
        )
            .into_response();
    };

    let item_rows: Vec<RecipeItem> = match recipe_items::table
        .filter(recipe_items::recipe_id.eq(recipe_id))
        .order(recipe_items::position.asc())
        .select(RecipeItem::as_select())
        .load(&mut conn)
    {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!("Failed to fetch recipe items: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch recipe items".to_string(),
                }),
            )
                .into_response();
        }
    };

    // Resolve referenced names in three batched lookups
    let ingredient_ids: Vec<Uuid> = item_rows.iter().filter_map(|i| i.ingredient_id).collect();
    let sub_recipe_ids: Vec<Uuid> = item_rows.iter().filter_map(|i| i.sub_recipe_id).collect();
    let unit_ids: Vec<Uuid> = item_rows.iter().map(|i| i.unit_id).collect();

    let ingredient_names: HashMap<Uuid, String> = match ingredients::table
        .filter(ingredients::id.eq_any(ingredient_ids))
        .select((ingredients::id, ingredients::name))
        .load::<(Uuid, String)>(&mut conn)
    {
        Ok(rows) => rows.into_iter().collect(),
        Err(e) => {
            tracing::error!("Failed to fetch ingredient names: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch recipe items".to_string(),
                }),
            )
                .into_response();
        }
    };

    let sub_details: HashMap<Uuid, (String, f64, String)> = match recipes::table
        .inner_join(unit_types::table)
        .filter(recipes::id.eq_any(sub_recipe_ids))
        .select((
            recipes::id,
            recipes::name,
            recipes::yield_quantity,
            unit_types::name,
        ))
        .load::<(Uuid, String, f64, String)>(&mut conn)
    {
        Ok(rows) => rows
            .into_iter()
            .map(|(id, name, yield_quantity, unit)| (id, (name, yield_quantity, unit)))
            .collect(),
        Err(e) => {
            tracing::error!("Failed to fetch sub-recipe details: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch recipe items".to_string(),
                }),
            )
                .into_response();
        }
    };

    let unit_names: HashMap<Uuid, String> = match unit_types::table
        .filter(unit_types::id.eq_any(unit_ids))
        .select((unit_types::id, unit_types::name))
        .load::<(Uuid, String)>(&mut conn)
    {
        Ok(rows) => rows.into_iter().collect(),
        Err(e) => {
            tracing::error!("Failed to fetch unit names: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch recipe items".to_string(),
                }),
            )
                .into_response();
        }
    };

    let items: Vec<RecipeItemResponse> = item_rows
        .into_iter()
        .map(|row| {
            let unit_name = unit_names.get(&row.unit_id).cloned().unwrap_or_default();
            let ingredient_name = row
                .ingredient_id
                .and_then(|id| ingredient_names.get(&id).cloned());
            let sub_detail = row.sub_recipe_id.and_then(|id| sub_details.get(&id));
            RecipeItemResponse {
                item_type: row.item_type,
                ingredient_id: row.ingredient_id,
                ingredient_name,
                sub_recipe_id: row.sub_recipe_id,
                sub_recipe_name: sub_detail.map(|(name, _, _)| name.clone()),
                sub_recipe_yield_quantity: sub_detail.map(|(_, yield_quantity, _)| *yield_quantity),
                sub_recipe_yield_unit_name: sub_detail.map(|(_, _, unit)| unit.clone()),
                quantity: row.quantity,
                unit_id: row.unit_id,
                unit_name,
                size_qualifier: row.size_qualifier,
                preparation_notes: row.preparation_notes,
            }
        })
        .collect();

    let response = RecipeResponse {
        id: recipe.id,
        name: recipe.name,
        is_sub_recipe: recipe.is_sub_recipe,
        yield_quantity: recipe.yield_quantity,
        yield_unit_id: recipe.yield_unit_id,
        yield_unit_name,
        page_number: recipe.page_number,
        items,
    };

    (StatusCode::OK, Json(response)).into_response()
}
