use crate::api::ErrorResponse;
use crate::db::DbPool;
use crate::get_conn;
use crate::schema::{recipe_items, recipes};
use axum::extract::{Path, State};
use axum::{http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeRef {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DeleteRecipeResponse {
    pub id: Uuid,
    pub name: String,
    pub was_sub_recipe: bool,
    /// Recipes that referenced the deleted sub-recipe; their items pointing
    /// at it were removed by the cascade
    pub referencing_recipes: Vec<RecipeRef>,
}

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}",
    tag = "recipes",
    operation_id = "delete_recipe",
    params(("id" = Uuid, Path, description = "Recipe ID")),
    responses(
        (status = 200, description = "Recipe deleted, with the recipes that referenced it", body = DeleteRecipeResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    )
)]
pub async fn delete_recipe(
    Path(recipe_id): Path<Uuid>,
    State(pool): State<Arc<DbPool>>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let recipe: Option<(String, bool)> = match recipes::table
        .find(recipe_id)
        .select((recipes::name, recipes::is_sub_recipe))
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

    let Some((name, was_sub_recipe)) = recipe else {
        return (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Recipe not found".to_string(),
            }),
        )
            .into_response();
    };

    // Report which recipes lose an item before the cascade erases the links
    let referencing_recipes: Vec<RecipeRef> = if was_sub_recipe {
        let rows: Vec<(Uuid, String)> = match recipe_items::table
            .inner_join(recipes::table.on(recipes::id.eq(recipe_items::recipe_id)))
            .filter(recipe_items::sub_recipe_id.eq(recipe_id))
            .select((recipes::id, recipes::name))
            .distinct()
            .load(&mut conn)
        {
            Ok(rows) => rows,
            Err(e) => {
                tracing::error!("Failed to fetch referencing recipes: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: "Failed to fetch referencing recipes".to_string(),
                    }),
                )
                    .into_response();
            }
        };
        rows.into_iter()
            .map(|(id, name)| RecipeRef { id, name })
            .collect()
    } else {
        Vec::new()
    };

    if let Err(e) = diesel::delete(recipes::table.find(recipe_id)).execute(&mut conn) {
        tracing::error!("Failed to delete recipe: {}", e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "Failed to delete recipe".to_string(),
            }),
        )
            .into_response();
    }

    (
        StatusCode::OK,
        Json(DeleteRecipeResponse {
            id: recipe_id,
            name,
            was_sub_recipe,
            referencing_recipes,
        }),
    )
        .into_response()
}
