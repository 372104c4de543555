use crate::api::{engine_error, ErrorResponse};
use crate::db::DbPool;
use crate::get_conn;
use crate::schema::{recipe_items, recipes, unit_types};
use crate::store::PgStore;
use axum::extract::{Path, State};
use axum::{http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use super::RecipeItemPayload;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateRecipeRequest {
    pub name: String,
    pub yield_quantity: f64,
    pub yield_unit_id: Uuid,
    #[serde(default)]
    pub page_number: Option<i32>,
    #[serde(default)]
    pub items: Vec<RecipeItemPayload>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UpdateRecipeResponse {
    pub id: Uuid,
}

#[utoipa::path(
    put,
    path = "/api/recipes/{id}",
    tag = "recipes",
    operation_id = "update_recipe",
    params(("id" = Uuid, Path, description = "Recipe ID")),
    request_body = UpdateRecipeRequest,
    responses(
        (status = 200, description = "Recipe updated successfully", body = UpdateRecipeResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    )
)]
pub async fn update_recipe(
    Path(recipe_id): Path<Uuid>,
    State(pool): State<Arc<DbPool>>,
    Json(request): Json<UpdateRecipeRequest>,
) -> impl IntoResponse {
    if let Err(problem) =
        super::validate_recipe_input(&request.name, request.yield_quantity, &request.items)
    {
        return (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: problem })).into_response();
    }
    let name = request.name.trim();

    let mut conn = get_conn!(pool);

    // is_sub_recipe is immutable; the stored flag decides validation
    let is_sub_recipe: Option<bool> = match recipes::table
        .find(recipe_id)
        .select(recipes::is_sub_recipe)
        .first(&mut conn)
        .optional()
    {
        Ok(flag) => flag,
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

    let Some(is_sub_recipe) = is_sub_recipe else {
        return (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Recipe not found".to_string(),
            }),
        )
            .into_response();
    };

    if is_sub_recipe {
        let category: Option<String> = match unit_types::table
            .find(request.yield_unit_id)
            .select(unit_types::category)
            .first(&mut conn)
            .optional()
        {
            Ok(c) => c,
            Err(e) => {
                tracing::error!("Failed to fetch yield unit: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: "Failed to fetch yield unit".to_string(),
                    }),
                )
                    .into_response();
            }
        };
        match category.as_deref() {
            None => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: "Unknown yield unit".to_string(),
                    }),
                )
                    .into_response();
            }
            Some("special") => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: "Sub-recipes cannot use a special unit as yield unit".to_string(),
                    }),
                )
                    .into_response();
            }
            Some(_) => {}
        }
    }

    // Reject any sub-recipe item that would make the reference graph cyclic
    let store = PgStore::new(&pool);
    for item in &request.items {
        if let RecipeItemPayload::SubRecipe { sub_recipe_id, .. } = item {
            match colander_core::would_create_cycle(&store, recipe_id, *sub_recipe_id) {
                Ok(false) => {}
                Ok(true) => {
                    return (
                        StatusCode::BAD_REQUEST,
                        Json(ErrorResponse {
                            error: "Cannot add sub-recipe: it would create a circular reference"
                                .to_string(),
                        }),
                    )
                        .into_response();
                }
                Err(err) => return engine_error(err).into_response(),
            }
        }
    }

    // Replace the recipe row and its items atomically
    let result: Result<(), DieselError> = conn.transaction(|conn| {
        diesel::update(recipes::table.find(recipe_id))
            .set((
                recipes::name.eq(name),
                recipes::yield_quantity.eq(request.yield_quantity),
                recipes::yield_unit_id.eq(request.yield_unit_id),
                recipes::page_number.eq(request.page_number),
            ))
            .execute(conn)?;

        diesel::delete(recipe_items::table.filter(recipe_items::recipe_id.eq(recipe_id)))
            .execute(conn)?;

        let new_items = super::item_rows(recipe_id, &request.items);
        diesel::insert_into(recipe_items::table)
            .values(&new_items)
            .execute(conn)?;

        Ok(())
    });

    match result {
        Ok(()) => (
            StatusCode::OK,
            Json(UpdateRecipeResponse { id: recipe_id }),
        )
            .into_response(),
        Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("Recipe \"{name}\" already exists"),
            }),
        )
            .into_response(),
        Err(DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _)) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Unknown ingredient, sub-recipe or unit id".to_string(),
            }),
        )
            .into_response(),
        Err(DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, _)) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Quantities must be positive".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to update recipe: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to update recipe".to_string(),
                }),
            )
                .into_response()
        }
    }
}
