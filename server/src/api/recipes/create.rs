use crate::api::ErrorResponse;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::NewRecipe;
use crate::schema::{recipe_items, recipes, unit_types};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use super::RecipeItemPayload;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateRecipeRequest {
    pub name: String,
    #[serde(default)]
    pub is_sub_recipe: bool,
    pub yield_quantity: f64,
    pub yield_unit_id: Uuid,
    #[serde(default)]
    pub page_number: Option<i32>,
    #[serde(default)]
    pub items: Vec<RecipeItemPayload>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreateRecipeResponse {
    pub id: Uuid,
}

#[utoipa::path(
    post,
    path = "/api/recipes",
    tag = "recipes",
    operation_id = "create_recipe",
    request_body = CreateRecipeRequest,
    responses(
        (status = 201, description = "Recipe created successfully", body = CreateRecipeResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    )
)]
pub async fn create_recipe(
    State(pool): State<Arc<DbPool>>,
    Json(request): Json<CreateRecipeRequest>,
) -> impl IntoResponse {
    if let Err(problem) =
        super::validate_recipe_input(&request.name, request.yield_quantity, &request.items)
    {
        return (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: problem })).into_response();
    }
    let name = request.name.trim();

    let mut conn = get_conn!(pool);

    // A sub-recipe's yield must be measurable so callers can scale against
    // it; special units (serving, to_taste) have no magnitude
    if request.is_sub_recipe {
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

    // No cycle check here: nothing can reference a recipe that does not
    // exist yet, so a fresh recipe cannot close a loop

    let result: Result<Uuid, DieselError> = conn.transaction(|conn| {
        let new_recipe = NewRecipe {
            name,
            is_sub_recipe: request.is_sub_recipe,
            yield_quantity: request.yield_quantity,
            yield_unit_id: request.yield_unit_id,
            page_number: request.page_number,
        };

        let recipe_id: Uuid = diesel::insert_into(recipes::table)
            .values(&new_recipe)
            .returning(recipes::id)
            .get_result(conn)?;

        let new_items = super::item_rows(recipe_id, &request.items);
        diesel::insert_into(recipe_items::table)
            .values(&new_items)
            .execute(conn)?;

        Ok(recipe_id)
    });

    match result {
        Ok(id) => (StatusCode::CREATED, Json(CreateRecipeResponse { id })).into_response(),
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
            tracing::error!("Failed to create recipe: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to create recipe".to_string(),
                }),
            )
                .into_response()
        }
    }
}
