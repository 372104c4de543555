use crate::api::ErrorResponse;
use crate::db::DbPool;
use crate::get_conn;
use crate::schema::{ingredient_types, ingredients, unit_types};
use axum::extract::{Query, State};
use axum::{http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListIngredientsParams {
    /// Restrict to one shopping-list section
    pub type_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IngredientResponse {
    pub id: Uuid,
    pub name: String,
    pub type_id: Uuid,
    pub shopping_unit_id: Uuid,
    pub type_name: String,
    pub shopping_unit_name: String,
}

// Type alias for query result row
type IngredientRow = (Uuid, String, Uuid, Uuid, String, String);

#[utoipa::path(
    get,
    path = "/api/ingredients",
    tag = "ingredients",
    operation_id = "list_ingredients",
    params(ListIngredientsParams),
    responses(
        (status = 200, description = "Ingredients with joined type and unit names, name order", body = Vec<IngredientResponse>),
        (status = 500, description = "Database error", body = ErrorResponse)
    )
)]
pub async fn list_ingredients(
    Query(params): Query<ListIngredientsParams>,
    State(pool): State<Arc<DbPool>>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let mut query = ingredients::table
        .inner_join(ingredient_types::table)
        .inner_join(unit_types::table)
        .order(ingredients::name.asc())
        .into_boxed();
    if let Some(type_id) = params.type_id {
        query = query.filter(ingredients::type_id.eq(type_id));
    }

    let rows: Vec<IngredientRow> = match query
        .select((
            ingredients::id,
            ingredients::name,
            ingredients::type_id,
            ingredients::shopping_unit_id,
            ingredient_types::name,
            unit_types::name,
        ))
        .load(&mut conn)
    {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!("Failed to fetch ingredients: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch ingredients".to_string(),
                }),
            )
                .into_response();
        }
    };

    let response: Vec<IngredientResponse> = rows
        .into_iter()
        .map(
            |(id, name, type_id, shopping_unit_id, type_name, shopping_unit_name)| {
                IngredientResponse {
                    id,
                    name,
                    type_id,
                    shopping_unit_id,
                    type_name,
                    shopping_unit_name,
                }
            },
        )
        .collect();

    (StatusCode::OK, Json(response)).into_response()
}
