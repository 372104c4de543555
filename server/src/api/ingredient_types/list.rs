use crate::api::ErrorResponse;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::IngredientType;
use crate::schema::ingredient_types;
use axum::extract::State;
use axum::{http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IngredientTypeResponse {
    pub id: Uuid,
    pub name: String,
}

#[utoipa::path(
    get,
    path = "/api/ingredient-types",
    tag = "ingredient_types",
    operation_id = "list_ingredient_types",
    responses(
        (status = 200, description = "Shopping-list sections, name order", body = Vec<IngredientTypeResponse>),
        (status = 500, description = "Database error", body = ErrorResponse)
    )
)]
pub async fn list_ingredient_types(State(pool): State<Arc<DbPool>>) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let types: Vec<IngredientType> = match ingredient_types::table
        .order(ingredient_types::name.asc())
        .select(IngredientType::as_select())
        .load(&mut conn)
    {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!("Failed to fetch ingredient types: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch ingredient types".to_string(),
                }),
            )
                .into_response();
        }
    };

    let response: Vec<IngredientTypeResponse> = types
        .into_iter()
        .map(|t| IngredientTypeResponse {
            id: t.id,
            name: t.name,
        })
        .collect();

    (StatusCode::OK, Json(response)).into_response()
}
