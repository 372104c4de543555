use crate::api::ErrorResponse;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::UnitType;
use crate::schema::unit_types;
use axum::extract::{Query, State};
use axum::{http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListUnitTypesParams {
    /// Restrict to one category: volume, weight, count or special
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UnitTypeResponse {
    pub id: Uuid,
    pub name: String,
    pub category: String,
}

#[utoipa::path(
    get,
    path = "/api/unit-types",
    tag = "units",
    operation_id = "list_unit_types",
    params(ListUnitTypesParams),
    responses(
        (status = 200, description = "Units of measure, name order", body = Vec<UnitTypeResponse>),
        (status = 500, description = "Database error", body = ErrorResponse)
    )
)]
pub async fn list_unit_types(
    Query(params): Query<ListUnitTypesParams>,
    State(pool): State<Arc<DbPool>>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let mut query = unit_types::table
        .order(unit_types::name.asc())
        .into_boxed();
    // An unknown category matches nothing rather than erroring
    if let Some(category) = &params.category {
        query = query.filter(unit_types::category.eq(category.clone()));
    }

    let units: Vec<UnitType> = match query.select(UnitType::as_select()).load(&mut conn) {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!("Failed to fetch unit types: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch unit types".to_string(),
                }),
            )
                .into_response();
        }
    };

    let response: Vec<UnitTypeResponse> = units
        .into_iter()
        .map(|u| UnitTypeResponse {
            id: u.id,
            name: u.name,
            category: u.category,
        })
        .collect();

    (StatusCode::OK, Json(response)).into_response()
}
