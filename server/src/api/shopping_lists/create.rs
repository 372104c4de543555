use crate::api::{engine_error, ErrorResponse};
use crate::db::DbPool;
use crate::store::PgStore;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use colander_core::{generate_shopping_list, RecipeSelection, SnapshotStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{LineResponse, SelectionPayload};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct GenerateShoppingListRequest {
    #[serde(default)]
    pub recipe_selections: Vec<SelectionPayload>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GenerateShoppingListResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub shopping_list: Vec<LineResponse>,
}

#[utoipa::path(
    post,
    path = "/api/shopping-lists",
    tag = "shopping_lists",
    request_body = GenerateShoppingListRequest,
    responses(
        (status = 201, description = "Shopping list generated and recorded", body = GenerateShoppingListResponse),
        (status = 400, description = "Invalid selections", body = ErrorResponse),
        (status = 404, description = "Recipe or ingredient not found", body = ErrorResponse),
        (status = 422, description = "Selections cannot be converted", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn create_shopping_list(
    State(pool): State<Arc<DbPool>>,
    Json(request): Json<GenerateShoppingListRequest>,
) -> impl IntoResponse {
    let selections: Vec<RecipeSelection> = request
        .recipe_selections
        .into_iter()
        .map(RecipeSelection::from)
        .collect();

    let store = PgStore::new(&pool);

    let lines = match generate_shopping_list(&store, &selections) {
        Ok(lines) => lines,
        Err(err) => return engine_error(err).into_response(),
    };

    let snapshot = match store.record(&selections, &lines) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::error!("Failed to record shopping list snapshot: {e}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to record shopping list".to_string(),
                }),
            )
                .into_response();
        }
    };

    let response = GenerateShoppingListResponse {
        id: snapshot.id,
        created_at: snapshot.created_at,
        shopping_list: lines.into_iter().map(LineResponse::from).collect(),
    };

    (StatusCode::CREATED, Json(response)).into_response()
}
