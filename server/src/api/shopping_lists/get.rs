use crate::api::ErrorResponse;
use crate::db::DbPool;
use crate::store::PgStore;
use axum::extract::{Path, State};
use axum::{http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use colander_core::SnapshotStore;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{LineResponse, SelectionPayload};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SnapshotResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub recipe_selections: Vec<SelectionPayload>,
    pub shopping_list: Vec<LineResponse>,
}

#[utoipa::path(
    get,
    path = "/api/shopping-lists/{id}",
    tag = "shopping_lists",
    params(
        ("id" = Uuid, Path, description = "Snapshot ID")
    ),
    responses(
        (status = 200, description = "Full snapshot", body = SnapshotResponse),
        (status = 404, description = "Snapshot not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn get_snapshot(
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let store = PgStore::new(&pool);

    let snapshot = match store.fetch(id) {
        Ok(Some(snapshot)) => snapshot,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "Snapshot not found".to_string(),
                }),
            )
                .into_response();
        }
        Err(e) => {
            tracing::error!("Failed to fetch shopping list snapshot: {e}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch shopping list".to_string(),
                }),
            )
                .into_response();
        }
    };

    let response = SnapshotResponse {
        id: snapshot.id,
        created_at: snapshot.created_at,
        recipe_selections: snapshot
            .recipe_selections
            .into_iter()
            .map(SelectionPayload::from)
            .collect(),
        shopping_list: snapshot
            .shopping_list
            .into_iter()
            .map(LineResponse::from)
            .collect(),
    };

    (StatusCode::OK, Json(response)).into_response()
}
