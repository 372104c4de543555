use crate::api::ErrorResponse;
use crate::db::DbPool;
use crate::store::PgStore;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use colander_core::SnapshotStore;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SnapshotSummaryResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[utoipa::path(
    get,
    path = "/api/shopping-lists",
    tag = "shopping_lists",
    responses(
        (status = 200, description = "Snapshot summaries, newest first", body = Vec<SnapshotSummaryResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_snapshots(State(pool): State<Arc<DbPool>>) -> impl IntoResponse {
    let store = PgStore::new(&pool);

    match store.list() {
        Ok(summaries) => {
            let summaries: Vec<SnapshotSummaryResponse> = summaries
                .into_iter()
                .map(|summary| SnapshotSummaryResponse {
                    id: summary.id,
                    created_at: summary.created_at,
                })
                .collect();
            (StatusCode::OK, Json(summaries)).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to list shopping list snapshots: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch shopping lists".to_string(),
                }),
            )
                .into_response()
        }
    }
}
