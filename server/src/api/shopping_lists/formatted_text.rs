use crate::api::{engine_error, ErrorResponse};
use crate::db::DbPool;
use crate::store::PgStore;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use colander_core::{format_shopping_list, RecipeSelection};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use super::SelectionPayload;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct FormattedTextRequest {
    #[serde(default)]
    pub recipe_selections: Vec<SelectionPayload>,
    /// Identity keys of lines to render as already checked off
    #[serde(default)]
    pub checked_item_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FormattedTextResponse {
    pub formatted_text: String,
}

#[utoipa::path(
    post,
    path = "/api/shopping-list/formatted-text",
    tag = "shopping_lists",
    request_body = FormattedTextRequest,
    responses(
        (status = 200, description = "Rendered shopping list text", body = FormattedTextResponse),
        (status = 400, description = "Invalid selections", body = ErrorResponse),
        (status = 404, description = "Recipe or ingredient not found", body = ErrorResponse),
        (status = 422, description = "Selections cannot be converted", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn formatted_text(
    State(pool): State<Arc<DbPool>>,
    Json(request): Json<FormattedTextRequest>,
) -> impl IntoResponse {
    let selections: Vec<RecipeSelection> = request
        .recipe_selections
        .into_iter()
        .map(RecipeSelection::from)
        .collect();

    let store = PgStore::new(&pool);

    match format_shopping_list(&store, &selections, &request.checked_item_ids) {
        Ok(text) => (
            StatusCode::OK,
            Json(FormattedTextResponse {
                formatted_text: text,
            }),
        )
            .into_response(),
        Err(err) => engine_error(err).into_response(),
    }
}
