use crate::defaults;
use axum::{http::StatusCode, response::IntoResponse, Json};

#[utoipa::path(
    get,
    path = "/api/default-ingredients",
    tag = "defaults",
    operation_id = "list_default_ingredients",
    responses(
        (status = 200, description = "Ingredient names with built-in conversion defaults", body = Vec<String>)
    )
)]
pub async fn list_default_ingredients() -> impl IntoResponse {
    (StatusCode::OK, Json(defaults::available_names())).into_response()
}
