pub mod list;

use crate::AppState;
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/ingredient-types endpoints (mounted at /api/ingredient-types)
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list::list_ingredient_types))
}

#[derive(OpenApi)]
#[openapi(
    paths(list::list_ingredient_types),
    components(schemas(list::IngredientTypeResponse))
)]
pub struct ApiDoc;
