pub mod list;

use crate::AppState;
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/default-ingredients endpoints (mounted at /api/default-ingredients)
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list::list_default_ingredients))
}

#[derive(OpenApi)]
#[openapi(paths(list::list_default_ingredients))]
pub struct ApiDoc;
