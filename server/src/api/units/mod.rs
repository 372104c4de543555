pub mod list;

use crate::AppState;
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/unit-types endpoints (mounted at /api/unit-types)
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list::list_unit_types))
}

#[derive(OpenApi)]
#[openapi(
    paths(list::list_unit_types),
    components(schemas(list::UnitTypeResponse))
)]
pub struct ApiDoc;
