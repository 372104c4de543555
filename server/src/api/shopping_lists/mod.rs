pub mod create;
pub mod formatted_text;
pub mod get;
pub mod list;

use crate::AppState;
use axum::routing::get;
use axum::Router;
use colander_core::{AggregatedLine, RecipeSelection};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

/// Returns the router for /api/shopping-lists endpoints (mounted at
/// /api/shopping-lists). The formatted-text route lives under the singular
/// /api/shopping-list prefix and is wired directly in main.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list::list_snapshots).post(create::create_shopping_list),
        )
        .route("/{id}", get(get::get_snapshot))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        create::create_shopping_list,
        list::list_snapshots,
        get::get_snapshot,
        formatted_text::formatted_text
    ),
    components(schemas(
        SelectionPayload,
        LineResponse,
        create::GenerateShoppingListRequest,
        create::GenerateShoppingListResponse,
        list::SnapshotSummaryResponse,
        get::SnapshotResponse,
        formatted_text::FormattedTextRequest,
        formatted_text::FormattedTextResponse
    ))
)]
pub struct ApiDoc;

/// One selected recipe and how many batches of it to shop for.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SelectionPayload {
    pub recipe_id: Uuid,
    /// Whole batches of the recipe, at least 1
    pub batches: u32,
}

impl From<SelectionPayload> for RecipeSelection {
    fn from(payload: SelectionPayload) -> Self {
        RecipeSelection {
            recipe_id: payload.recipe_id,
            batches: payload.batches,
        }
    }
}

impl From<RecipeSelection> for SelectionPayload {
    fn from(selection: RecipeSelection) -> Self {
        SelectionPayload {
            recipe_id: selection.recipe_id,
            batches: selection.batches,
        }
    }
}

/// One aggregated line of the generated list.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LineResponse {
    /// Stable key for checked-state tracking across regenerations
    pub identity_key: String,
    pub name: String,
    pub quantity: f64,
    pub unit_id: Uuid,
    pub unit_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_qualifier: Option<String>,
    pub is_sub_recipe: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yield_quantity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yield_unit_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipe_volume: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipe_weight: Option<f64>,
}

impl From<AggregatedLine> for LineResponse {
    fn from(line: AggregatedLine) -> Self {
        LineResponse {
            identity_key: line.identity_key,
            name: line.name,
            quantity: line.quantity,
            unit_id: line.unit_id,
            unit_name: line.unit_name,
            size_qualifier: line.size_qualifier.map(|q| q.as_str().to_string()),
            is_sub_recipe: line.is_sub_recipe,
            type_name: line.type_name,
            yield_quantity: line.yield_quantity,
            yield_unit_name: line.yield_unit_name,
            recipe_volume: line.recipe_volume,
            recipe_weight: line.recipe_weight,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colander_core::SizeQualifier;

    #[test]
    fn test_selection_payload_conversion() {
        let payload = SelectionPayload {
            recipe_id: Uuid::new_v4(),
            batches: 3,
        };
        let selection = RecipeSelection::from(payload.clone());
        assert_eq!(selection.recipe_id, payload.recipe_id);
        assert_eq!(selection.batches, 3);

        let back = SelectionPayload::from(selection);
        assert_eq!(back.recipe_id, payload.recipe_id);
        assert_eq!(back.batches, 3);
    }

    #[test]
    fn test_line_response_renders_size_qualifier_as_text() {
        let line = AggregatedLine {
            identity_key: "ingredient:onion:piece:large".to_string(),
            name: "Onion".to_string(),
            quantity: 2.0,
            unit_id: Uuid::new_v4(),
            unit_name: "piece".to_string(),
            size_qualifier: Some(SizeQualifier::Large),
            is_sub_recipe: false,
            type_name: Some("Produce".to_string()),
            yield_quantity: None,
            yield_unit_name: None,
            recipe_volume: None,
            recipe_weight: None,
        };
        let response = LineResponse::from(line);
        assert_eq!(response.size_qualifier.as_deref(), Some("large"));
        assert!(!response.is_sub_recipe);
    }
}
