pub mod defaults;
pub mod ingredient_types;
pub mod ingredients;
pub mod recipes;
pub mod shopping_lists;
pub mod units;

use axum::http::StatusCode;
use axum::Json;
use colander_core::GenerateError;
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

/// Shared error response used by all endpoints
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Map an engine failure onto an HTTP status and error body. Bad caller
/// input is 400, missing references 404, selections the engine cannot
/// convert or expand 422, storage trouble 500.
pub fn engine_error(err: GenerateError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match &err {
        GenerateError::InvalidSelection(_) => StatusCode::BAD_REQUEST,
        GenerateError::RecipeNotFound(_) | GenerateError::IngredientNotFound(_) => {
            StatusCode::NOT_FOUND
        }
        GenerateError::CyclicRecipeReference { .. }
        | GenerateError::ZeroYield { .. }
        | GenerateError::NoConversionPath { .. }
        | GenerateError::RecipeTooDeep { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        GenerateError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!("Shopping list generation failed: {err}");
    }
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

/// Generate the complete OpenAPI spec by merging all module specs
pub fn openapi() -> utoipa::openapi::OpenApi {
    // Base spec with shared components
    #[derive(OpenApi)]
    #[openapi(components(schemas(ErrorResponse)))]
    struct BaseApi;

    let mut spec = BaseApi::openapi();

    // Merge in each module's spec
    let modules: Vec<utoipa::openapi::OpenApi> = vec![
        units::ApiDoc::openapi(),
        ingredient_types::ApiDoc::openapi(),
        ingredients::ApiDoc::openapi(),
        defaults::ApiDoc::openapi(),
        recipes::ApiDoc::openapi(),
        shopping_lists::ApiDoc::openapi(),
    ];

    for module_spec in modules {
        // Merge paths
        spec.paths.paths.extend(module_spec.paths.paths);

        // Merge components (schemas)
        if let Some(module_components) = module_spec.components {
            if let Some(spec_components) = spec.components.as_mut() {
                spec_components.schemas.extend(module_components.schemas);
            }
        }
    }

    spec
}

#[cfg(test)]
mod tests {
    use super::*;
    use colander_core::StoreError;
    use uuid::Uuid;

    #[test]
    fn test_engine_error_status_mapping() {
        let (status, _) = engine_error(GenerateError::InvalidSelection("batches".to_string()));
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = engine_error(GenerateError::RecipeNotFound(Uuid::new_v4()));
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = engine_error(GenerateError::CyclicRecipeReference {
            name: "Veggie Stock".to_string(),
        });
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body.error.contains("Veggie Stock"));

        let (status, _) = engine_error(GenerateError::Store(StoreError::new("pool exhausted")));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_openapi_includes_all_routes() {
        let spec = openapi();
        assert!(spec.paths.paths.contains_key("/api/unit-types"));
        assert!(spec.paths.paths.contains_key("/api/ingredients"));
        assert!(spec.paths.paths.contains_key("/api/recipes/{id}"));
        assert!(spec.paths.paths.contains_key("/api/shopping-lists"));
        assert!(spec
            .paths
            .paths
            .contains_key("/api/shopping-list/formatted-text"));
    }
}
