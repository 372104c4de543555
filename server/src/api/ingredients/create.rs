use crate::api::ErrorResponse;
use crate::db::DbPool;
use crate::defaults;
use crate::get_conn;
use crate::models::{NewConversionRule, NewIngredient, NewSizeEstimationRule};
use crate::schema::{conversion_rules, ingredients, size_estimation_rules, unit_types};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use colander_core::SizeQualifier;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ConversionRulePayload {
    pub from_unit_id: Uuid,
    pub to_unit_id: Uuid,
    pub conversion_factor: f64,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SizeRulePayload {
    /// small, medium or large
    pub size_qualifier: String,
    pub reference_unit_id: Uuid,
    pub reference_value: f64,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateIngredientRequest {
    pub name: String,
    pub type_id: Uuid,
    pub shopping_unit_id: Uuid,
    #[serde(default)]
    pub conversion_rules: Vec<ConversionRulePayload>,
    #[serde(default)]
    pub size_estimation_rules: Vec<SizeRulePayload>,
    /// Seed rules from the built-in catalog when none are given
    #[serde(default)]
    pub use_default_conversions: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreateIngredientResponse {
    pub id: Uuid,
}

#[utoipa::path(
    post,
    path = "/api/ingredients",
    tag = "ingredients",
    operation_id = "create_ingredient",
    request_body = CreateIngredientRequest,
    responses(
        (status = 201, description = "Ingredient created successfully", body = CreateIngredientResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    )
)]
pub async fn create_ingredient(
    State(pool): State<Arc<DbPool>>,
    Json(request): Json<CreateIngredientRequest>,
) -> impl IntoResponse {
    let name = request.name.trim();

    if name.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Ingredient name cannot be empty".to_string(),
            }),
        )
            .into_response();
    }

    let mut conn = get_conn!(pool);

    let mut rules = request.conversion_rules;
    let mut size_rules = request.size_estimation_rules;

    // Catalog defaults only kick in when the caller gave no rules, and only
    // when their shopping unit matches the catalog entry's target unit
    if rules.is_empty() && request.use_default_conversions {
        if let Some(entry) = defaults::lookup(name) {
            let units: Vec<(Uuid, String)> = match unit_types::table
                .select((unit_types::id, unit_types::name))
                .load(&mut conn)
            {
                Ok(rows) => rows,
                Err(e) => {
                    tracing::error!("Failed to fetch unit types: {}", e);
                    return (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(ErrorResponse {
                            error: "Failed to fetch unit types".to_string(),
                        }),
                    )
                        .into_response();
                }
            };
            let unit_ids: HashMap<&str, Uuid> = units
                .iter()
                .map(|(id, unit_name)| (unit_name.as_str(), *id))
                .collect();
            let shopping_unit_name = units
                .iter()
                .find(|(id, _)| *id == request.shopping_unit_id)
                .map(|(_, unit_name)| unit_name.as_str());

            if shopping_unit_name == Some(entry.shopping_unit.as_str()) {
                let seeded: Vec<ConversionRulePayload> = entry
                    .conversions
                    .iter()
                    .filter_map(|c| {
                        unit_ids
                            .get(c.from_unit.as_str())
                            .map(|&from_unit_id| ConversionRulePayload {
                                from_unit_id,
                                to_unit_id: request.shopping_unit_id,
                                conversion_factor: c.factor,
                            })
                    })
                    .collect();
                if !seeded.is_empty() {
                    rules = seeded;
                    size_rules = entry
                        .size_estimation
                        .iter()
                        .filter_map(|r| {
                            unit_ids.get(r.reference_unit.as_str()).map(|&unit_id| {
                                SizeRulePayload {
                                    size_qualifier: r.size.clone(),
                                    reference_unit_id: unit_id,
                                    reference_value: r.value,
                                }
                            })
                        })
                        .collect();
                }
            }
        }
    }

    if rules.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "No conversion rules provided. Add rules manually or enable default conversions.".to_string(),
            }),
        )
            .into_response();
    }

    for rule in &size_rules {
        if SizeQualifier::from_str(&rule.size_qualifier).is_none() {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Unknown size qualifier \"{}\"", rule.size_qualifier),
                }),
            )
                .into_response();
        }
    }

    // Insert the ingredient and its rules atomically
    let result: Result<Uuid, DieselError> = conn.transaction(|conn| {
        let new_ingredient = NewIngredient {
            name,
            type_id: request.type_id,
            shopping_unit_id: request.shopping_unit_id,
        };

        let ingredient_id: Uuid = diesel::insert_into(ingredients::table)
            .values(&new_ingredient)
            .returning(ingredients::id)
            .get_result(conn)?;

        let new_rules: Vec<NewConversionRule> = rules
            .iter()
            .map(|r| NewConversionRule {
                ingredient_id,
                from_unit_id: r.from_unit_id,
                to_unit_id: r.to_unit_id,
                conversion_factor: r.conversion_factor,
            })
            .collect();
        diesel::insert_into(conversion_rules::table)
            .values(&new_rules)
            .execute(conn)?;

        let new_sizes: Vec<NewSizeEstimationRule> = size_rules
            .iter()
            .map(|r| NewSizeEstimationRule {
                ingredient_id,
                size_qualifier: r.size_qualifier.as_str(),
                reference_unit_id: r.reference_unit_id,
                reference_value: r.reference_value,
            })
            .collect();
        diesel::insert_into(size_estimation_rules::table)
            .values(&new_sizes)
            .execute(conn)?;

        Ok(ingredient_id)
    });

    match result {
        Ok(id) => (StatusCode::CREATED, Json(CreateIngredientResponse { id })).into_response(),
        Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("Ingredient \"{name}\" already exists"),
            }),
        )
            .into_response(),
        Err(DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _)) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Unknown ingredient type or unit id".to_string(),
            }),
        )
            .into_response(),
        Err(DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, _)) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Conversion factors and size values must be positive".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to create ingredient: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to create ingredient".to_string(),
                }),
            )
                .into_response()
        }
    }
}
