use crate::api::ErrorResponse;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::Recipe;
use crate::schema::{ingredients, recipe_items, recipes, unit_types};
use axum::extract::{Query, State};
use axum::{http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListRecipesParams {
    /// Space or comma separated search terms. Keeps recipes whose items
    /// reference an ingredient or sub-recipe matching any term.
    pub ingredients: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeSummary {
    pub id: Uuid,
    pub name: String,
    pub is_sub_recipe: bool,
    pub yield_quantity: f64,
    pub yield_unit_id: Uuid,
    pub yield_unit_name: String,
    pub page_number: Option<i32>,
}

/// Split a search string into lowercased terms. Commas and whitespace both
/// separate terms.
fn parse_terms(input: &str) -> Vec<String> {
    input
        .replace(',', " ")
        .split_whitespace()
        .map(str::to_lowercase)
        .collect()
}

#[utoipa::path(
    get,
    path = "/api/recipes",
    tag = "recipes",
    operation_id = "list_recipes",
    params(ListRecipesParams),
    responses(
        (status = 200, description = "Recipes with joined yield unit name, name order", body = Vec<RecipeSummary>),
        (status = 500, description = "Database error", body = ErrorResponse)
    )
)]
pub async fn list_recipes(
    Query(params): Query<ListRecipesParams>,
    State(pool): State<Arc<DbPool>>,
) -> impl IntoResponse {
    let terms = params
        .ingredients
        .as_deref()
        .map(parse_terms)
        .unwrap_or_default();

    // Pre-compute patterns so they live long enough for the boxed queries
    let patterns: Vec<String> = terms
        .iter()
        .map(|t| format!("%{}%", t.replace('%', "\\%").replace('_', "\\_")))
        .collect();

    let mut conn = get_conn!(pool);

    // With search terms, restrict to recipes whose items reference a
    // matching ingredient or sub-recipe
    let matched_ids: Option<Vec<Uuid>> = if patterns.is_empty() {
        None
    } else {
        let mut ingredient_query = ingredients::table
            .filter(ingredients::name.ilike(patterns[0].clone()))
            .into_boxed();
        for pattern in &patterns[1..] {
            ingredient_query = ingredient_query.or_filter(ingredients::name.ilike(pattern.clone()));
        }
        let ingredient_ids: Vec<Uuid> = match ingredient_query
            .select(ingredients::id)
            .load(&mut conn)
        {
            Ok(ids) => ids,
            Err(e) => {
                tracing::error!("Failed to search ingredients: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: "Failed to search recipes".to_string(),
                    }),
                )
                    .into_response();
            }
        };

        let mut target_query = recipes::table
            .filter(recipes::name.ilike(patterns[0].clone()))
            .into_boxed();
        for pattern in &patterns[1..] {
            target_query = target_query.or_filter(recipes::name.ilike(pattern.clone()));
        }
        let sub_recipe_ids: Vec<Uuid> = match target_query.select(recipes::id).load(&mut conn) {
            Ok(ids) => ids,
            Err(e) => {
                tracing::error!("Failed to search sub-recipes: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: "Failed to search recipes".to_string(),
                    }),
                )
                    .into_response();
            }
        };

        let ids: Vec<Uuid> = match recipe_items::table
            .filter(
                recipe_items::ingredient_id
                    .eq_any(ingredient_ids)
                    .or(recipe_items::sub_recipe_id.eq_any(sub_recipe_ids)),
            )
            .select(recipe_items::recipe_id)
            .distinct()
            .load(&mut conn)
        {
            Ok(ids) => ids,
            Err(e) => {
                tracing::error!("Failed to search recipe items: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: "Failed to search recipes".to_string(),
                    }),
                )
                    .into_response();
            }
        };
        Some(ids)
    };

    let mut query = recipes::table
        .inner_join(unit_types::table)
        .order(recipes::name.asc())
        .into_boxed();
    if let Some(ids) = matched_ids {
        query = query.filter(recipes::id.eq_any(ids));
    }

    let rows: Vec<(Recipe, String)> = match query
        .select((Recipe::as_select(), unit_types::name))
        .load(&mut conn)
    {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!("Failed to fetch recipes: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch recipes".to_string(),
                }),
            )
                .into_response();
        }
    };

    let response: Vec<RecipeSummary> = rows
        .into_iter()
        .map(|(r, yield_unit_name)| RecipeSummary {
            id: r.id,
            name: r.name,
            is_sub_recipe: r.is_sub_recipe,
            yield_quantity: r.yield_quantity,
            yield_unit_id: r.yield_unit_id,
            yield_unit_name,
            page_number: r.page_number,
        })
        .collect();

    (StatusCode::OK, Json(response)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_terms_empty() {
        assert!(parse_terms("").is_empty());
        assert!(parse_terms("  , ,  ").is_empty());
    }

    #[test]
    fn test_parse_terms_commas_and_spaces() {
        assert_eq!(parse_terms("onion, garlic"), vec!["onion", "garlic"]);
        assert_eq!(parse_terms("onion garlic"), vec!["onion", "garlic"]);
        assert_eq!(parse_terms("onion,garlic basil"), vec!["onion", "garlic", "basil"]);
    }

    #[test]
    fn test_parse_terms_lowercases() {
        assert_eq!(parse_terms("Bell Pepper"), vec!["bell", "pepper"]);
    }
}
