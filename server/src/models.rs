use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::unit_types)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UnitType {
    pub id: Uuid,
    pub name: String,
    pub category: String,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::ingredient_types)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct IngredientType {
    pub id: Uuid,
    pub name: String,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::ingredients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Ingredient {
    pub id: Uuid,
    pub name: String,
    pub type_id: Uuid,
    pub shopping_unit_id: Uuid,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::ingredients)]
pub struct NewIngredient<'a> {
    pub name: &'a str,
    pub type_id: Uuid,
    pub shopping_unit_id: Uuid,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::conversion_rules)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ConversionRule {
    pub id: Uuid,
    pub ingredient_id: Uuid,
    pub from_unit_id: Uuid,
    pub to_unit_id: Uuid,
    pub conversion_factor: f64,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::conversion_rules)]
pub struct NewConversionRule {
    pub ingredient_id: Uuid,
    pub from_unit_id: Uuid,
    pub to_unit_id: Uuid,
    pub conversion_factor: f64,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::size_estimation_rules)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SizeEstimationRule {
    pub id: Uuid,
    pub ingredient_id: Uuid,
    pub size_qualifier: String,
    pub reference_unit_id: Uuid,
    pub reference_value: f64,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::size_estimation_rules)]
pub struct NewSizeEstimationRule<'a> {
    pub ingredient_id: Uuid,
    pub size_qualifier: &'a str,
    pub reference_unit_id: Uuid,
    pub reference_value: f64,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Recipe {
    pub id: Uuid,
    pub name: String,
    pub is_sub_recipe: bool,
    pub yield_quantity: f64,
    pub yield_unit_id: Uuid,
    pub page_number: Option<i32>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipes)]
pub struct NewRecipe<'a> {
    pub name: &'a str,
    pub is_sub_recipe: bool,
    pub yield_quantity: f64,
    pub yield_unit_id: Uuid,
    pub page_number: Option<i32>,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::recipe_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RecipeItem {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub item_type: String,
    pub ingredient_id: Option<Uuid>,
    pub sub_recipe_id: Option<Uuid>,
    pub quantity: f64,
    pub unit_id: Uuid,
    pub size_qualifier: Option<String>,
    pub preparation_notes: Option<String>,
    pub position: i32,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipe_items)]
pub struct NewRecipeItem<'a> {
    pub recipe_id: Uuid,
    pub item_type: &'a str,
    pub ingredient_id: Option<Uuid>,
    pub sub_recipe_id: Option<Uuid>,
    pub quantity: f64,
    pub unit_id: Uuid,
    pub size_qualifier: Option<&'a str>,
    pub preparation_notes: Option<&'a str>,
    pub position: i32,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::shopping_list_snapshots)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ShoppingListSnapshot {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub recipe_selections: serde_json::Value,
    pub shopping_list: serde_json::Value,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::shopping_list_snapshots)]
pub struct NewShoppingListSnapshot {
    pub recipe_selections: serde_json::Value,
    pub shopping_list: serde_json::Value,
}
