use thiserror::Error;
use uuid::Uuid;

/// Failure from a store backend (connection, query, serialization). The
/// engine treats these as opaque and terminal for the current request.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct StoreError {
    pub message: String,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        StoreError {
            message: message.into(),
        }
    }
}

/// Everything that can stop a shopping-list generation. All variants are
/// terminal: the engine never retries and never substitutes a default
/// quantity for a failed conversion.
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Recipe not found: {0}")]
    RecipeNotFound(Uuid),

    #[error("Ingredient not found: {0}")]
    IngredientNotFound(Uuid),

    #[error("Recipe \"{name}\" refers to itself through its sub-recipes")]
    CyclicRecipeReference { name: String },

    #[error("Sub-recipe \"{name}\" has a non-positive yield")]
    ZeroYield { name: String },

    #[error("No conversion path for \"{ingredient}\" from {from_unit} to {to_unit}")]
    NoConversionPath {
        ingredient: String,
        from_unit: String,
        to_unit: String,
    },

    #[error("Recipe nesting is deeper than {max} levels at \"{name}\"")]
    RecipeTooDeep { name: String, max: usize },

    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}
