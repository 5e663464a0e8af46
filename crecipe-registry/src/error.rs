use thiserror::Error;

use crate::recipe::{RecipeId, RecipeType};

/// A recipe broke one of the structural rules checked at registration time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Could not add recipe {recipe}: {cause}")]
pub struct InvalidRecipeError {
    pub recipe: RecipeId,
    pub cause: InvalidRecipeCause,
}

impl InvalidRecipeError {
    pub fn new(recipe: &RecipeId, cause: InvalidRecipeCause) -> Self {
        Self {
            recipe: recipe.clone(),
            cause,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidRecipeCause {
    #[error("the recipe does not have a key set")]
    MissingKey,
    #[error("recipe is {recipe_type} and does not have 9 ingredients! Ingredients: {found}")]
    NotNineIngredients {
        recipe_type: RecipeType,
        found: usize,
    },
    #[error("recipe is {recipe_type} and must have exactly 1 ingredient! Ingredients: {found}")]
    NotSingleIngredient {
        recipe_type: RecipeType,
        found: usize,
    },
    #[error("the recipe result was empty or not set")]
    MissingResult,
    #[error("shape cannot have empty rows, row {0} is not set")]
    MissingRow(usize),
    #[error("there was no result found to tag")]
    NothingToTag,
    #[error("a key must be set before the result can be tagged")]
    TagWithoutKey,
}

/// A row, slot or quantity accessor was called with a value outside its range.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutOfRangeError {
    #[error("Invalid row {0} (must be 1-3)")]
    Row(usize),
    #[error("Invalid slot {0} (must be 1-9)")]
    Slot(usize),
    #[error("Invalid quantity {0} (must be at least 1)")]
    Quantity(u32),
}

#[derive(Error, Debug)]
pub enum RecipeLoadError {
    #[error(transparent)]
    Invalid(#[from] InvalidRecipeError),
    #[error("Recipe {recipe}: {source}")]
    OutOfRange {
        recipe: RecipeId,
        source: OutOfRangeError,
    },
    #[error("Couldn't read recipe file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Couldn't parse recipe file {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}
