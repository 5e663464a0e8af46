pub mod error;
pub mod recipe;
mod registry;

pub use error::{InvalidRecipeCause, InvalidRecipeError, OutOfRangeError, RecipeLoadError};
pub use recipe::{
    Ingredient, JsonRecipeLoader, LabelRequirement, Recipe, RecipeDefinition, RecipeId, RecipeType,
    GRID_SLOTS, HOST_NAMESPACE,
};
pub use registry::{HostRecipeTable, RecipeLoader, RecipeRegistry};
