use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crecipe_core::{ItemKind, ItemStack};
use itertools::Itertools;
use serde::Deserialize;

use super::{Ingredient, LabelRequirement, Recipe, RecipeType};
use crate::error::{OutOfRangeError, RecipeLoadError};
use crate::registry::RecipeLoader;

const fn default_amount() -> u32 {
    1
}

const fn default_enabled() -> bool {
    true
}

/// One ingredient of a recipe file.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct IngredientDefinition {
    pub item: ItemKind,
    /// `false` (or absent) for "must not be renamed", `"*"` for any name, otherwise the exact name.
    #[serde(default)]
    pub name: LabelRequirement,
    #[serde(default)]
    pub identifier: Option<String>,
    #[serde(default = "default_amount")]
    pub amount: u32,
}

impl IngredientDefinition {
    fn build(&self, abbreviation: char, slot: usize) -> Result<Ingredient, OutOfRangeError> {
        let mut ingredient = Ingredient::new(abbreviation, self.item.clone());
        ingredient.set_label(self.name.clone());
        if let Some(identifier) = &self.identifier {
            ingredient.set_identifier(identifier);
        }
        ingredient.set_quantity(self.amount)?;
        ingredient.set_slot(slot)?;
        Ok(ingredient)
    }
}

/// A recipe as written in a `.json` recipe file.
///
/// Crafting recipes lay out their grid with `pattern` (up to 3 rows of up to 3 characters) and map
/// characters to ingredients with `ingredients`. Characters without a mapping are empty slots.
/// Furnace and stonecutter recipes use the single `ingredient` instead.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct RecipeDefinition {
    pub name: String,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(rename = "type", default)]
    pub recipe_type: RecipeType,
    #[serde(default)]
    pub pattern: Vec<String>,
    #[serde(default)]
    pub ingredients: HashMap<char, IngredientDefinition>,
    #[serde(default)]
    pub ingredient: Option<IngredientDefinition>,
    pub result: ItemStack,
    #[serde(default)]
    pub tagged: bool,
    #[serde(default)]
    pub permission: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub ignore_data: bool,
    #[serde(default)]
    pub ignore_model_data: bool,
    #[serde(default)]
    pub disabled_worlds: Vec<String>,
    #[serde(default)]
    pub cook_time: Option<u32>,
    #[serde(default)]
    pub experience: Option<f32>,
    #[serde(default)]
    pub bucket_consume: Option<bool>,
}

impl TryFrom<RecipeDefinition> for Recipe {
    type Error = RecipeLoadError;

    fn try_from(definition: RecipeDefinition) -> Result<Self, Self::Error> {
        let mut recipe = Recipe::new(definition.name.as_str());
        let out_of_range = |source| RecipeLoadError::OutOfRange {
            recipe: definition.name.as_str().into(),
            source,
        };

        if let Some(key) = &definition.key {
            recipe.set_key(key.clone());
        }
        recipe.set_type(definition.recipe_type);

        if definition.recipe_type.is_single_input() {
            if let Some(ingredient) = &definition.ingredient {
                recipe.add_ingredient(ingredient.build('I', 1).map_err(out_of_range)?);
            }
        } else {
            if definition.pattern.len() > 3 {
                return Err(out_of_range(OutOfRangeError::Row(definition.pattern.len())));
            }
            for row in 0..3 {
                let shape = definition.pattern.get(row).map_or("   ", String::as_str);
                recipe.set_row(row + 1, shape).map_err(out_of_range)?;
                for (column, abbreviation) in shape.chars().pad_using(3, |_| ' ').enumerate() {
                    let slot = row * 3 + column + 1;
                    if column >= 3 {
                        return Err(out_of_range(OutOfRangeError::Slot(slot)));
                    }
                    let ingredient = match definition.ingredients.get(&abbreviation) {
                        Some(ingredient) => ingredient.build(abbreviation, slot),
                        None => Ok(Ingredient::empty(abbreviation)),
                    };
                    recipe.add_ingredient(ingredient.map_err(out_of_range)?);
                }
            }
        }

        recipe.set_result(definition.result.clone())?;
        if definition.tagged {
            recipe.set_tagged(true)?;
        }
        if let Some(permission) = &definition.permission {
            recipe.set_permission(permission.clone());
        }
        recipe.set_active(definition.enabled);
        recipe.set_ignore_data(definition.ignore_data);
        recipe.set_ignore_model_data(definition.ignore_model_data);
        for world in &definition.disabled_worlds {
            recipe.add_disabled_world(world.clone());
        }
        if let Some(cook_time) = definition.cook_time {
            recipe.set_cook_time(cook_time);
        }
        if let Some(experience) = definition.experience {
            recipe.set_experience(experience);
        }
        if let Some(consume) = definition.bucket_consume {
            recipe.set_bucket_consume(consume);
        }

        Ok(recipe)
    }
}

/// Loads one recipe per `.json` file from a directory, in file name order.
pub struct JsonRecipeLoader {
    directory: PathBuf,
}

impl JsonRecipeLoader {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Parses a single recipe file's content. `path` is only used in error messages.
    pub fn parse(path: &str, content: &str) -> Result<Recipe, RecipeLoadError> {
        let definition: RecipeDefinition =
            serde_json::from_str(content).map_err(|source| RecipeLoadError::Parse {
                path: path.to_string(),
                source,
            })?;
        Recipe::try_from(definition)
    }

    fn read_file(path: &Path) -> Result<Recipe, RecipeLoadError> {
        let display = path.display().to_string();
        let content = fs::read_to_string(path).map_err(|source| RecipeLoadError::Io {
            path: display.clone(),
            source,
        })?;
        Self::parse(&display, &content)
    }
}

impl RecipeLoader for JsonRecipeLoader {
    fn load_recipes(&self) -> Vec<Result<Recipe, RecipeLoadError>> {
        let entries = match fs::read_dir(&self.directory) {
            Ok(entries) => entries,
            Err(source) => {
                return vec![Err(RecipeLoadError::Io {
                    path: self.directory.display().to_string(),
                    source,
                })]
            }
        };

        entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .sorted()
            .map(|path| Self::read_file(&path))
            .collect()
    }
}
