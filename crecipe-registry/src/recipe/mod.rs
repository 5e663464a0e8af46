mod ingredient;
mod read;

use std::borrow::Borrow;
use std::fmt::Formatter;
use std::str::FromStr;

use crecipe_core::item::CUSTOM_ITEM_IDENTIFIER;
use crecipe_core::ItemStack;
use derive_more::Display;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};

use crate::error::{InvalidRecipeCause, InvalidRecipeError, OutOfRangeError};

pub use ingredient::{Ingredient, LabelRequirement};
pub use read::{IngredientDefinition, JsonRecipeLoader, RecipeDefinition};

/// Namespace the host registers custom recipes under.
pub const HOST_NAMESPACE: &str = "customrecipes";

pub const GRID_SLOTS: usize = 9;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display)]
pub enum RecipeType {
    #[default]
    #[display("SHAPED")]
    Shaped,
    #[display("SHAPELESS")]
    Shapeless,
    #[display("FURNACE")]
    Furnace,
    #[display("STONECUTTER")]
    Stonecutter,
}

impl RecipeType {
    /// Furnace and stonecutter recipes take one input, crafting recipes a full 3x3 grid.
    pub fn is_single_input(self) -> bool {
        matches!(self, Self::Furnace | Self::Stonecutter)
    }

    pub fn ingredient_count(self) -> usize {
        if self.is_single_input() {
            1
        } else {
            GRID_SLOTS
        }
    }
}

impl FromStr for RecipeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use RecipeType::*;
        let s = s.trim_start_matches("minecraft:").to_lowercase();
        match s.as_str() {
            "shaped" | "crafting_shaped" => Ok(Shaped),
            "shapeless" | "crafting_shapeless" => Ok(Shapeless),
            "furnace" | "smelting" => Ok(Furnace),
            "stonecutter" | "stonecutting" => Ok(Stonecutter),
            _ => Err(format!("Could not find recipe type: \"{s}\"")),
        }
    }
}

impl<'de> Deserialize<'de> for RecipeType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RecipeTypeVisitor;
        impl<'de> Visitor<'de> for RecipeTypeVisitor {
            type Value = RecipeType;

            fn expecting(&self, formatter: &mut Formatter) -> std::fmt::Result {
                write!(formatter, "valid recipe type")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                v.parse().map_err(E::custom)
            }
        }
        deserializer.deserialize_str(RecipeTypeVisitor)
    }
}

/// The name a recipe is registered under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
pub struct RecipeId(String);

impl From<String> for RecipeId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl From<&str> for RecipeId {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl RecipeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for RecipeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A custom crafting definition.
///
/// Build it with the setters, then hand it to [`crate::RecipeRegistry::register`], which checks the
/// structural rules once. The registry does not re-validate later mutations.
#[derive(Clone, Debug, PartialEq)]
pub struct Recipe {
    name: RecipeId,
    key: Option<String>,
    recipe_type: RecipeType,
    ingredients: Vec<Ingredient>,
    rows: [Option<String>; 3],
    result: Option<ItemStack>,
    permission: Option<String>,
    active: bool,
    ignore_data: bool,
    ignore_model_data: bool,
    tagged: bool,
    disabled_worlds: Vec<String>,
    cook_time: u32,
    experience: f32,
    bucket_consume: bool,
}

impl Recipe {
    pub fn new(name: impl Into<RecipeId>) -> Self {
        Self {
            name: name.into(),
            key: None,
            recipe_type: RecipeType::Shaped,
            ingredients: Vec::new(),
            rows: [None, None, None],
            result: None,
            permission: None,
            active: true,
            ignore_data: false,
            ignore_model_data: false,
            tagged: false,
            disabled_worlds: Vec::new(),
            cook_time: 200,
            experience: 1.0,
            bucket_consume: true,
        }
    }

    pub fn name(&self) -> &RecipeId {
        &self.name
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn has_key(&self) -> bool {
        self.key.is_some()
    }

    pub fn set_key(&mut self, key: impl Into<String>) {
        self.key = Some(key.into());
    }

    /// The key the host runtime knows this recipe by, `customrecipes:<key>`.
    pub fn namespaced_key(&self) -> Option<String> {
        self.key
            .as_ref()
            .map(|key| format!("{HOST_NAMESPACE}:{}", key.to_lowercase()))
    }

    pub fn recipe_type(&self) -> RecipeType {
        self.recipe_type
    }

    pub fn set_type(&mut self, recipe_type: RecipeType) {
        self.recipe_type = recipe_type;
    }

    pub fn ingredients(&self) -> &[Ingredient] {
        &self.ingredients
    }

    pub fn add_ingredient(&mut self, ingredient: Ingredient) {
        self.ingredients.push(ingredient);
    }

    pub fn ingredient_count(&self) -> usize {
        self.ingredients.len()
    }

    /// The ingredient for grid slot `slot` (1-9).
    pub fn slot(&self, slot: usize) -> Result<&Ingredient, OutOfRangeError> {
        if !(1..=GRID_SLOTS).contains(&slot) {
            return Err(OutOfRangeError::Slot(slot));
        }
        self.ingredients
            .get(slot - 1)
            .ok_or(OutOfRangeError::Slot(slot))
    }

    pub fn row(&self, row: usize) -> Result<Option<&str>, OutOfRangeError> {
        match row {
            1..=3 => Ok(self.rows[row - 1].as_deref()),
            _ => Err(OutOfRangeError::Row(row)),
        }
    }

    /// Sets shape row `row` (1-3), e.g. `"XSX"`.
    pub fn set_row(&mut self, row: usize, shape: impl Into<String>) -> Result<(), OutOfRangeError> {
        match row {
            1..=3 => {
                self.rows[row - 1] = Some(shape.into());
                Ok(())
            }
            _ => Err(OutOfRangeError::Row(row)),
        }
    }

    pub fn result(&self) -> Option<&ItemStack> {
        self.result.as_ref()
    }

    pub fn set_result(&mut self, result: ItemStack) -> Result<(), InvalidRecipeError> {
        if result.is_empty() {
            return Err(InvalidRecipeError::new(
                &self.name,
                InvalidRecipeCause::MissingResult,
            ));
        }
        self.result = Some(result);
        if self.tagged {
            self.apply_tag();
        }
        Ok(())
    }

    /// Whether `item` is this recipe's result, ignoring the stack size.
    pub fn result_matches(&self, item: &ItemStack) -> bool {
        self.result.as_ref().is_some_and(|result| {
            if self.ignore_model_data {
                result.is_similar_ignoring_model_data(item)
            } else {
                result.is_similar(item)
            }
        })
    }

    pub fn is_tagged(&self) -> bool {
        self.tagged
    }

    /// Marks the result with this recipe's key so other recipes can require it by identifier.
    /// Needs the result and the key to be set first.
    pub fn set_tagged(&mut self, tagged: bool) -> Result<(), InvalidRecipeError> {
        if self.result.is_none() {
            return Err(InvalidRecipeError::new(
                &self.name,
                InvalidRecipeCause::NothingToTag,
            ));
        }
        if self.key.is_none() {
            return Err(InvalidRecipeError::new(
                &self.name,
                InvalidRecipeCause::TagWithoutKey,
            ));
        }
        self.tagged = tagged;
        if tagged {
            self.apply_tag();
        } else if let Some(result) = self.result.as_mut() {
            result.custom_data.remove(CUSTOM_ITEM_IDENTIFIER);
        }
        Ok(())
    }

    fn apply_tag(&mut self) {
        if let (Some(result), Some(key)) = (self.result.as_mut(), self.key.as_ref()) {
            result.set_custom_tag(CUSTOM_ITEM_IDENTIFIER, key.clone());
        }
    }

    pub fn permission(&self) -> Option<&str> {
        self.permission.as_deref()
    }

    pub fn set_permission(&mut self, permission: impl Into<String>) {
        self.permission = Some(permission.into());
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn ignore_data(&self) -> bool {
        self.ignore_data
    }

    pub fn set_ignore_data(&mut self, ignore_data: bool) {
        self.ignore_data = ignore_data;
    }

    pub fn ignore_model_data(&self) -> bool {
        self.ignore_model_data
    }

    pub fn set_ignore_model_data(&mut self, ignore_model_data: bool) {
        self.ignore_model_data = ignore_model_data;
    }

    pub fn disabled_worlds(&self) -> &[String] {
        &self.disabled_worlds
    }

    pub fn add_disabled_world(&mut self, world: impl Into<String>) {
        self.disabled_worlds.push(world.into());
    }

    pub fn is_disabled_in(&self, world: &str) -> bool {
        self.disabled_worlds.iter().any(|w| w == world)
    }

    /// Furnace cook time in ticks.
    pub fn cook_time(&self) -> u32 {
        self.cook_time
    }

    pub fn set_cook_time(&mut self, ticks: u32) {
        self.cook_time = ticks;
    }

    pub fn experience(&self) -> f32 {
        self.experience
    }

    pub fn set_experience(&mut self, experience: f32) {
        self.experience = experience;
    }

    /// `true` if filled buckets are consumed, `false` if they are emptied and left in the grid.
    pub fn bucket_consume(&self) -> bool {
        self.bucket_consume
    }

    pub fn set_bucket_consume(&mut self, consume: bool) {
        self.bucket_consume = consume;
    }

    /// Checks the rules a recipe must satisfy before it can be registered.
    pub fn validate(&self) -> Result<(), InvalidRecipeError> {
        let fail = |cause| Err(InvalidRecipeError::new(&self.name, cause));

        if !self.has_key() {
            return fail(InvalidRecipeCause::MissingKey);
        }

        let found = self.ingredients.len();
        if !self.recipe_type.is_single_input() && found != GRID_SLOTS {
            return fail(InvalidRecipeCause::NotNineIngredients {
                recipe_type: self.recipe_type,
                found,
            });
        }
        if self.recipe_type.is_single_input() && found != 1 {
            return fail(InvalidRecipeCause::NotSingleIngredient {
                recipe_type: self.recipe_type,
                found,
            });
        }

        if self.result.as_ref().map_or(true, ItemStack::is_empty) {
            return fail(InvalidRecipeCause::MissingResult);
        }

        if self.recipe_type == RecipeType::Shaped {
            if let Some(missing) = self.rows.iter().position(Option::is_none) {
                return fail(InvalidRecipeCause::MissingRow(missing + 1));
            }
        }

        Ok(())
    }
}
