use crecipe_core::ItemStack;
use crecipe_registry::{Ingredient, LabelRequirement, Recipe, RecipeRegistry, RecipeType, GRID_SLOTS};
use log::{log, Level};

use crate::grid::GridSnapshot;

/// How a recipe's ingredients are compared against the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Slot by slot, in recipe order.
    Shaped,
    /// By display label, regardless of position.
    Shapeless,
}

impl MatchMode {
    pub fn for_recipe(recipe: &Recipe) -> Self {
        match recipe.recipe_type() {
            RecipeType::Shapeless => Self::Shapeless,
            _ => Self::Shaped,
        }
    }
}

/// Whether `item` counts as `ingredient`. An identifier replaces the kind and label checks.
pub(crate) fn satisfies(ingredient: &Ingredient, item: &ItemStack) -> bool {
    match ingredient.identifier() {
        Some(identifier) => item.recipe_identifier() == Some(identifier),
        None => ingredient.accepts(item),
    }
}

/// Every grid item that counts as one of the recipe's ingredients holds at least that ingredient's
/// quantity. Items are checked against every ingredient, not only the one at their position.
pub fn amounts_match(grid: GridSnapshot<'_>, recipe: &Recipe) -> bool {
    recipe
        .ingredients()
        .iter()
        .filter(|ingredient| !ingredient.is_empty())
        .all(|ingredient| {
            grid.matrix
                .iter()
                .filter(|item| satisfies(ingredient, item))
                .all(|item| item.count >= ingredient.quantity())
        })
}

/// Decides whether a grid satisfies a recipe.
pub struct MatchEngine<'r> {
    registry: &'r RecipeRegistry,
    trace: Level,
}

impl<'r> MatchEngine<'r> {
    pub fn new(registry: &'r RecipeRegistry) -> Self {
        Self {
            registry,
            trace: Level::Debug,
        }
    }

    /// Level the matching decisions are logged at.
    pub fn with_trace_level(mut self, level: Level) -> Self {
        self.trace = level;
        self
    }

    pub fn matches(&self, grid: GridSnapshot<'_>, recipe: &Recipe, mode: MatchMode) -> bool {
        match mode {
            MatchMode::Shaped => self.shaped(grid, recipe),
            MatchMode::Shapeless => self.shapeless(grid, recipe),
        }
    }

    /// The first recipe, in registry order, that the grid satisfies.
    ///
    /// `mode` picks how each recipe is matched, or skips it by returning `None`. Recipes the grid
    /// kind cannot craft are never considered.
    pub fn find_match<F>(&self, grid: GridSnapshot<'_>, mode: F) -> Option<&'r Recipe>
    where
        F: Fn(&Recipe) -> Option<MatchMode>,
    {
        let found = self
            .registry
            .recipes()
            .filter(|recipe| grid.kind.accepts(recipe.recipe_type()))
            .find(|recipe| {
                log!(self.trace, "Checking for {}", recipe.name());
                mode(recipe).is_some_and(|mode| self.matches(grid, recipe, mode))
            });
        if let Some(recipe) = found {
            log!(self.trace, "Found recipe {}", recipe.name());
        }
        found
    }

    pub fn shaped(&self, grid: GridSnapshot<'_>, recipe: &Recipe) -> bool {
        let name = recipe.name();
        if recipe.ingredient_count() != grid.matrix.len() {
            return false;
        }

        for (slot, (ingredient, item)) in recipe.ingredients().iter().zip(grid.matrix).enumerate() {
            let slot = slot + 1;
            if !ingredient.is_empty() && !grid.contains_kind(ingredient.kind()) {
                log!(self.trace, "{name}: no {} in the grid", ingredient.kind());
                return false;
            }

            if ingredient.is_empty() {
                if !item.is_empty() {
                    log!(self.trace, "{name}: slot {slot} should be empty");
                    return false;
                }
                continue;
            }
            if item.is_empty() {
                log!(self.trace, "{name}: slot {slot} is empty");
                return false;
            }

            if let Some(identifier) = ingredient.identifier() {
                if item.recipe_identifier() == Some(identifier) {
                    continue;
                }
                log!(self.trace, "{name}: slot {slot} is not a {identifier}");
                return false;
            }

            if item.kind != *ingredient.kind() {
                log!(self.trace, "{name}: slot {slot} holds {}", item.kind);
                return false;
            }
            // a renamed item only stands in for an ingredient if a recipe made it
            if item.has_display_name() && item.recipe_identifier().is_none() {
                log!(self.trace, "{name}: slot {slot} is renamed but untagged");
                return false;
            }
            if !ingredient.label().matches_item(item) {
                log!(self.trace, "{name}: slot {slot} has the wrong name");
                return false;
            }
        }

        if !amounts_match(grid, recipe) {
            log!(self.trace, "{name}: not enough items");
            return false;
        }
        true
    }

    pub fn shapeless(&self, grid: GridSnapshot<'_>, recipe: &Recipe) -> bool {
        let name = recipe.name();
        if recipe.ingredient_count() != GRID_SLOTS || grid.matrix.len() != GRID_SLOTS {
            return false;
        }

        if let Some(missing) = recipe
            .ingredients()
            .iter()
            .find(|ingredient| !ingredient.is_empty() && !grid.contains_kind(ingredient.kind()))
        {
            log!(self.trace, "{name}: no {} in the grid", missing.kind());
            return false;
        }

        let mut offered = Vec::with_capacity(GRID_SLOTS);
        for item in grid.matrix {
            match item.display_name() {
                Some(_) if item.is_empty() => offered.push(None),
                Some(label) if item.recipe_identifier().is_some() => offered.push(Some(label)),
                Some(_) => break,
                None => offered.push(None),
            }
        }

        let mut required = Vec::with_capacity(GRID_SLOTS);
        for ingredient in recipe.ingredients() {
            let requirement = if ingredient.is_empty() {
                LabelRequirement::Absent
            } else if let Some(identifier) = ingredient.identifier() {
                let Some(output) = self.registry.tagged_output(identifier) else {
                    log!(self.trace, "{name}: no tagged recipe {identifier}");
                    return false;
                };
                output
                    .display_name()
                    .map_or(LabelRequirement::Absent, |label| {
                        LabelRequirement::Exact(label.to_string())
                    })
            } else {
                ingredient.label().clone()
            };
            required.push(requirement);
        }

        if offered.len() != GRID_SLOTS || required.len() != GRID_SLOTS {
            log!(self.trace, "{name}: an untagged renamed item is in the grid");
            return false;
        }
        if !required
            .iter()
            .all(|requirement| offered.iter().any(|label| requirement.matches(*label)))
        {
            log!(self.trace, "{name}: names do not match");
            return false;
        }

        if !amounts_match(grid, recipe) {
            log!(self.trace, "{name}: not enough items");
            return false;
        }
        true
    }
}
