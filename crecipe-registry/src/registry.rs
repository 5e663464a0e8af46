use crecipe_core::ItemStack;
use indexmap::IndexMap;

use crate::error::{InvalidRecipeError, RecipeLoadError};
use crate::recipe::{Recipe, RecipeId};

/// The host runtime's live recipe table, which also holds every recipe registered with it.
pub trait HostRecipeTable {
    fn contains(&self, key: &str) -> bool;
    /// Returns `true` if the key was present.
    fn remove(&mut self, key: &str) -> bool;
}

/// Produces recipes for [`RecipeRegistry::reload`]. One failed recipe never stops the others.
pub trait RecipeLoader {
    fn load_recipes(&self) -> Vec<Result<Recipe, RecipeLoadError>>;
}

/// Every registered custom recipe, in registration order.
#[derive(Debug, Default, Clone)]
pub struct RecipeRegistry {
    recipes: IndexMap<RecipeId, Recipe>,
    /// Keys handed to the host so far, kept across `unregister` so a reload can clear them.
    keys: Vec<String>,
}

impl RecipeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates `recipe` and stores it under its name, replacing a recipe of the same name.
    /// On error the registry is left untouched.
    pub fn register(&mut self, recipe: Recipe) -> Result<(), InvalidRecipeError> {
        recipe.validate()?;

        if let Some(key) = recipe.namespaced_key() {
            if !self.keys.contains(&key) {
                self.keys.push(key);
            }
        }
        log::debug!("Registered recipe {}", recipe.name());
        self.recipes.insert(recipe.name().clone(), recipe);
        Ok(())
    }

    pub fn unregister(&mut self, name: &str) -> Option<Recipe> {
        self.recipes.shift_remove(name)
    }

    /// The first recipe that produces `item`.
    pub fn find_by_result(&self, item: &ItemStack) -> Option<&Recipe> {
        self.recipes.values().find(|recipe| recipe.result_matches(item))
    }

    pub fn find_by_key(&self, key: &str) -> Option<&Recipe> {
        self.recipes.values().find(|recipe| recipe.key() == Some(key))
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Recipe> {
        self.recipes.get(name)
    }

    /// The result of the tagged recipe registered under `identifier`, which is what an ingredient
    /// referencing that identifier stands for.
    pub fn tagged_output(&self, identifier: &str) -> Option<&ItemStack> {
        self.find_by_key(identifier)
            .filter(|recipe| recipe.is_tagged())
            .and_then(Recipe::result)
    }

    pub fn names(&self) -> impl Iterator<Item = &RecipeId> {
        self.recipes.keys()
    }

    pub fn recipes(&self) -> impl Iterator<Item = &Recipe> {
        self.recipes.values()
    }

    pub fn results(&self) -> impl Iterator<Item = &ItemStack> {
        self.recipes.values().filter_map(Recipe::result)
    }

    pub fn registered_keys(&self) -> &[String] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Drops every recipe (and its host registration) and registers whatever `loader` yields.
    /// Returns the recipes that could not be loaded.
    pub fn reload(
        &mut self,
        host: &mut dyn HostRecipeTable,
        loader: &dyn RecipeLoader,
    ) -> Vec<RecipeLoadError> {
        for key in self.keys.drain(..) {
            if host.contains(&key) {
                host.remove(&key);
            }
        }
        self.recipes.clear();

        let mut failed = Vec::new();
        for loaded in loader.load_recipes() {
            if let Err(err) =
                loaded.and_then(|recipe| self.register(recipe).map_err(RecipeLoadError::from))
            {
                failed.push(err);
            }
        }
        log::debug!(
            "Reloaded {} recipes, {} failed",
            self.recipes.len(),
            failed.len()
        );
        failed
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crecipe_core::ItemKind;

    use super::*;
    use crate::error::InvalidRecipeCause;
    use crate::recipe::{Ingredient, RecipeType};

    fn furnace(name: &str, result: &str) -> Recipe {
        let mut recipe = Recipe::new(name);
        recipe.set_key(name);
        recipe.set_type(RecipeType::Furnace);
        recipe.add_ingredient(Ingredient::new('I', ItemKind::minecraft("iron_ore")));
        recipe
            .set_result(ItemStack::new(ItemKind::minecraft(result), 1))
            .unwrap();
        recipe
    }

    #[derive(Default)]
    struct Host(HashSet<String>);

    impl HostRecipeTable for Host {
        fn contains(&self, key: &str) -> bool {
            self.0.contains(key)
        }

        fn remove(&mut self, key: &str) -> bool {
            self.0.remove(key)
        }
    }

    struct Fixed(Vec<Recipe>);

    impl RecipeLoader for Fixed {
        fn load_recipes(&self) -> Vec<Result<Recipe, RecipeLoadError>> {
            self.0.iter().cloned().map(Ok).collect()
        }
    }

    #[test]
    fn register_and_lookup() {
        let mut registry = RecipeRegistry::new();
        registry.register(furnace("ingot", "iron_ingot")).unwrap();
        registry.register(furnace("nugget", "iron_nugget")).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.names().map(RecipeId::as_str).collect::<Vec<_>>(),
            ["ingot", "nugget"]
        );
        assert!(registry.find_by_name("ingot").is_some());
        assert_eq!(
            registry.find_by_key("nugget").unwrap().name().as_str(),
            "nugget"
        );
        let nugget = ItemStack::new(ItemKind::minecraft("iron_nugget"), 5);
        assert_eq!(
            registry.find_by_result(&nugget).unwrap().name().as_str(),
            "nugget"
        );
        assert!(registry
            .find_by_result(&nugget.clone().with_display_name("Shiny"))
            .is_none());
        assert_eq!(registry.results().count(), 2);
        assert_eq!(
            registry.registered_keys(),
            ["customrecipes:ingot", "customrecipes:nugget"]
        );
    }

    #[test]
    fn invalid_recipe_leaves_registry_unchanged() {
        let mut registry = RecipeRegistry::new();
        let mut broken = furnace("broken", "iron_ingot");
        broken.add_ingredient(Ingredient::new('C', ItemKind::minecraft("coal")));

        let err = registry.register(broken).unwrap_err();
        assert_eq!(err.recipe.as_str(), "broken");
        assert!(matches!(
            err.cause,
            InvalidRecipeCause::NotSingleIngredient { found: 2, .. }
        ));
        assert!(registry.is_empty());
        assert!(registry.registered_keys().is_empty());
    }

    #[test]
    fn unregister_is_noop_when_absent() {
        let mut registry = RecipeRegistry::new();
        registry.register(furnace("ingot", "iron_ingot")).unwrap();
        assert!(registry.unregister("missing").is_none());
        assert!(registry.unregister("ingot").is_some());
        assert!(registry.is_empty());
        // the host may still know it until the next reload
        assert_eq!(registry.registered_keys().len(), 1);
    }

    #[test]
    fn tagged_output_needs_tagged_recipe() {
        let mut registry = RecipeRegistry::new();
        let mut gem = furnace("gem", "emerald");
        registry.register(gem.clone()).unwrap();
        assert!(registry.tagged_output("gem").is_none());

        gem.set_tagged(true).unwrap();
        registry.register(gem).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.tagged_output("gem").unwrap().recipe_identifier(),
            Some("gem")
        );
    }

    #[test]
    fn reload_clears_host_and_repopulates() {
        let mut registry = RecipeRegistry::new();
        registry.register(furnace("old", "iron_ingot")).unwrap();

        let mut host = Host::default();
        host.0.insert("customrecipes:old".to_string());
        host.0.insert("minecraft:torch".to_string());

        let mut invalid = furnace("invalid", "gold_ingot");
        invalid.add_ingredient(Ingredient::new('C', ItemKind::minecraft("coal")));
        let loader = Fixed(vec![furnace("new", "iron_nugget"), invalid]);

        let failed = registry.reload(&mut host, &loader);
        assert_eq!(failed.len(), 1);
        assert!(matches!(failed[0], RecipeLoadError::Invalid(_)));
        assert!(!host.contains("customrecipes:old"));
        assert!(host.contains("minecraft:torch"));
        assert!(registry.find_by_name("old").is_none());
        assert!(registry.find_by_name("new").is_some());
        assert_eq!(registry.registered_keys(), ["customrecipes:new"]);
    }
}
