use crecipe_config::{BlacklistItem, BlacklistSource, CraftingConfiguration, RecipeSettings};
use crecipe_core::text::translate_color_codes;
use crecipe_core::{ItemKind, ItemParseError, ItemStack, PermissionChecker, PlayerRef};
use crecipe_registry::Recipe;
use thiserror::Error;

use crate::error::CraftingError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Blacklist entry \"{entry}\" does not name an item: {reason}")]
pub struct UnresolvedBlacklistEntry {
    pub entry: String,
    pub reason: String,
}

/// Whether a player may take a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Allow,
    /// The result must be emptied and the message sent to the player.
    Deny(String),
}

impl Access {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Applies the blacklist and the per-recipe restrictions to a player.
pub struct AccessGate<'a> {
    config: &'a CraftingConfiguration,
    permissions: &'a dyn PermissionChecker,
}

impl<'a> AccessGate<'a> {
    pub fn new(config: &'a CraftingConfiguration, permissions: &'a dyn PermissionChecker) -> Self {
        Self {
            config,
            permissions,
        }
    }

    /// Checks the grid's proposed `result` against every blacklist entry, vanilla entries first.
    /// Entries that do not name an item are logged and skipped.
    pub fn check_blacklist(&self, result: &ItemStack, player: &PlayerRef) -> Access {
        let blacklist = &self.config.blacklist;
        if !blacklist.enabled || result.is_empty() {
            return Access::Allow;
        }

        for item in blacklist.entries() {
            let hit = match item.source {
                BlacklistSource::Custom => result.recipe_identifier() == Some(item.id),
                BlacklistSource::Vanilla => match resolve_vanilla(item.id) {
                    Ok(blocked) => blocked.is_similar(result),
                    Err(err) => {
                        err.log();
                        continue;
                    }
                },
            };
            if !hit || self.bypasses(&item, player) {
                continue;
            }

            log::debug!("{player} tried to craft blacklisted {}", item.id);
            let message = item
                .entry
                .message
                .as_deref()
                .map_or_else(|| self.config.messages.blacklisted(), translate_color_codes);
            return Access::Deny(message);
        }
        Access::Allow
    }

    fn bypasses(&self, item: &BlacklistItem<'_>, player: &PlayerRef) -> bool {
        item.entry.bypass_permission().is_some_and(|permission| {
            self.permissions
                .has_permission(player, &self.config.bypass_node(permission))
        })
    }

    /// Checks whether `player` may craft `recipe`: it has to be enabled in the configuration and
    /// active, the player needs its permission (the configured one takes precedence over the
    /// recipe's own), and the player's world must not be disabled for it.
    pub fn check_recipe(&self, recipe: &Recipe, player: &PlayerRef) -> Access {
        let settings = self.config.recipe_settings(recipe.name().as_str());
        if !settings.enabled
            || !recipe.is_active()
            || !self.has_recipe_permission(recipe, &settings, player)
        {
            return Access::Deny(self.config.messages.no_permission());
        }
        if recipe.is_disabled_in(&player.world) {
            return Access::Deny(self.config.messages.disabled_world());
        }
        Access::Allow
    }

    fn has_recipe_permission(
        &self,
        recipe: &Recipe,
        settings: &RecipeSettings,
        player: &PlayerRef,
    ) -> bool {
        settings
            .permission()
            .or(recipe.permission())
            .map_or(true, |permission| {
                self.permissions.has_permission(player, permission)
            })
    }
}

/// Turns a `material[:damage]` entry into the item it blocks.
fn resolve_vanilla(entry: &str) -> Result<ItemStack, UnresolvedBlacklistEntry> {
    let unresolved = |reason: String| UnresolvedBlacklistEntry {
        entry: entry.to_string(),
        reason,
    };

    // a namespaced id has its own colon, the damage is always the last segment
    let (material, damage) = match entry.rsplit_once(':') {
        Some((material, damage)) if damage.chars().all(|c| c.is_ascii_digit()) => {
            let damage = damage
                .parse::<u16>()
                .map_err(|err| unresolved(err.to_string()))?;
            (material, damage)
        }
        _ => (entry, 0),
    };

    let kind: ItemKind = material
        .parse()
        .map_err(|err: ItemParseError| unresolved(err.to_string()))?;
    if kind.is_air() {
        return Err(unresolved("air can not be crafted".to_string()));
    }
    Ok(ItemStack::new(kind, 1).with_damage(damage))
}

#[cfg(test)]
mod tests {
    use crecipe_config::{BlacklistEntry, LoadTomlConfiguration};
    use crecipe_core::item::CUSTOM_ITEM_IDENTIFIER;
    use crecipe_core::{PermissionLvl, PermissionSet, PermissionTable};
    use crecipe_registry::{Ingredient, RecipeType};
    use uuid::Uuid;

    use super::*;

    const CONFIG: &str = r#"
[blacklist]
enabled = true

[blacklist.vanilla."diamond_sword"]
permission = "bypass.sword"

[blacklist.vanilla."stone:3"]

[blacklist.vanilla."not an item"]

[blacklist.custom.excalibur]
message = "&4No swords from stones"

[items.locked]
permission = "crecipe.locked"

[items.off]
enabled = false
"#;

    fn config() -> CraftingConfiguration {
        CraftingConfiguration::from_toml_str(CONFIG).unwrap()
    }

    fn player(world: &str) -> PlayerRef {
        PlayerRef::new(Uuid::new_v4(), "Steve", world)
    }

    fn table(player: &PlayerRef, permissions: PermissionSet) -> PermissionTable {
        let mut table = PermissionTable::new();
        table.insert(player.uuid, permissions);
        table
    }

    fn recipe(name: &str) -> Recipe {
        let mut recipe = Recipe::new(name);
        recipe.set_key(name);
        recipe.set_type(RecipeType::Furnace);
        recipe.add_ingredient(Ingredient::new('I', ItemKind::minecraft("iron_ore")));
        recipe
            .set_result(ItemStack::new(ItemKind::minecraft("iron_ingot"), 1))
            .unwrap();
        recipe
    }

    #[test]
    fn resolves_vanilla_entries() {
        assert_eq!(
            resolve_vanilla("stone:3").unwrap(),
            ItemStack::new(ItemKind::minecraft("stone"), 1).with_damage(3)
        );
        assert_eq!(
            resolve_vanilla("mymod:ruby").unwrap().kind.id(),
            "mymod:ruby"
        );
        assert_eq!(resolve_vanilla("minecraft:stone:2").unwrap().damage, 2);
        assert!(resolve_vanilla("not an item").is_err());
        assert!(resolve_vanilla("stone:99999").is_err());
        assert!(resolve_vanilla("air").is_err());
    }

    #[test]
    fn blacklist_denies_without_bypass() {
        let config = config();
        let steve = player("world");
        let nobody = PermissionTable::new();
        let gate = AccessGate::new(&config, &nobody);

        let sword = ItemStack::new(ItemKind::minecraft("diamond_sword"), 1);
        assert_eq!(
            gate.check_blacklist(&sword, &steve),
            Access::Deny(config.messages.blacklisted())
        );

        let stone = ItemStack::new(ItemKind::minecraft("stone"), 1);
        assert!(gate.check_blacklist(&stone, &steve).is_allowed());
        assert!(!gate.check_blacklist(&stone.with_damage(3), &steve).is_allowed());

        let excalibur = ItemStack::new(ItemKind::minecraft("iron_sword"), 1)
            .with_custom_tag(CUSTOM_ITEM_IDENTIFIER, "excalibur");
        assert_eq!(
            gate.check_blacklist(&excalibur, &steve),
            Access::Deny("§4No swords from stones".to_string())
        );
    }

    #[test]
    fn bypass_permission_uses_prefix() {
        let config = config();
        let steve = player("world");
        let sword = ItemStack::new(ItemKind::minecraft("diamond_sword"), 1);

        let wrong = table(&steve, PermissionSet::default().with("bypass.sword"));
        assert!(!AccessGate::new(&config, &wrong)
            .check_blacklist(&sword, &steve)
            .is_allowed());

        let right = table(&steve, PermissionSet::default().with("crecipe.bypass.sword"));
        assert!(AccessGate::new(&config, &right)
            .check_blacklist(&sword, &steve)
            .is_allowed());
    }

    #[test]
    fn disabled_blacklist_allows_everything() {
        let mut config = config();
        config.blacklist.enabled = false;
        let nobody = PermissionTable::new();
        let sword = ItemStack::new(ItemKind::minecraft("diamond_sword"), 1);
        assert!(AccessGate::new(&config, &nobody)
            .check_blacklist(&sword, &player("world"))
            .is_allowed());
    }

    #[test]
    fn none_is_not_a_bypass() {
        let mut config = config();
        config.blacklist.vanilla.insert(
            "gold_ingot".to_string(),
            BlacklistEntry {
                permission: Some("none".to_string()),
                message: None,
            },
        );
        let steve = player("world");
        let admin = table(&steve, PermissionSet::default().with("crecipe.*"));
        let gold = ItemStack::new(ItemKind::minecraft("gold_ingot"), 1);
        assert!(!AccessGate::new(&config, &admin)
            .check_blacklist(&gold, &steve)
            .is_allowed());
    }

    #[test]
    fn recipe_permissions() {
        let config = config();
        let steve = player("world");
        let nobody = PermissionTable::new();
        let gate = AccessGate::new(&config, &nobody);
        let no_permission = Access::Deny(config.messages.no_permission());

        assert!(gate.check_recipe(&recipe("free"), &steve).is_allowed());
        assert_eq!(gate.check_recipe(&recipe("locked"), &steve), no_permission);
        assert_eq!(gate.check_recipe(&recipe("off"), &steve), no_permission);

        let mut own = recipe("own");
        own.set_permission("recipes.own");
        assert_eq!(gate.check_recipe(&own, &steve), no_permission);
        let granted = table(&steve, PermissionSet::default().with("recipes.own"));
        assert!(AccessGate::new(&config, &granted)
            .check_recipe(&own, &steve)
            .is_allowed());

        let mut inactive = recipe("inactive");
        inactive.set_active(false);
        assert_eq!(gate.check_recipe(&inactive, &steve), no_permission);

        let op = table(&steve, PermissionSet::new(PermissionLvl::Four));
        assert!(AccessGate::new(&config, &op)
            .check_recipe(&recipe("locked"), &steve)
            .is_allowed());
        // disabled in configuration is not a permission question
        assert_eq!(
            AccessGate::new(&config, &op).check_recipe(&recipe("off"), &steve),
            no_permission
        );
    }

    #[test]
    fn disabled_worlds() {
        let config = config();
        let nobody = PermissionTable::new();
        let gate = AccessGate::new(&config, &nobody);
        let mut overworld_only = recipe("overworld_only");
        overworld_only.add_disabled_world("world_nether");

        assert!(gate
            .check_recipe(&overworld_only, &player("world"))
            .is_allowed());
        assert_eq!(
            gate.check_recipe(&overworld_only, &player("world_nether")),
            Access::Deny(config.messages.disabled_world())
        );
    }
}
