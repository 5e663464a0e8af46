use std::sync::Arc;

use crecipe_config::CraftingConfiguration;
use crecipe_core::{ItemStack, PermissionChecker, PlayerRef};
use crecipe_inventory::{
    amounts_match, consume, Click, CraftAction, CraftPlan, CraftingGrid, GridId, GridKind,
    GridLookup, InventoryError, MatchEngine, MatchMode,
};
use crecipe_registry::{HostRecipeTable, InvalidRecipeError, Recipe, RecipeLoader, RecipeRegistry};
use log::{log, Level};
use parking_lot::{Mutex, RwLock, RwLockReadGuard};

use crate::access::{Access, AccessGate};
use crate::error::CraftingError;
use crate::messaging::MessageSink;
use crate::scheduler::{Scheduler, Task, CURSOR_RETURN_DELAY};

/// The custom crafting pipeline.
///
/// The host calls [`on_grid_change`](Self::on_grid_change) whenever a crafting grid's contents
/// change, [`on_craft_confirmed`](Self::on_craft_confirmed) (or [`handle_click`](Self::handle_click))
/// when a player takes the result, and [`tick`](Self::tick) once per server tick to run the work
/// deferred by single crafts.
pub struct CraftingService {
    registry: RwLock<RecipeRegistry>,
    config: CraftingConfiguration,
    permissions: Arc<dyn PermissionChecker>,
    messages: Arc<dyn MessageSink>,
    scheduler: Mutex<Scheduler>,
}

impl CraftingService {
    pub fn new(
        config: CraftingConfiguration,
        permissions: Arc<dyn PermissionChecker>,
        messages: Arc<dyn MessageSink>,
    ) -> Self {
        Self {
            registry: RwLock::new(RecipeRegistry::new()),
            config,
            permissions,
            messages,
            scheduler: Mutex::new(Scheduler::new()),
        }
    }

    pub fn config(&self) -> &CraftingConfiguration {
        &self.config
    }

    pub fn registry(&self) -> RwLockReadGuard<'_, RecipeRegistry> {
        self.registry.read()
    }

    pub fn register_recipe(&self, recipe: Recipe) -> Result<(), InvalidRecipeError> {
        self.registry.write().register(recipe)
    }

    pub fn unregister_recipe(&self, name: &str) -> Option<Recipe> {
        self.registry.write().unregister(name)
    }

    /// Replaces every recipe with what `loader` yields. Recipes that fail to load are logged and
    /// skipped. Returns how many recipes are registered afterwards.
    pub fn reload(&self, host: &mut dyn HostRecipeTable, loader: &dyn RecipeLoader) -> usize {
        let mut registry = self.registry.write();
        for err in registry.reload(host, loader) {
            err.log();
        }
        log::info!("Loaded {} custom recipes", registry.len());
        registry.len()
    }

    pub fn pending_tasks(&self) -> usize {
        self.scheduler.lock().pending()
    }

    fn trace_level(&self) -> Level {
        if self.config.debug {
            Level::Info
        } else {
            Level::Debug
        }
    }

    fn gate(&self) -> AccessGate<'_> {
        AccessGate::new(&self.config, self.permissions.as_ref())
    }

    /// Whether the host's own result stands for `recipe`, set either in the recipe or the config.
    fn ignores_data(&self, recipe: &Recipe) -> bool {
        recipe.ignore_data() || self.config.recipe_settings(recipe.name().as_str()).ignore_data
    }

    fn match_mode(&self, recipe: &Recipe) -> Option<MatchMode> {
        if self.ignores_data(recipe) {
            return None;
        }
        let settings = self.config.recipe_settings(recipe.name().as_str());
        if settings.shapeless == Some(true) {
            return Some(MatchMode::Shapeless);
        }
        Some(MatchMode::for_recipe(recipe))
    }

    fn deny(&self, grid: &mut dyn CraftingGrid, player: &PlayerRef, message: &str) {
        grid.set_result(ItemStack::empty());
        self.messages.send(player, message);
    }

    /// Re-evaluates the result the grid offers after its contents changed.
    ///
    /// Blacklisted results are removed first. If the offered result is produced by a custom
    /// recipe, the first recipe the grid satisfies replaces it, provided the player may craft it,
    /// and no match empties it. Results no custom recipe produces are left to the host.
    pub fn on_grid_change(&self, grid: &mut dyn CraftingGrid, player: &PlayerRef) {
        let result = grid.result().clone();
        if result.is_empty() {
            return;
        }

        let gate = self.gate();
        if let Access::Deny(message) = gate.check_blacklist(&result, player) {
            self.deny(grid, player, &message);
            return;
        }

        let registry = self.registry.read();
        let Some(owner) = registry.find_by_result(&result) else {
            return;
        };
        if self.ignores_data(owner) {
            log!(self.trace_level(), "Ignoring data for {}", owner.name());
            return;
        }

        let engine = MatchEngine::new(&registry).with_trace_level(self.trace_level());
        let Some(recipe) = engine.find_match(grid.snapshot(), |recipe| self.match_mode(recipe))
        else {
            log!(self.trace_level(), "No custom recipe matches {}", grid.id());
            grid.set_result(ItemStack::empty());
            return;
        };

        match gate.check_recipe(recipe, player) {
            Access::Allow => {
                if let Some(output) = recipe.result() {
                    grid.set_result(output.clone());
                }
            }
            Access::Deny(message) => self.deny(grid, player, &message),
        }
    }

    /// Decodes a click packet and, when it takes the result, runs the craft.
    pub fn handle_click(
        &self,
        grid: &mut dyn CraftingGrid,
        player: &PlayerRef,
        mode: u8,
        button: i8,
        slot: i16,
    ) -> Result<(), InventoryError> {
        let click = Click::new(mode, button, slot)?;
        if click.is_result_slot() {
            self.on_craft_confirmed(grid, player, click.craft_action())?;
        }
        Ok(())
    }

    /// Takes the ingredients of a custom craft out of a workbench grid.
    ///
    /// A bulk craft happens immediately: the grid is emptied by as many crafts as it holds and the
    /// results go to the player's inventory. A single craft takes one craft's worth on the next
    /// tick, rechecks the result after that, and puts the crafted item on the cursor
    /// [`CURSOR_RETURN_DELAY`] ticks later.
    pub fn on_craft_confirmed(
        &self,
        grid: &mut dyn CraftingGrid,
        player: &PlayerRef,
        action: CraftAction,
    ) -> Result<(), InventoryError> {
        if grid.kind() != GridKind::Workbench {
            return Ok(());
        }
        let result = grid.result().clone();
        if result.is_empty() || !grid.cursor().is_empty() {
            return Ok(());
        }

        let registry = self.registry.read();
        let Some(recipe) = registry.find_by_result(&result) else {
            return Ok(());
        };
        let Some(plan) = CraftPlan::new(recipe, grid.snapshot()) else {
            log!(self.trace_level(), "{player} has nothing to craft {} from", recipe.name());
            return Ok(());
        };

        match action {
            CraftAction::Bulk => {
                plan.apply_bulk(grid, &result, recipe.bucket_consume())?;
                log!(
                    self.trace_level(),
                    "{player} crafted {} x{}",
                    recipe.name(),
                    plan.repeats()
                );
            }
            CraftAction::Single => {
                let id = grid.id();
                let mut scheduler = self.scheduler.lock();
                for (slot, amount) in plan.deductions(CraftAction::Single) {
                    scheduler.run_next_tick(Task::ConsumeFromSlot {
                        grid: id,
                        slot,
                        amount,
                        bucket_consume: recipe.bucket_consume(),
                    });
                }
                scheduler.run_next_tick(Task::RecheckResult {
                    grid: id,
                    recipe: recipe.name().clone(),
                });
                scheduler.run_later(
                    CURSOR_RETURN_DELAY,
                    Task::ReturnToCursor {
                        grid: id,
                        item: result,
                    },
                );
            }
        }
        Ok(())
    }

    /// Advances the scheduler one tick and runs the tasks that became due.
    pub fn tick(&self, grids: &mut dyn GridLookup) {
        let due = self.scheduler.lock().tick();
        for task in due {
            if let Err(err) = self.run_task(task, grids) {
                err.log();
            }
        }
    }

    fn run_task(&self, task: Task, grids: &mut dyn GridLookup) -> Result<(), InventoryError> {
        let id = task.grid();
        let grid = grids
            .grid_mut(id)
            .ok_or(InventoryError::UnknownGrid(id.0))?;

        match task {
            Task::ConsumeFromSlot {
                slot,
                amount,
                bucket_consume,
                ..
            } => consume(grid.item_mut(slot)?, amount, bucket_consume),
            Task::RecheckResult { recipe, .. } => {
                let registry = self.registry.read();
                let engine = MatchEngine::new(&registry).with_trace_level(self.trace_level());
                let still_valid = registry.find_by_name(recipe.as_str()).is_some_and(|recipe| {
                    let snapshot = grid.snapshot();
                    amounts_match(snapshot, recipe)
                        && self
                            .match_mode(recipe)
                            .is_some_and(|mode| engine.matches(snapshot, recipe, mode))
                });
                if !still_valid {
                    log!(self.trace_level(), "{recipe} no longer matches {id}");
                    grid.set_result(ItemStack::empty());
                }
            }
            Task::ReturnToCursor { item, .. } => {
                if grid.cursor().is_empty() {
                    grid.set_cursor(item);
                }
            }
        }
        Ok(())
    }

    /// Forgets the deferred work of a grid the player closed.
    pub fn close_grid(&self, grid: GridId) {
        self.scheduler.lock().cancel_grid(grid);
    }
}
