use crecipe_core::{ItemKind, ItemStack};
use crecipe_registry::Recipe;

use crate::container_click::CraftAction;
use crate::grid::{CraftingGrid, GridSnapshot};
use crate::matcher::satisfies;
use crate::InventoryError;

/// One grid slot feeding a craft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotUse {
    /// 1-based input slot.
    pub slot: usize,
    /// Items taken from the slot by a single craft.
    pub per_craft: u32,
}

/// How often a recipe can be crafted from a grid, and what each craft takes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CraftPlan {
    repeats: u32,
    uses: Vec<SlotUse>,
}

impl CraftPlan {
    /// Plans crafting `recipe` from `grid`. `None` if some ingredient has no slot holding enough.
    ///
    /// Every ingredient takes one grid slot, and no slot feeds two ingredients. An ingredient takes
    /// its own position (or its fixed slot) when that slot holds it, otherwise the first free slot
    /// that does. The smallest `amount / quantity` over the taken slots bounds the repeat count.
    pub fn new(recipe: &Recipe, grid: GridSnapshot<'_>) -> Option<Self> {
        let mut taken = vec![false; grid.matrix.len()];
        let mut uses = Vec::new();

        for (position, ingredient) in recipe.ingredients().iter().enumerate() {
            if ingredient.is_empty() {
                continue;
            }
            let required = ingredient.quantity();
            let feeds = |index: usize| {
                !taken[index]
                    && grid
                        .matrix
                        .get(index)
                        .is_some_and(|item| satisfies(ingredient, item) && item.count >= required)
            };

            let preferred = ingredient.slot().unwrap_or(position + 1) - 1;
            let index = if preferred < taken.len() && feeds(preferred) {
                preferred
            } else {
                (0..taken.len()).find(|&index| feeds(index))?
            };
            taken[index] = true;
            uses.push(SlotUse {
                slot: index + 1,
                per_craft: required,
            });
        }
        uses.sort_by_key(|use_| use_.slot);

        let repeats = uses
            .iter()
            .filter_map(|use_| grid.item(use_.slot).map(|item| item.count / use_.per_craft))
            .min()?;
        (repeats > 0).then_some(Self { repeats, uses })
    }

    pub fn repeats(&self) -> u32 {
        self.repeats
    }

    pub fn uses(&self) -> &[SlotUse] {
        &self.uses
    }

    /// `(slot, amount)` to take for `action`: everything for a bulk craft, one craft's worth otherwise.
    pub fn deductions(&self, action: CraftAction) -> impl Iterator<Item = (usize, u32)> + '_ {
        let times = match action {
            CraftAction::Bulk => self.repeats,
            CraftAction::Single => 1,
        };
        self.uses.iter().map(move |use_| (use_.slot, use_.per_craft * times))
    }

    /// Runs a bulk craft: takes every planned item out of the grid, clears the result and cursor,
    /// and gives the viewer `repeats` copies of `result`.
    pub fn apply_bulk(
        &self,
        grid: &mut dyn CraftingGrid,
        result: &ItemStack,
        bucket_consume: bool,
    ) -> Result<(), InventoryError> {
        for (slot, amount) in self.deductions(CraftAction::Bulk) {
            consume(grid.item_mut(slot)?, amount, bucket_consume);
        }
        grid.set_cursor(ItemStack::empty());
        grid.set_result(ItemStack::empty());
        for _ in 0..self.repeats {
            grid.give(result.clone());
        }
        log::debug!(
            "Crafted {} x{} in {}",
            result.kind,
            self.repeats,
            grid.id()
        );
        Ok(())
    }
}

/// Takes `amount` items out of `item`. With `bucket_consume` off a filled bucket is emptied
/// instead of taken.
pub fn consume(item: &mut ItemStack, amount: u32, bucket_consume: bool) {
    if !bucket_consume && item.kind.is_filled_bucket() {
        *item = ItemStack::new(ItemKind::minecraft("bucket"), item.count);
        return;
    }
    item.shrink(amount);
}
