use std::collections::HashMap;

use crecipe_core::{ItemKind, ItemStack};
use crecipe_registry::RecipeType;
use derive_more::Display;
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::FromPrimitive;

use crate::InventoryError;

/// Slot 0 of every grid is the result, the input slots follow from 1.
pub const RESULT_SLOT: usize = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
#[display("grid#{_0}")]
pub struct GridId(pub u32);

/// The crafting stations custom recipes run in, numbered like their protocol window types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive)]
pub enum GridKind {
    Workbench = 12,
    Furnace = 14,
    Stonecutter = 24,
}

impl GridKind {
    pub fn from_window_type(window_type: i32) -> Option<Self> {
        Self::from_i32(window_type)
    }

    pub fn input_slots(self) -> usize {
        match self {
            Self::Workbench => 9,
            Self::Furnace | Self::Stonecutter => 1,
        }
    }

    /// Whether recipes of `recipe_type` can be crafted in this grid.
    pub fn accepts(self, recipe_type: RecipeType) -> bool {
        match self {
            Self::Workbench => matches!(recipe_type, RecipeType::Shaped | RecipeType::Shapeless),
            Self::Furnace => recipe_type == RecipeType::Furnace,
            Self::Stonecutter => recipe_type == RecipeType::Stonecutter,
        }
    }
}

/// A read-only view of a grid's input slots, cheap to share across threads.
#[derive(Debug, Clone, Copy)]
pub struct GridSnapshot<'a> {
    pub kind: GridKind,
    pub matrix: &'a [ItemStack],
}

impl<'a> GridSnapshot<'a> {
    pub fn new(kind: GridKind, matrix: &'a [ItemStack]) -> Self {
        Self { kind, matrix }
    }

    /// The item in input slot `slot` (1-based).
    pub fn item(&self, slot: usize) -> Option<&'a ItemStack> {
        slot.checked_sub(1).and_then(|index| self.matrix.get(index))
    }

    pub fn contains_kind(&self, kind: &ItemKind) -> bool {
        self.matrix
            .iter()
            .any(|item| !item.is_empty() && &item.kind == kind)
    }

    pub fn is_empty(&self) -> bool {
        self.matrix.iter().all(ItemStack::is_empty)
    }
}

/// Slot numbers past `i16::MAX` are reported as `i16::MAX`.
fn invalid_slot(slot: usize) -> InventoryError {
    InventoryError::InvalidSlot(i16::try_from(slot).unwrap_or(i16::MAX))
}

/// A crafting inventory owned by the host. The pipeline only reads and writes it through this trait.
pub trait CraftingGrid {
    fn id(&self) -> GridId;

    fn kind(&self) -> GridKind;

    /// The input slots, without the result.
    fn matrix(&self) -> &[ItemStack];

    fn matrix_mut(&mut self) -> &mut [ItemStack];

    fn result(&self) -> &ItemStack;

    fn set_result(&mut self, item: ItemStack);

    /// The item held on the viewer's cursor.
    fn cursor(&self) -> &ItemStack;

    fn set_cursor(&mut self, item: ItemStack);

    /// Puts `item` into the viewer's own inventory.
    fn give(&mut self, item: ItemStack);

    /// The result followed by every input slot.
    fn contents(&self) -> Vec<&ItemStack> {
        std::iter::once(self.result())
            .chain(self.matrix().iter())
            .collect()
    }

    fn item(&self, slot: usize) -> Result<&ItemStack, InventoryError> {
        if slot == RESULT_SLOT {
            return Ok(self.result());
        }
        self.matrix()
            .get(slot - 1)
            .ok_or_else(|| invalid_slot(slot))
    }

    /// Mutable access to input slot `slot` (1-based).
    fn item_mut(&mut self, slot: usize) -> Result<&mut ItemStack, InventoryError> {
        let index = slot
            .checked_sub(1)
            .ok_or_else(|| invalid_slot(slot))?;
        self.matrix_mut()
            .get_mut(index)
            .ok_or_else(|| invalid_slot(slot))
    }

    fn snapshot(&self) -> GridSnapshot<'_> {
        GridSnapshot::new(self.kind(), self.matrix())
    }
}

/// Finds the grid a deferred task was scheduled for. The grid may have been closed since.
pub trait GridLookup {
    fn grid_mut(&mut self, id: GridId) -> Option<&mut dyn CraftingGrid>;
}

impl<G: CraftingGrid> GridLookup for HashMap<GridId, G> {
    fn grid_mut(&mut self, id: GridId) -> Option<&mut dyn CraftingGrid> {
        self.get_mut(&id).map(|grid| grid as &mut dyn CraftingGrid)
    }
}

/// A plain in-memory [`CraftingGrid`].
#[derive(Debug, Clone, PartialEq)]
pub struct CraftingInventory {
    id: GridId,
    kind: GridKind,
    matrix: Vec<ItemStack>,
    result: ItemStack,
    cursor: ItemStack,
    given: Vec<ItemStack>,
}

impl CraftingInventory {
    pub fn new(id: GridId, kind: GridKind) -> Self {
        Self {
            id,
            kind,
            matrix: vec![ItemStack::empty(); kind.input_slots()],
            result: ItemStack::empty(),
            cursor: ItemStack::empty(),
            given: Vec::new(),
        }
    }

    pub fn workbench(id: GridId) -> Self {
        Self::new(id, GridKind::Workbench)
    }

    pub fn furnace(id: GridId) -> Self {
        Self::new(id, GridKind::Furnace)
    }

    pub fn stonecutter(id: GridId) -> Self {
        Self::new(id, GridKind::Stonecutter)
    }

    /// Fills input slot `slot` (1-based).
    pub fn set_item(&mut self, slot: usize, item: ItemStack) -> Result<(), InventoryError> {
        *self.item_mut(slot)? = item;
        Ok(())
    }

    /// Everything handed to the viewer's inventory so far.
    pub fn given(&self) -> &[ItemStack] {
        &self.given
    }
}

impl CraftingGrid for CraftingInventory {
    fn id(&self) -> GridId {
        self.id
    }

    fn kind(&self) -> GridKind {
        self.kind
    }

    fn matrix(&self) -> &[ItemStack] {
        &self.matrix
    }

    fn matrix_mut(&mut self) -> &mut [ItemStack] {
        &mut self.matrix
    }

    fn result(&self) -> &ItemStack {
        &self.result
    }

    fn set_result(&mut self, item: ItemStack) {
        self.result = item;
    }

    fn cursor(&self) -> &ItemStack {
        &self.cursor
    }

    fn set_cursor(&mut self, item: ItemStack) {
        self.cursor = item;
    }

    fn give(&mut self, item: ItemStack) {
        self.given.push(item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stick(count: u32) -> ItemStack {
        ItemStack::new(ItemKind::minecraft("stick"), count)
    }

    #[test]
    fn slots_are_result_then_matrix() {
        let mut grid = CraftingInventory::workbench(GridId(1));
        grid.set_item(1, stick(3)).unwrap();
        grid.set_item(9, stick(1)).unwrap();
        grid.set_result(ItemStack::new(ItemKind::minecraft("torch"), 4));

        assert_eq!(grid.contents().len(), 10);
        assert_eq!(grid.item(0).unwrap().count, 4);
        assert_eq!(grid.item(1).unwrap().count, 3);
        assert!(grid.item(5).unwrap().is_empty());
        assert_eq!(grid.item(10), Err(InventoryError::InvalidSlot(10)));
        assert_eq!(grid.set_item(0, stick(1)), Err(InventoryError::InvalidSlot(0)));
        assert_eq!(grid.item(70_000), Err(InventoryError::InvalidSlot(i16::MAX)));
        assert_eq!(
            grid.item_mut(usize::MAX),
            Err(InventoryError::InvalidSlot(i16::MAX))
        );
    }

    #[test]
    fn single_input_grids() {
        let mut furnace = CraftingInventory::furnace(GridId(2));
        assert_eq!(furnace.matrix().len(), 1);
        assert!(furnace.set_item(2, stick(1)).is_err());
        furnace.set_item(1, stick(1)).unwrap();
        assert!(furnace.snapshot().contains_kind(&ItemKind::minecraft("stick")));
        assert!(!furnace.snapshot().contains_kind(&ItemKind::minecraft("coal")));
    }

    #[test]
    fn kinds_accept_their_recipe_types() {
        assert!(GridKind::Workbench.accepts(RecipeType::Shapeless));
        assert!(!GridKind::Workbench.accepts(RecipeType::Furnace));
        assert!(GridKind::Furnace.accepts(RecipeType::Furnace));
        assert!(!GridKind::Stonecutter.accepts(RecipeType::Furnace));
        assert_eq!(GridKind::from_window_type(12), Some(GridKind::Workbench));
        assert_eq!(GridKind::from_window_type(24), Some(GridKind::Stonecutter));
        assert_eq!(GridKind::from_window_type(2), None);
    }

    #[test]
    fn lookup_by_id() {
        let mut grids = HashMap::new();
        grids.insert(GridId(7), CraftingInventory::workbench(GridId(7)));
        assert!(grids.grid_mut(GridId(7)).is_some());
        assert!(grids.grid_mut(GridId(8)).is_none());
    }
}
