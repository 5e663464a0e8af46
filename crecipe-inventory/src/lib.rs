pub mod container_click;
mod error;
pub mod grid;
pub mod matcher;
pub mod resolver;

pub use container_click::{Click, CraftAction};
pub use error::InventoryError;
pub use grid::{
    CraftingGrid, CraftingInventory, GridId, GridKind, GridLookup, GridSnapshot, RESULT_SLOT,
};
pub use matcher::{amounts_match, MatchEngine, MatchMode};
pub use resolver::{consume, CraftPlan, SlotUse};
