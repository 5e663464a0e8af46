pub mod item;
pub mod permission;
pub mod player;
pub mod text;

pub use item::{ItemKind, ItemParseError, ItemStack};
pub use permission::{PermissionChecker, PermissionLvl, PermissionSet, PermissionTable};
pub use player::PlayerRef;
