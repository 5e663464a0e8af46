use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InventoryError {
    #[error("Invalid slot {0}")]
    InvalidSlot(i16),
    #[error("Invalid inventory packet (mode {mode}, button {button})")]
    InvalidPacket { mode: u8, button: i8 },
    #[error("Unknown crafting grid {0}")]
    UnknownGrid(u32),
}
