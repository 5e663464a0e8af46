use crate::InventoryError;

/// What a click on the result slot asks the crafting pipeline to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CraftAction {
    /// Shift-click: craft as many times as the grid allows and move everything to the inventory.
    Bulk,
    /// Any other pickup: craft once onto the cursor.
    Single,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Click {
    pub slot: Slot,
    pub click_type: ClickType,
}

impl Click {
    /// Decodes a container click packet.
    pub fn new(mode: u8, button: i8, slot: i16) -> Result<Self, InventoryError> {
        let invalid = InventoryError::InvalidPacket { mode, button };
        match mode {
            0 => Self::new_normal_click(button, slot).ok_or(invalid),
            // Both buttons do the same here, so we omit it
            1 => Ok(Self {
                slot: Slot::normal(slot)?,
                click_type: ClickType::ShiftClick,
            }),
            2 => Self::new_key_click(button, slot)?.ok_or(invalid),
            3 => Ok(Self {
                slot: Slot::normal(slot)?,
                click_type: ClickType::CreativePickItem,
            }),
            4 => {
                let drop_type = match button {
                    0 => DropType::SingleItem,
                    1 => DropType::FullStack,
                    _ => return Err(invalid),
                };
                Ok(Self {
                    slot: Slot::OutsideInventory,
                    click_type: ClickType::DropType(drop_type),
                })
            }
            5 => Ok(Self {
                slot: Slot::normal(slot).unwrap_or(Slot::OutsideInventory),
                click_type: ClickType::MouseDrag,
            }),
            6 => Ok(Self {
                slot: Slot::normal(slot)?,
                click_type: ClickType::DoubleClick,
            }),
            _ => Err(invalid),
        }
    }

    fn new_normal_click(button: i8, slot: i16) -> Option<Self> {
        let slot = Slot::normal(slot).unwrap_or(Slot::OutsideInventory);
        let button = match button {
            0 => MouseClick::Left,
            1 => MouseClick::Right,
            _ => return None,
        };
        Some(Self {
            click_type: ClickType::MouseClick(button),
            slot,
        })
    }

    fn new_key_click(button: i8, slot: i16) -> Result<Option<Self>, InventoryError> {
        let key = match button {
            0..9 => KeyClick::Slot(button as u8),
            40 => KeyClick::Offhand,
            _ => return Ok(None),
        };
        Ok(Some(Self {
            click_type: ClickType::KeyClick(key),
            slot: Slot::normal(slot)?,
        }))
    }

    /// How a click on the result slot should be crafted.
    pub fn craft_action(&self) -> CraftAction {
        match self.click_type {
            ClickType::ShiftClick => CraftAction::Bulk,
            _ => CraftAction::Single,
        }
    }

    pub fn is_result_slot(&self) -> bool {
        self.slot == Slot::Normal(crate::RESULT_SLOT)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickType {
    MouseClick(MouseClick),
    ShiftClick,
    KeyClick(KeyClick),
    CreativePickItem,
    DropType(DropType),
    MouseDrag,
    DoubleClick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseClick {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyClick {
    Slot(u8),
    Offhand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Normal(usize),
    OutsideInventory,
}

impl Slot {
    fn normal(slot: i16) -> Result<Self, InventoryError> {
        match slot {
            -999 => Ok(Self::OutsideInventory),
            _ => usize::try_from(slot)
                .map(Self::Normal)
                .map_err(|_| InventoryError::InvalidSlot(slot)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropType {
    SingleItem,
    FullStack,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_click_on_result_is_bulk() {
        let click = Click::new(1, 0, 0).unwrap();
        assert!(click.is_result_slot());
        assert_eq!(click.craft_action(), CraftAction::Bulk);
        // both buttons shift-click
        assert_eq!(Click::new(1, 1, 0).unwrap().craft_action(), CraftAction::Bulk);
    }

    #[test]
    fn other_clicks_are_single() {
        for (mode, button) in [(0, 0), (0, 1), (2, 3), (6, 0)] {
            let click = Click::new(mode, button, 0).unwrap();
            assert_eq!(click.craft_action(), CraftAction::Single);
        }
        assert_eq!(
            Click::new(0, 1, 0).unwrap().click_type,
            ClickType::MouseClick(MouseClick::Right)
        );
    }

    #[test]
    fn outside_clicks() {
        let click = Click::new(0, 0, -999).unwrap();
        assert_eq!(click.slot, Slot::OutsideInventory);
        assert!(!click.is_result_slot());
        assert_eq!(
            Click::new(4, 1, 3).unwrap().click_type,
            ClickType::DropType(DropType::FullStack)
        );
    }

    #[test]
    fn rejects_malformed_packets() {
        assert_eq!(
            Click::new(9, 0, 0),
            Err(InventoryError::InvalidPacket { mode: 9, button: 0 })
        );
        assert_eq!(
            Click::new(0, 5, 0),
            Err(InventoryError::InvalidPacket { mode: 0, button: 5 })
        );
        assert_eq!(Click::new(1, 0, -4), Err(InventoryError::InvalidSlot(-4)));
        assert_eq!(
            Click::new(2, 40, 2).unwrap().click_type,
            ClickType::KeyClick(KeyClick::Offhand)
        );
    }
}
