use std::fmt::Display;

use crecipe_config::ConfigError;
use crecipe_core::ItemParseError;
use crecipe_inventory::InventoryError;
use crecipe_registry::{InvalidRecipeError, RecipeLoadError};
use log::log;

use crate::access::UnresolvedBlacklistEntry;

/// An error the crafting pipeline reports by logging instead of propagating to the host.
pub trait CraftingError: Send + std::error::Error + Display {
    fn log(&self) {
        log!(self.severity(), "{}", self.to_string());
    }

    fn severity(&self) -> log::Level;
}

impl<ErrorType: CraftingError + 'static> From<ErrorType> for Box<dyn CraftingError> {
    fn from(error: ErrorType) -> Self {
        Box::new(error)
    }
}

impl CraftingError for InvalidRecipeError {
    fn severity(&self) -> log::Level {
        log::Level::Warn
    }
}

impl CraftingError for RecipeLoadError {
    fn severity(&self) -> log::Level {
        match self {
            Self::Invalid(_) | Self::OutOfRange { .. } => log::Level::Warn,
            Self::Io { .. } | Self::Parse { .. } => log::Level::Error,
        }
    }
}

impl CraftingError for InventoryError {
    fn severity(&self) -> log::Level {
        match self {
            Self::InvalidSlot(..) | Self::InvalidPacket { .. } => log::Level::Error,
            // the grid was closed before a deferred task ran
            Self::UnknownGrid(..) => log::Level::Debug,
        }
    }
}

impl CraftingError for ConfigError {
    fn severity(&self) -> log::Level {
        log::Level::Error
    }
}

impl CraftingError for ItemParseError {
    fn severity(&self) -> log::Level {
        log::Level::Error
    }
}

impl CraftingError for UnresolvedBlacklistEntry {
    fn severity(&self) -> log::Level {
        log::Level::Error
    }
}
