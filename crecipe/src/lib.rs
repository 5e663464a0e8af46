//! Custom crafting recipes on top of a host's crafting grids.
//!
//! Recipes live in a [`RecipeRegistry`](crecipe_registry::RecipeRegistry) owned by the
//! [`CraftingService`], which the host feeds grid changes, result clicks and ticks.

pub mod access;
pub mod error;
pub mod messaging;
pub mod scheduler;
mod service;

pub use access::{Access, AccessGate};
pub use error::CraftingError;
pub use messaging::{LogSink, MessageSink};
pub use scheduler::{Scheduler, Task, Ticker};
pub use service::CraftingService;

use crecipe_config::LoggingConfig;

/// Installs the global logger as configured. Does nothing when logging is disabled.
pub fn init_logger(config: &LoggingConfig) -> Result<(), log::SetLoggerError> {
    if !config.enabled {
        return Ok(());
    }

    let mut logger = simple_logger::SimpleLogger::new();
    logger = logger.with_timestamp_format(time::macros::format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second]"
    ));

    if !config.timestamp {
        logger = logger.without_timestamps();
    }

    if config.env {
        logger = logger.env();
    }

    logger = logger.with_level(config.level.into());

    logger = logger.with_colors(config.color);
    logger = logger.with_threads(config.threads);
    logger.init()
}
