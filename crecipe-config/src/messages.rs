use crecipe_core::text::translate_color_codes;
use serde::{Deserialize, Serialize};
use serde_inline_default::serde_inline_default;

/// Player-facing messages. `&` color codes are translated when read.
#[serde_inline_default]
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct MessagesConfig {
    #[serde_inline_default("&cYou do not have permission to craft this recipe!".to_string())]
    pub no_permission: String,
    #[serde_inline_default("&cThis item has been blacklisted from crafting!".to_string())]
    pub blacklisted: String,
    #[serde_inline_default("&cYou can not craft this recipe in this world!".to_string())]
    pub disabled_world: String,
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            no_permission: "&cYou do not have permission to craft this recipe!".to_string(),
            blacklisted: "&cThis item has been blacklisted from crafting!".to_string(),
            disabled_world: "&cYou can not craft this recipe in this world!".to_string(),
        }
    }
}

impl MessagesConfig {
    pub fn no_permission(&self) -> String {
        translate_color_codes(&self.no_permission)
    }

    pub fn blacklisted(&self) -> String {
        translate_color_codes(&self.blacklisted)
    }

    pub fn disabled_world(&self) -> String {
        translate_color_codes(&self.disabled_world)
    }
}
