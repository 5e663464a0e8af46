use serde::{Deserialize, Serialize};
use serde_inline_default::serde_inline_default;

/// Per-recipe overrides, keyed by recipe name under `[items.<name>]`.
#[serde_inline_default]
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct RecipeSettings {
    #[serde_inline_default(true)]
    pub enabled: bool,
    #[serde(default)]
    pub permission: Option<String>,
    /// Forces shapeless matching regardless of the recipe type.
    #[serde(default)]
    pub shapeless: Option<bool>,
    /// Skips custom matching entirely and keeps whatever result the host computed.
    #[serde(default)]
    pub ignore_data: bool,
}

impl Default for RecipeSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            permission: None,
            shapeless: None,
            ignore_data: false,
        }
    }
}

impl RecipeSettings {
    pub fn permission(&self) -> Option<&str> {
        self.permission
            .as_deref()
            .filter(|perm| !perm.is_empty() && !perm.eq_ignore_ascii_case("none"))
    }
}
