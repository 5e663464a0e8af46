use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Results that must never be handed out, unless the player holds the entry's bypass permission.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct BlacklistConfig {
    pub enabled: bool,
    /// Keyed by `material` or `material:damage`, e.g. `"diamond_sword"` or `"stone:3"`.
    pub vanilla: IndexMap<String, BlacklistEntry>,
    /// Keyed by the identifier a custom item was tagged with.
    pub custom: IndexMap<String, BlacklistEntry>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct BlacklistEntry {
    /// Bypass permission, appended to the configured permission prefix. `"none"` means no bypass.
    pub permission: Option<String>,
    /// Overrides the global blacklisted message for this entry.
    pub message: Option<String>,
}

impl BlacklistEntry {
    pub fn bypass_permission(&self) -> Option<&str> {
        self.permission
            .as_deref()
            .filter(|perm| !perm.eq_ignore_ascii_case("none"))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlacklistSource {
    Vanilla,
    Custom,
}

/// A single blacklist entry, borrowed from the configuration.
#[derive(Clone, Copy, Debug)]
pub struct BlacklistItem<'a> {
    pub id: &'a str,
    pub source: BlacklistSource,
    pub entry: &'a BlacklistEntry,
}

impl BlacklistConfig {
    /// Vanilla entries first, then custom ones, each in file order.
    pub fn entries(&self) -> impl Iterator<Item = BlacklistItem<'_>> {
        let vanilla = self.vanilla.iter().map(|(id, entry)| BlacklistItem {
            id,
            source: BlacklistSource::Vanilla,
            entry,
        });
        let custom = self.custom.iter().map(|(id, entry)| BlacklistItem {
            id,
            source: BlacklistSource::Custom,
            entry,
        });
        vanilla.chain(custom)
    }

    pub fn len(&self) -> usize {
        self.vanilla.len() + self.custom.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
