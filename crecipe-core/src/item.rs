use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Custom data key written onto items produced by a tagged recipe. The value is the recipe key.
pub const CUSTOM_ITEM_IDENTIFIER: &str = "CUSTOM_ITEM_IDENTIFIER";

const DEFAULT_NAMESPACE: &str = "minecraft";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ItemParseError {
    #[error("Item id is empty")]
    Empty,
    #[error("Invalid character '{1}' in item id \"{0}\"")]
    InvalidCharacter(String, char),
    #[error("Item id \"{0}\" has more than one namespace separator")]
    TooManySeparators(String),
}

/// The type of an item.
///
/// `Air` is the "nothing" kind: an empty slot, or an ingredient that places no constraint.
/// Every other kind is a namespaced id such as `minecraft:stick`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ItemKind {
    #[default]
    Air,
    Item(String),
}

impl ItemKind {
    /// Kind in the `minecraft` namespace. The path is not validated.
    pub fn minecraft(path: &str) -> Self {
        if path == "air" {
            return Self::Air;
        }
        Self::Item(format!("{DEFAULT_NAMESPACE}:{path}"))
    }

    pub fn is_air(&self) -> bool {
        matches!(self, Self::Air)
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Air => "minecraft:air",
            Self::Item(id) => id,
        }
    }

    /// `true` for water, lava, milk and the other filled buckets.
    pub fn is_filled_bucket(&self) -> bool {
        match self {
            Self::Air => false,
            Self::Item(id) => id.ends_with("_bucket"),
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ItemKind {
    type Err = ItemParseError;

    /// Accepts `stick`, `STICK`, `minecraft:stick`. Ids are case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        if s.is_empty() {
            return Err(ItemParseError::Empty);
        }
        let (namespace, path) = match s.split_once(':') {
            Some((_, path)) if path.contains(':') => {
                return Err(ItemParseError::TooManySeparators(s.clone()))
            }
            Some((namespace, path)) => (namespace, path),
            None => (DEFAULT_NAMESPACE, s.as_str()),
        };
        if namespace.is_empty() || path.is_empty() {
            return Err(ItemParseError::Empty);
        }
        if let Some(c) = namespace
            .chars()
            .chain(path.chars())
            .find(|c| !matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | '.' | '/'))
        {
            return Err(ItemParseError::InvalidCharacter(s.clone(), c));
        }
        if namespace == DEFAULT_NAMESPACE && path == "air" {
            return Ok(Self::Air);
        }
        Ok(Self::Item(format!("{namespace}:{path}")))
    }
}

impl TryFrom<String> for ItemKind {
    type Error = ItemParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ItemKind> for String {
    fn from(value: ItemKind) -> Self {
        value.id().to_string()
    }
}

fn default_count() -> u32 {
    1
}

/// A stack of items together with the metadata the matcher cares about.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub kind: ItemKind,
    #[serde(default = "default_count")]
    pub count: u32,
    #[serde(default)]
    pub damage: u16,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub custom_model_data: Option<i32>,
    /// Plugin-owned custom data, e.g. [`CUSTOM_ITEM_IDENTIFIER`].
    #[serde(default)]
    pub custom_data: BTreeMap<String, String>,
}

impl Default for ItemStack {
    fn default() -> Self {
        Self::empty()
    }
}

impl ItemStack {
    pub fn new(kind: ItemKind, count: u32) -> Self {
        Self {
            kind,
            count,
            damage: 0,
            display_name: None,
            custom_model_data: None,
            custom_data: BTreeMap::new(),
        }
    }

    pub fn empty() -> Self {
        Self::new(ItemKind::Air, 0)
    }

    pub fn is_empty(&self) -> bool {
        self.kind.is_air() || self.count == 0
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_damage(mut self, damage: u16) -> Self {
        self.damage = damage;
        self
    }

    pub fn with_custom_model_data(mut self, data: i32) -> Self {
        self.custom_model_data = Some(data);
        self
    }

    pub fn with_custom_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_custom_tag(key, value);
        self
    }

    pub fn has_display_name(&self) -> bool {
        self.display_name.is_some()
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn has_custom_tag(&self, key: &str) -> bool {
        self.custom_data.contains_key(key)
    }

    pub fn custom_tag(&self, key: &str) -> Option<&str> {
        self.custom_data.get(key).map(String::as_str)
    }

    pub fn set_custom_tag(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.custom_data.insert(key.into(), value.into());
    }

    /// The recipe key this item was tagged with, if it came out of a tagged recipe.
    pub fn recipe_identifier(&self) -> Option<&str> {
        self.custom_tag(CUSTOM_ITEM_IDENTIFIER)
    }

    /// Same kind and metadata, ignoring the stack size.
    pub fn is_similar(&self, other: &ItemStack) -> bool {
        self.is_similar_ignoring_model_data(other)
            && self.custom_model_data == other.custom_model_data
    }

    pub fn is_similar_ignoring_model_data(&self, other: &ItemStack) -> bool {
        self.kind == other.kind
            && self.damage == other.damage
            && self.display_name == other.display_name
            && self.custom_data == other.custom_data
    }

    /// Removes up to `amount` items, returning how many were actually taken.
    pub fn shrink(&mut self, amount: u32) -> u32 {
        let taken = amount.min(self.count);
        self.count -= taken;
        if self.count == 0 {
            *self = Self::empty();
        }
        taken
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_item_ids() {
        assert_eq!("STICK".parse::<ItemKind>(), Ok(ItemKind::minecraft("stick")));
        assert_eq!("minecraft:stick".parse::<ItemKind>(), Ok(ItemKind::minecraft("stick")));
        assert_eq!(
            "mymod:ruby".parse::<ItemKind>().unwrap().id(),
            "mymod:ruby"
        );
        assert_eq!("air".parse::<ItemKind>(), Ok(ItemKind::Air));
        assert_eq!("".parse::<ItemKind>(), Err(ItemParseError::Empty));
        assert!(matches!(
            "not an item".parse::<ItemKind>(),
            Err(ItemParseError::InvalidCharacter(_, ' '))
        ));
        assert!(matches!(
            "a:b:c".parse::<ItemKind>(),
            Err(ItemParseError::TooManySeparators(_))
        ));
    }

    #[test]
    fn similarity_ignores_count() {
        let a = ItemStack::new(ItemKind::minecraft("stick"), 3).with_display_name("Stick");
        let mut b = a.clone();
        b.count = 10;
        assert!(a.is_similar(&b));
        assert_ne!(a, b);

        let c = b.clone().with_custom_model_data(7);
        assert!(!a.is_similar(&c));
        assert!(a.is_similar_ignoring_model_data(&c));
    }

    #[test]
    fn shrink_empties_the_stack() {
        let mut stack = ItemStack::new(ItemKind::minecraft("stone"), 5);
        assert_eq!(stack.shrink(3), 3);
        assert_eq!(stack.count, 2);
        assert_eq!(stack.shrink(4), 2);
        assert!(stack.is_empty());
        assert_eq!(stack.kind, ItemKind::Air);
    }

    #[test]
    fn filled_buckets() {
        assert!(ItemKind::minecraft("water_bucket").is_filled_bucket());
        assert!(!ItemKind::minecraft("bucket").is_filled_bucket());
        assert!(!ItemKind::Air.is_filled_bucket());
    }
}
