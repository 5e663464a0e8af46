use std::fmt::Formatter;

use crecipe_core::text::translate_color_codes;
use crecipe_core::{ItemKind, ItemStack};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};

use crate::error::OutOfRangeError;

/// What an ingredient demands of an item's display name.
///
/// There is no implicit wildcard: an ingredient without a label requirement is `Absent`,
/// meaning the item must not be renamed. `Any` has to be asked for explicitly.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum LabelRequirement {
    Any,
    #[default]
    Absent,
    Exact(String),
}

impl LabelRequirement {
    pub fn matches(&self, label: Option<&str>) -> bool {
        match self {
            Self::Any => true,
            Self::Absent => label.is_none(),
            Self::Exact(required) => label == Some(required.as_str()),
        }
    }

    pub fn matches_item(&self, item: &ItemStack) -> bool {
        self.matches(item.display_name())
    }

    /// The label this requirement expects, `None` for `Absent` and `Any`.
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Exact(label) => Some(label),
            Self::Any | Self::Absent => None,
        }
    }
}

struct LabelVisitor;

impl<'de> Visitor<'de> for LabelVisitor {
    type Value = LabelRequirement;

    fn expecting(&self, formatter: &mut Formatter) -> std::fmt::Result {
        write!(formatter, "false, \"*\" or a display name")
    }

    fn visit_bool<E>(self, v: bool) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        if v {
            Err(E::invalid_value(de::Unexpected::Bool(v), &self))
        } else {
            Ok(LabelRequirement::Absent)
        }
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(match v {
            "false" => LabelRequirement::Absent,
            "*" => LabelRequirement::Any,
            name => LabelRequirement::Exact(translate_color_codes(name)),
        })
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(LabelRequirement::Absent)
    }
}

impl<'de> Deserialize<'de> for LabelRequirement {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(LabelVisitor)
    }
}

/// A single required item of a recipe.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ingredient {
    abbreviation: char,
    kind: ItemKind,
    label: LabelRequirement,
    identifier: Option<String>,
    quantity: u32,
    slot: Option<usize>,
}

impl Ingredient {
    /// An ingredient requiring one item of `kind`, with no display name.
    /// `abbreviation` is the character standing for it in the recipe shape.
    pub fn new(abbreviation: char, kind: ItemKind) -> Self {
        Self {
            abbreviation,
            kind,
            label: LabelRequirement::Absent,
            identifier: None,
            quantity: 1,
            slot: None,
        }
    }

    /// A placeholder for a slot that must stay empty.
    pub fn empty(abbreviation: char) -> Self {
        Self::new(abbreviation, ItemKind::Air)
    }

    pub fn is_empty(&self) -> bool {
        self.kind.is_air()
    }

    pub fn abbreviation(&self) -> char {
        self.abbreviation
    }

    pub fn kind(&self) -> &ItemKind {
        &self.kind
    }

    pub fn label(&self) -> &LabelRequirement {
        &self.label
    }

    pub fn set_label(&mut self, label: LabelRequirement) {
        self.label = label;
    }

    /// Requires this exact display name. `&` color codes are translated.
    pub fn set_display_name(&mut self, name: &str) {
        self.label = LabelRequirement::Exact(translate_color_codes(name));
    }

    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    pub fn has_identifier(&self) -> bool {
        self.identifier.is_some()
    }

    /// Requires the item to have been produced by the tagged recipe `identifier`.
    /// `none` clears the requirement.
    pub fn set_identifier(&mut self, identifier: &str) {
        self.identifier = if identifier.eq_ignore_ascii_case("none") {
            None
        } else {
            Some(identifier.to_string())
        };
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn set_quantity(&mut self, quantity: u32) -> Result<(), OutOfRangeError> {
        if quantity == 0 {
            return Err(OutOfRangeError::Quantity(quantity));
        }
        self.quantity = quantity;
        Ok(())
    }

    /// The fixed grid position (1-9), if any.
    pub fn slot(&self) -> Option<usize> {
        self.slot
    }

    pub fn set_slot(&mut self, slot: usize) -> Result<(), OutOfRangeError> {
        if !(1..=9).contains(&slot) {
            return Err(OutOfRangeError::Slot(slot));
        }
        self.slot = Some(slot);
        Ok(())
    }

    /// Kind and display name match. Identifier and quantity are not looked at.
    pub fn accepts(&self, item: &ItemStack) -> bool {
        !self.is_empty() && item.kind == self.kind && self.label.matches_item(item)
    }
}
