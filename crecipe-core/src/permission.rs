use std::collections::{HashMap, HashSet};

use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::FromPrimitive;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::PlayerRef;

/// Represents the player's permission level
///
/// Operators (level `Two` and above) hold every permission node, like on a vanilla server.
/// - `Zero`: `normal`: Player can use basic commands.
/// - `One`: `moderator`: Player can bypass spawn protection.
/// - `Two`: `gamemaster`: Player or executor can use more commands and player can use command blocks.
/// - `Three`:  `admin`: Player or executor can use commands related to multiplayer management.
/// - `Four`: `owner`: Player or executor can use all of the commands, including commands related to server management.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, FromPrimitive, ToPrimitive)]
#[repr(u8)]
pub enum PermissionLvl {
    #[default]
    Zero = 0,
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
}

impl PermissionLvl {
    pub fn is_operator(self) -> bool {
        self >= Self::Two
    }
}

impl PartialOrd for PermissionLvl {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PermissionLvl {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (*self as u8).cmp(&(*other as u8))
    }
}

impl Serialize for PermissionLvl {
    fn serialize<S>(&self, serializer: S) -> Result<<S as Serializer>::Ok, <S as Serializer>::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(*self as u8)
    }
}

impl<'de> Deserialize<'de> for PermissionLvl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = u8::deserialize(deserializer)?;
        PermissionLvl::from_u8(value).ok_or_else(|| {
            serde::de::Error::custom(format!("Invalid value for permission level: {value}"))
        })
    }
}

/// Answers whether a player holds a permission node. Implemented by the host.
pub trait PermissionChecker: Send + Sync {
    fn has_permission(&self, player: &PlayerRef, node: &str) -> bool;
}

/// The permission nodes granted to a single player.
///
/// Nodes are case-insensitive. A granted `a.b.*` covers every node below `a.b`, `*` covers all.
#[derive(Clone, Debug, Default)]
pub struct PermissionSet {
    level: PermissionLvl,
    nodes: HashSet<String>,
}

impl PermissionSet {
    pub fn new(level: PermissionLvl) -> Self {
        Self {
            level,
            nodes: HashSet::new(),
        }
    }

    pub fn with(mut self, node: &str) -> Self {
        self.grant(node);
        self
    }

    pub fn grant(&mut self, node: &str) {
        self.nodes.insert(node.to_lowercase());
    }

    pub fn revoke(&mut self, node: &str) {
        self.nodes.remove(&node.to_lowercase());
    }

    pub fn level(&self) -> PermissionLvl {
        self.level
    }

    pub fn has(&self, node: &str) -> bool {
        if self.level.is_operator() || self.nodes.contains("*") {
            return true;
        }
        let node = node.to_lowercase();
        if self.nodes.contains(&node) {
            return true;
        }
        // walk up the parents: a.b.c -> a.b.* -> a.*
        let mut rest = node.as_str();
        while let Some((parent, _)) = rest.rsplit_once('.') {
            if self.nodes.contains(&format!("{parent}.*")) {
                return true;
            }
            rest = parent;
        }
        false
    }
}

/// Permission sets keyed by player. Players without an entry hold nothing.
#[derive(Default)]
pub struct PermissionTable {
    players: HashMap<Uuid, PermissionSet>,
}

impl PermissionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, player: Uuid, permissions: PermissionSet) {
        self.players.insert(player, permissions);
    }

    pub fn get_mut(&mut self, player: &Uuid) -> Option<&mut PermissionSet> {
        self.players.get_mut(player)
    }
}

impl PermissionChecker for PermissionTable {
    fn has_permission(&self, player: &PlayerRef, node: &str) -> bool {
        self.players
            .get(&player.uuid)
            .is_some_and(|set| set.has(node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_and_wildcard_nodes() {
        let set = PermissionSet::default()
            .with("crecipe.Sword")
            .with("crecipe.bypass.*");
        assert!(set.has("crecipe.sword"));
        assert!(set.has("CRECIPE.SWORD"));
        assert!(set.has("crecipe.bypass.diamond"));
        assert!(set.has("crecipe.bypass.diamond.extra"));
        assert!(!set.has("crecipe.axe"));
        assert!(!set.has("crecipe"));
    }

    #[test]
    fn operators_hold_everything() {
        assert!(PermissionSet::new(PermissionLvl::Two).has("anything.at.all"));
        assert!(!PermissionSet::new(PermissionLvl::One).has("anything.at.all"));
        assert!(PermissionSet::default().with("*").has("x"));
    }

    #[test]
    fn table_lookup_by_player() {
        let alice = PlayerRef::new(Uuid::new_v4(), "alice", "world");
        let bob = PlayerRef::new(Uuid::new_v4(), "bob", "world");
        let mut table = PermissionTable::new();
        table.insert(alice.uuid, PermissionSet::default().with("crecipe.sword"));

        assert!(table.has_permission(&alice, "crecipe.sword"));
        assert!(!table.has_permission(&bob, "crecipe.sword"));

        if let Some(set) = table.get_mut(&alice.uuid) {
            set.revoke("crecipe.sword");
        }
        assert!(!table.has_permission(&alice, "crecipe.sword"));
    }

    #[test]
    fn level_serialization() {
        assert_eq!(PermissionLvl::from_u8(1), Some(PermissionLvl::One));
        assert_eq!(PermissionLvl::from_u8(5), None);
    }
}
