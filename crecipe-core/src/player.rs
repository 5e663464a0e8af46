use derive_more::Display;
use uuid::Uuid;

/// The acting player as seen by the crafting pipeline.
#[derive(Clone, Debug, PartialEq, Eq, Display)]
#[display("{name}")]
pub struct PlayerRef {
    pub uuid: Uuid,
    pub name: String,
    /// Name of the world the player is currently in.
    pub world: String,
}

impl PlayerRef {
    pub fn new(uuid: Uuid, name: impl Into<String>, world: impl Into<String>) -> Self {
        Self {
            uuid,
            name: name.into(),
            world: world.into(),
        }
    }
}
