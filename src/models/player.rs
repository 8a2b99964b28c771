//! Player data structure.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player (used in match slots and lookups).
pub type PlayerId = Uuid;

/// A registered player. Immutable once created.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
}

impl Player {
    /// Create a new player with a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}
