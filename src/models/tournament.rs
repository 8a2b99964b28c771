//! Tournament record and the assembled bracket view.

use crate::models::game::GameMatch;
use crate::models::player::{Player, PlayerId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// A tournament. `finished` flips to true once, when the final is scored.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub finished: bool,
    pub created_at: DateTime<Utc>,
}

impl Tournament {
    /// Create an in-progress tournament stamped with the current time.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            finished: false,
            created_at: Utc::now(),
        }
    }
}

/// Tournament with its whole bracket and the players referenced by it (for API / display).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TournamentView {
    pub tournament: Tournament,
    pub matches: Vec<GameMatch>,
    pub players: Vec<Player>,
}

impl TournamentView {
    /// The root match, if the bracket has any matches.
    pub fn final_match(&self) -> Option<&GameMatch> {
        self.matches.iter().find(|m| m.is_final())
    }

    /// Winner of the final once it has been played.
    pub fn champion(&self) -> Option<PlayerId> {
        self.final_match().and_then(GameMatch::winner)
    }

    /// Name lookup for a player referenced by this bracket.
    pub fn player_name(&self, id: PlayerId) -> Option<&str> {
        self.players
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.name.as_str())
    }
}
