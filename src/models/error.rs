//! Error types for bracket operations and the storage collaborator.

use crate::models::game::MatchId;
use crate::models::tournament::TournamentId;
use thiserror::Error;

/// Failures reported by a storage backend. Surfaced to callers unmodified.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A lock guarding the tables was poisoned by a panicking writer.
    #[error("Storage lock poisoned")]
    Poisoned,

    /// A match with this id already exists.
    #[error("Duplicate match id: {0}")]
    DuplicateMatch(MatchId),

    /// Any other backend failure.
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during tournament and match operations.
#[derive(Debug, Error)]
pub enum TournamentError {
    #[error("Match not found: {0}")]
    MatchNotFound(MatchId),

    #[error("Tournament not found: {0}")]
    TournamentNotFound(TournamentId),

    /// Scores are equal; elimination needs a winner.
    #[error("Match has to have a winner, it can not end in a draw")]
    InvalidResult,

    #[error("Both players must be assigned to the match before a score can be set")]
    IncompletePlayers,

    #[error("Score has already been set for this match")]
    AlreadyScored,

    /// Propagation target already holds two players. Means the bracket is malformed.
    #[error("Both players are already assigned to the match")]
    BothSlotsFilled,

    #[error("Minimum 2 players are required for a tournament to be created")]
    MinimumPlayers,

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl TournamentError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            TournamentError::MatchNotFound(_) | TournamentError::TournamentNotFound(_)
        )
    }

    /// Message safe to hand to API clients; storage internals are not exposed.
    pub fn client_message(&self) -> String {
        match self {
            TournamentError::Storage(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for tournament operations
pub type TournamentResult<T> = Result<T, TournamentError>;
