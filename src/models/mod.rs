//! Data structures for brackets: players, matches, tournaments, errors.

mod error;
mod game;
mod player;
mod tournament;

pub use error::{StorageError, StorageResult, TournamentError, TournamentResult};
pub use game::{GameMatch, MatchId, Slot};
pub use player::{Player, PlayerId};
pub use tournament::{Tournament, TournamentId, TournamentView};
