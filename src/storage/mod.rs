//! Storage contract the bracket logic reads and writes through.
//!
//! The logic never holds a bracket in memory between calls; every operation
//! starts from a match or tournament id and goes through this trait. Backends
//! are injected as `&dyn Storage`.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::{
    GameMatch, Player, PlayerId, Slot, StorageResult, Tournament, TournamentId,
};

/// Persistence operations for tournaments, players and matches.
///
/// The two `update_match_*` operations are conditional: they only write when the
/// targeted fields are still empty and report `false` otherwise. This is what makes
/// scoring exactly-once and keeps the player1-first tie-break stable when sibling
/// matches finish at the same time.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Store a tournament row minted by the caller.
    async fn insert_tournament(&self, tournament: &Tournament) -> StorageResult<()>;

    /// Create an unfinished tournament and return its id.
    async fn create_tournament(&self, name: &str) -> StorageResult<TournamentId> {
        let tournament = Tournament::new(name);
        self.insert_tournament(&tournament).await?;
        Ok(tournament.id)
    }

    /// Create one player per name, returned in input order.
    async fn create_players(&self, names: &[String]) -> StorageResult<Vec<Player>>;

    /// Insert a whole match set. Nothing is written if any id is already taken.
    async fn insert_matches(&self, matches: &[GameMatch]) -> StorageResult<()>;

    async fn get_match(&self, match_id: &str) -> StorageResult<Option<GameMatch>>;

    /// Matches of a tournament in insertion order.
    async fn get_matches_by_tournament(
        &self,
        tournament_id: TournamentId,
    ) -> StorageResult<Vec<GameMatch>>;

    /// Set both scores and `played_at` if the match exists and is unscored.
    async fn update_match_score(
        &self,
        match_id: &str,
        player1_score: u32,
        player2_score: u32,
        played_at: DateTime<Utc>,
    ) -> StorageResult<bool>;

    /// Put `player_id` into `slot` if the match exists and that slot is empty.
    async fn update_match_slot(
        &self,
        match_id: &str,
        slot: Slot,
        player_id: PlayerId,
    ) -> StorageResult<bool>;

    /// Set `finished`; `false` when no such tournament exists.
    async fn mark_tournament_finished(&self, tournament_id: TournamentId) -> StorageResult<bool>;

    async fn get_tournament(&self, tournament_id: TournamentId)
        -> StorageResult<Option<Tournament>>;

    /// All tournaments, oldest first.
    async fn list_tournaments(&self) -> StorageResult<Vec<Tournament>>;

    /// Players for the given ids; unknown ids are skipped.
    async fn get_players(&self, ids: &[PlayerId]) -> StorageResult<Vec<Player>>;
}
