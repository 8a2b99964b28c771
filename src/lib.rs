//! Single-elimination tournament brackets: library with models, storage contract and logic.

pub mod logic;
pub mod models;
pub mod storage;

pub use logic::{
    build_bracket, create_tournament, finish_tournament, generate_matches, get_match,
    get_tournament_view, list_tournaments, propagate_winner, random_match_id, record_score,
    ScoreOutcome,
};
pub use models::{
    GameMatch, MatchId, Player, PlayerId, Slot, StorageError, StorageResult, Tournament,
    TournamentError, TournamentId, TournamentResult, TournamentView,
};
pub use storage::{MemoryStore, Storage};
