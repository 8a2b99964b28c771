//! Bracket business logic: construction, scoring, creation and queries.

mod bracket;
mod scoring;
mod setup;
mod view;

pub use bracket::{build_bracket, generate_matches, random_match_id};
pub use scoring::{finish_tournament, propagate_winner, record_score, ScoreOutcome};
pub use setup::create_tournament;
pub use view::{get_match, get_tournament_view, list_tournaments};
