//! Tournament creation: register players, draw the bracket and store it.

use crate::logic::bracket::build_bracket;
use crate::logic::view::get_tournament_view;
use crate::models::{Tournament, TournamentError, TournamentResult, TournamentView};
use crate::storage::Storage;
use rand::seq::SliceRandom;

/// Create a tournament from player names and store its full bracket.
///
/// Needs at least 2 names (checked before anything is written). Players are shuffled
/// for a random draw before the bracket is built. The tournament only becomes visible
/// once its whole bracket is stored.
pub async fn create_tournament(
    store: &dyn Storage,
    name: &str,
    player_names: &[String],
) -> TournamentResult<TournamentView> {
    if player_names.len() < 2 {
        return Err(TournamentError::MinimumPlayers);
    }

    let mut players = store.create_players(player_names).await?;
    players.shuffle(&mut rand::thread_rng());

    // The tournament row goes in last: a failed bracket insert leaves no tournament behind.
    let tournament = Tournament::new(name);
    let tournament_id = tournament.id;
    let matches = build_bracket(tournament_id, &players);
    store.insert_matches(&matches).await?;
    store.insert_tournament(&tournament).await?;

    log::info!(
        "Created tournament {} ({:?}) with {} players",
        tournament_id,
        name,
        players.len()
    );
    get_tournament_view(store, tournament_id).await
}
