//! Read side: single matches and whole brackets.

use crate::models::{
    GameMatch, PlayerId, Tournament, TournamentError, TournamentId, TournamentResult,
    TournamentView,
};
use crate::storage::Storage;

pub async fn get_match(store: &dyn Storage, match_id: &str) -> TournamentResult<GameMatch> {
    store
        .get_match(match_id)
        .await?
        .ok_or_else(|| TournamentError::MatchNotFound(match_id.to_string()))
}

/// Tournament, all of its matches and every player they reference.
pub async fn get_tournament_view(
    store: &dyn Storage,
    tournament_id: TournamentId,
) -> TournamentResult<TournamentView> {
    let tournament = store
        .get_tournament(tournament_id)
        .await?
        .ok_or(TournamentError::TournamentNotFound(tournament_id))?;
    let matches = store.get_matches_by_tournament(tournament_id).await?;

    let mut player_ids: Vec<PlayerId> = Vec::new();
    for id in matches.iter().flat_map(|m| [m.player1, m.player2]).flatten() {
        if !player_ids.contains(&id) {
            player_ids.push(id);
        }
    }
    let players = store.get_players(&player_ids).await?;

    Ok(TournamentView {
        tournament,
        matches,
        players,
    })
}

pub async fn list_tournaments(store: &dyn Storage) -> TournamentResult<Vec<Tournament>> {
    Ok(store.list_tournaments().await?)
}
