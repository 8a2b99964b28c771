//! Bracket construction: turn an ordered player list into a single-elimination match tree.

use crate::models::{GameMatch, MatchId, Player, TournamentId};
use rand::Rng;

/// Random match token: 10 bytes from the thread CSPRNG as 20 lowercase hex chars.
pub fn random_match_id() -> MatchId {
    let bytes: [u8; 10] = rand::thread_rng().gen();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Build the bracket for a new tournament with random match ids.
///
/// Players are used in the order given; shuffle beforehand for a random draw.
pub fn build_bracket(tournament_id: TournamentId, players: &[Player]) -> Vec<GameMatch> {
    let matches = generate_matches(tournament_id, players, None, &mut random_match_id);
    log::debug!(
        "Built bracket for tournament {}: {} players, {} matches",
        tournament_id,
        players.len(),
        matches.len()
    );
    matches
}

/// Generate the match tree for `players`, hanging its root under `next_round_id`.
///
/// Matches come out in pre-order: the current node, then the subtree of the first
/// group, then the subtree of the second. `next_id` mints one id per node.
///
/// - fewer than 2 players: no matches.
/// - 2 players: one match with both slots filled.
/// - more: split at `ceil(n/2)`, moved up by one when `n` is even and that is odd, so
///   an even field never splits into two odd halves. A lone player in the second group
///   gets a bye straight into `player1` of the current node and only the first group is
///   recursed into; otherwise both slots stay empty and both groups are recursed into.
pub fn generate_matches<F>(
    tournament_id: TournamentId,
    players: &[Player],
    next_round_id: Option<MatchId>,
    next_id: &mut F,
) -> Vec<GameMatch>
where
    F: FnMut() -> MatchId,
{
    let mut matches = Vec::with_capacity(players.len().saturating_sub(1));
    push_subtree(tournament_id, players, next_round_id, next_id, &mut matches);
    matches
}

fn push_subtree<F>(
    tournament_id: TournamentId,
    players: &[Player],
    next_round_id: Option<MatchId>,
    next_id: &mut F,
    out: &mut Vec<GameMatch>,
) where
    F: FnMut() -> MatchId,
{
    if players.len() < 2 {
        return;
    }

    let id = next_id();

    if let [p1, p2] = players {
        out.push(GameMatch::new(
            id,
            tournament_id,
            Some(p1.id),
            Some(p2.id),
            next_round_id,
        ));
        return;
    }

    let n = players.len();
    let mut middle = n.div_ceil(2);
    if n % 2 == 0 && middle % 2 != 0 {
        middle += 1;
    }
    let (group_1, group_2) = players.split_at(middle);

    if let [bye] = group_2 {
        out.push(GameMatch::new(
            id.clone(),
            tournament_id,
            Some(bye.id),
            None,
            next_round_id,
        ));
        push_subtree(tournament_id, group_1, Some(id), next_id, out);
    } else {
        out.push(GameMatch::new(
            id.clone(),
            tournament_id,
            None,
            None,
            next_round_id,
        ));
        push_subtree(tournament_id, group_1, Some(id.clone()), next_id, out);
        push_subtree(tournament_id, group_2, Some(id), next_id, out);
    }
}
