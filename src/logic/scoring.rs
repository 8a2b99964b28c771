//! Match results: score validation, winner propagation and tournament completion.

use crate::models::{MatchId, PlayerId, Slot, TournamentError, TournamentId, TournamentResult};
use crate::storage::Storage;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// One write per slot of a match.
const SLOT_WRITE_ATTEMPTS: usize = 2;

/// What a successfully recorded score led to.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScoreOutcome {
    /// The winner moved into the parent match.
    Advanced {
        winner: PlayerId,
        next_round_id: MatchId,
        slot: Slot,
    },
    /// The final was played; the tournament is over.
    TournamentFinished {
        winner: PlayerId,
        tournament_id: TournamentId,
    },
}

impl ScoreOutcome {
    pub fn winner(&self) -> PlayerId {
        match self {
            ScoreOutcome::Advanced { winner, .. }
            | ScoreOutcome::TournamentFinished { winner, .. } => *winner,
        }
    }
}

/// Record the result of a match and move the bracket forward.
///
/// Every check runs before anything is written:
/// 1. Draws are rejected (`InvalidResult`).
/// 2. The match must exist and have both players.
/// 3. It must not have a score yet.
/// 4. The parent match must exist with an open slot, or for the final, the tournament
///    must exist.
///
/// The score is written with a conditional update, so of two concurrent submissions for
/// the same match exactly one succeeds and the other gets `AlreadyScored`. The winner then
/// goes to the parent match, or the tournament is finished if this was the final.
pub async fn record_score(
    store: &dyn Storage,
    match_id: &str,
    player1_score: u32,
    player2_score: u32,
) -> TournamentResult<ScoreOutcome> {
    if player1_score == player2_score {
        return Err(TournamentError::InvalidResult);
    }

    let game = store
        .get_match(match_id)
        .await?
        .ok_or_else(|| TournamentError::MatchNotFound(match_id.to_string()))?;

    let (Some(player1), Some(player2)) = (game.player1, game.player2) else {
        return Err(TournamentError::IncompletePlayers);
    };
    if game.is_scored() {
        return Err(TournamentError::AlreadyScored);
    }

    match &game.next_round_id {
        Some(next_round_id) => {
            let parent = store
                .get_match(next_round_id)
                .await?
                .ok_or_else(|| TournamentError::MatchNotFound(next_round_id.clone()))?;
            if parent.first_open_slot().is_none() {
                log::warn!(
                    "Refusing score for match {}: next round match {} is already full",
                    match_id,
                    next_round_id
                );
                return Err(TournamentError::BothSlotsFilled);
            }
        }
        None => {
            if store.get_tournament(game.tournament_id).await?.is_none() {
                return Err(TournamentError::TournamentNotFound(game.tournament_id));
            }
        }
    }

    if !store
        .update_match_score(match_id, player1_score, player2_score, Utc::now())
        .await?
    {
        log::warn!("Score for match {} was set by a concurrent submission", match_id);
        return Err(TournamentError::AlreadyScored);
    }

    let winner = if player1_score > player2_score {
        player1
    } else {
        player2
    };

    match game.next_round_id {
        Some(next_round_id) => {
            let slot = propagate_winner(store, &next_round_id, winner).await?;
            log::debug!(
                "Match {} won by {}, advanced to {:?} of {}",
                match_id,
                winner,
                slot,
                next_round_id
            );
            Ok(ScoreOutcome::Advanced {
                winner,
                next_round_id,
                slot,
            })
        }
        None => {
            finish_tournament(store, game.tournament_id).await?;
            Ok(ScoreOutcome::TournamentFinished {
                winner,
                tournament_id: game.tournament_id,
            })
        }
    }
}

/// Put `winner_id` into the first empty slot of the target match, player1 before player2.
///
/// Slot writes only succeed on an empty slot. If a sibling's winner takes player1 between
/// our read and our write, the match is read again and player2 is taken instead, so the
/// first winner to arrive always ends up as player1. A match has two slots, so after two
/// lost writes the target is treated as full.
pub async fn propagate_winner(
    store: &dyn Storage,
    target_match_id: &str,
    winner_id: PlayerId,
) -> TournamentResult<Slot> {
    for _ in 0..SLOT_WRITE_ATTEMPTS {
        let target = store
            .get_match(target_match_id)
            .await?
            .ok_or_else(|| TournamentError::MatchNotFound(target_match_id.to_string()))?;

        let Some(slot) = target.first_open_slot() else {
            break;
        };

        if store
            .update_match_slot(target_match_id, slot, winner_id)
            .await?
        {
            return Ok(slot);
        }
        log::debug!(
            "{:?} of match {} was filled concurrently, re-reading",
            slot,
            target_match_id
        );
    }

    log::warn!(
        "Cannot advance {} into match {}: both slots are taken",
        winner_id,
        target_match_id
    );
    Err(TournamentError::BothSlotsFilled)
}

/// Mark a tournament as finished. Repeating the call on a finished tournament succeeds.
pub async fn finish_tournament(
    store: &dyn Storage,
    tournament_id: TournamentId,
) -> TournamentResult<()> {
    if !store.mark_tournament_finished(tournament_id).await? {
        return Err(TournamentError::TournamentNotFound(tournament_id));
    }
    log::info!("Tournament {} finished", tournament_id);
    Ok(())
}
