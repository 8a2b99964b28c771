//! Match node of the elimination tree and its player slots.

use crate::models::player::PlayerId;
use crate::models::tournament::TournamentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque match identifier, minted by the caller before any row exists.
pub type MatchId = String;

/// One of the two player positions of a match.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Player1,
    Player2,
}

/// A node in the bracket. The root (final) is the only match without `next_round_id`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub id: MatchId,
    pub tournament_id: TournamentId,
    /// None until assigned at construction or filled by a child match's winner.
    pub player1: Option<PlayerId>,
    pub player2: Option<PlayerId>,
    /// Both None until a result is recorded; never changed afterwards.
    pub player1_score: Option<u32>,
    pub player2_score: Option<u32>,
    /// Parent match receiving this match's winner.
    pub next_round_id: Option<MatchId>,
    pub played_at: Option<DateTime<Utc>>,
}

impl GameMatch {
    /// Create an unscored match with the given slots.
    pub fn new(
        id: MatchId,
        tournament_id: TournamentId,
        player1: Option<PlayerId>,
        player2: Option<PlayerId>,
        next_round_id: Option<MatchId>,
    ) -> Self {
        Self {
            id,
            tournament_id,
            player1,
            player2,
            player1_score: None,
            player2_score: None,
            next_round_id,
            played_at: None,
        }
    }

    /// First empty slot, player1 before player2.
    pub fn first_open_slot(&self) -> Option<Slot> {
        if self.player1.is_none() {
            Some(Slot::Player1)
        } else if self.player2.is_none() {
            Some(Slot::Player2)
        } else {
            None
        }
    }

    pub fn has_both_players(&self) -> bool {
        self.player1.is_some() && self.player2.is_some()
    }

    pub fn is_scored(&self) -> bool {
        self.player1_score.is_some() && self.player2_score.is_some()
    }

    pub fn is_final(&self) -> bool {
        self.next_round_id.is_none()
    }

    /// Winner of a scored match (None while unplayed).
    pub fn winner(&self) -> Option<PlayerId> {
        match (self.player1_score, self.player2_score) {
            (Some(s1), Some(s2)) if s1 > s2 => self.player1,
            (Some(_), Some(_)) => self.player2,
            _ => None,
        }
    }
}
