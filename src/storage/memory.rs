//! In-process storage backend.

use std::collections::{HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::Storage;
use crate::models::{
    GameMatch, MatchId, Player, PlayerId, Slot, StorageError, StorageResult, Tournament,
    TournamentId,
};

#[derive(Default)]
struct Tables {
    /// Kept in creation order.
    tournaments: Vec<Tournament>,
    players: HashMap<PlayerId, Player>,
    matches: HashMap<MatchId, GameMatch>,
    /// Match ids per tournament, in insertion order.
    bracket_order: HashMap<TournamentId, Vec<MatchId>>,
}

/// Tables behind a single `RwLock`. Every mutation takes the write lock for its whole
/// check-and-set, so conditional updates are atomic per row.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StorageResult<RwLockReadGuard<'_, Tables>> {
        self.tables.read().map_err(|_| StorageError::Poisoned)
    }

    fn write(&self) -> StorageResult<RwLockWriteGuard<'_, Tables>> {
        self.tables.write().map_err(|_| StorageError::Poisoned)
    }
}

#[async_trait]
impl Storage for MemoryStore {
    async fn insert_tournament(&self, tournament: &Tournament) -> StorageResult<()> {
        self.write()?.tournaments.push(tournament.clone());
        Ok(())
    }

    async fn create_players(&self, names: &[String]) -> StorageResult<Vec<Player>> {
        let players: Vec<Player> = names.iter().map(Player::new).collect();
        let mut g = self.write()?;
        for p in &players {
            g.players.insert(p.id, p.clone());
        }
        Ok(players)
    }

    async fn insert_matches(&self, matches: &[GameMatch]) -> StorageResult<()> {
        let mut g = self.write()?;
        let mut seen = HashSet::with_capacity(matches.len());
        for m in matches {
            if g.matches.contains_key(&m.id) || !seen.insert(m.id.as_str()) {
                return Err(StorageError::DuplicateMatch(m.id.clone()));
            }
        }
        for m in matches {
            g.bracket_order
                .entry(m.tournament_id)
                .or_default()
                .push(m.id.clone());
            g.matches.insert(m.id.clone(), m.clone());
        }
        Ok(())
    }

    async fn get_match(&self, match_id: &str) -> StorageResult<Option<GameMatch>> {
        Ok(self.read()?.matches.get(match_id).cloned())
    }

    async fn get_matches_by_tournament(
        &self,
        tournament_id: TournamentId,
    ) -> StorageResult<Vec<GameMatch>> {
        let g = self.read()?;
        let ids = match g.bracket_order.get(&tournament_id) {
            Some(ids) => ids,
            None => return Ok(Vec::new()),
        };
        Ok(ids.iter().filter_map(|id| g.matches.get(id)).cloned().collect())
    }

    async fn update_match_score(
        &self,
        match_id: &str,
        player1_score: u32,
        player2_score: u32,
        played_at: DateTime<Utc>,
    ) -> StorageResult<bool> {
        let mut g = self.write()?;
        let m = match g.matches.get_mut(match_id) {
            Some(m) if m.player1_score.is_none() && m.player2_score.is_none() => m,
            _ => return Ok(false),
        };
        m.player1_score = Some(player1_score);
        m.player2_score = Some(player2_score);
        m.played_at = Some(played_at);
        Ok(true)
    }

    async fn update_match_slot(
        &self,
        match_id: &str,
        slot: Slot,
        player_id: PlayerId,
    ) -> StorageResult<bool> {
        let mut g = self.write()?;
        let Some(m) = g.matches.get_mut(match_id) else {
            return Ok(false);
        };
        let target = match slot {
            Slot::Player1 => &mut m.player1,
            Slot::Player2 => &mut m.player2,
        };
        if target.is_some() {
            return Ok(false);
        }
        *target = Some(player_id);
        Ok(true)
    }

    async fn mark_tournament_finished(&self, tournament_id: TournamentId) -> StorageResult<bool> {
        let mut g = self.write()?;
        match g.tournaments.iter_mut().find(|t| t.id == tournament_id) {
            Some(t) => {
                t.finished = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn get_tournament(
        &self,
        tournament_id: TournamentId,
    ) -> StorageResult<Option<Tournament>> {
        Ok(self
            .read()?
            .tournaments
            .iter()
            .find(|t| t.id == tournament_id)
            .cloned())
    }

    async fn list_tournaments(&self) -> StorageResult<Vec<Tournament>> {
        Ok(self.read()?.tournaments.clone())
    }

    async fn get_players(&self, ids: &[PlayerId]) -> StorageResult<Vec<Player>> {
        let g = self.read()?;
        Ok(ids.iter().filter_map(|id| g.players.get(id)).cloned().collect())
    }
}
