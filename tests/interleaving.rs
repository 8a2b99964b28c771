//! Integration tests that drive the state machine through a scripted storage wrapper:
//! interleaved writers, stuck slot writes and failing bracket inserts.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tournament_brackets::{
    create_tournament, generate_matches, get_match, list_tournaments, propagate_winner,
    record_score, GameMatch, MatchId, MemoryStore, Player, PlayerId, ScoreOutcome, Slot, Storage,
    StorageError, StorageResult, Tournament, TournamentError, TournamentId,
};
use uuid::Uuid;

/// `MemoryStore` with knobs for forcing races and faults, and counters for lost writes.
#[derive(Default)]
struct ScriptedStore {
    inner: MemoryStore,
    /// Suspend after every match read so concurrent callers all read before anyone writes.
    yield_after_reads: bool,
    /// Every slot write reports that the slot was already taken.
    reject_slot_writes: bool,
    fail_match_inserts: bool,
    lost_score_writes: AtomicUsize,
    lost_slot_writes: AtomicUsize,
}

#[async_trait]
impl Storage for ScriptedStore {
    async fn insert_tournament(&self, tournament: &Tournament) -> StorageResult<()> {
        self.inner.insert_tournament(tournament).await
    }

    async fn create_players(&self, names: &[String]) -> StorageResult<Vec<Player>> {
        self.inner.create_players(names).await
    }

    async fn insert_matches(&self, matches: &[GameMatch]) -> StorageResult<()> {
        if self.fail_match_inserts {
            return Err(StorageError::Backend("disk full".to_string()));
        }
        self.inner.insert_matches(matches).await
    }

    async fn get_match(&self, match_id: &str) -> StorageResult<Option<GameMatch>> {
        let game = self.inner.get_match(match_id).await?;
        if self.yield_after_reads {
            tokio::task::yield_now().await;
        }
        Ok(game)
    }

    async fn get_matches_by_tournament(
        &self,
        tournament_id: TournamentId,
    ) -> StorageResult<Vec<GameMatch>> {
        self.inner.get_matches_by_tournament(tournament_id).await
    }

    async fn update_match_score(
        &self,
        match_id: &str,
        player1_score: u32,
        player2_score: u32,
        played_at: DateTime<Utc>,
    ) -> StorageResult<bool> {
        let written = self
            .inner
            .update_match_score(match_id, player1_score, player2_score, played_at)
            .await?;
        if !written {
            self.lost_score_writes.fetch_add(1, Ordering::SeqCst);
        }
        Ok(written)
    }

    async fn update_match_slot(
        &self,
        match_id: &str,
        slot: Slot,
        player_id: PlayerId,
    ) -> StorageResult<bool> {
        let written = !self.reject_slot_writes
            && self.inner.update_match_slot(match_id, slot, player_id).await?;
        if !written {
            self.lost_slot_writes.fetch_add(1, Ordering::SeqCst);
        }
        Ok(written)
    }

    async fn mark_tournament_finished(&self, tournament_id: TournamentId) -> StorageResult<bool> {
        self.inner.mark_tournament_finished(tournament_id).await
    }

    async fn get_tournament(
        &self,
        tournament_id: TournamentId,
    ) -> StorageResult<Option<Tournament>> {
        self.inner.get_tournament(tournament_id).await
    }

    async fn list_tournaments(&self) -> StorageResult<Vec<Tournament>> {
        self.inner.list_tournaments().await
    }

    async fn get_players(&self, ids: &[PlayerId]) -> StorageResult<Vec<Player>> {
        self.inner.get_players(ids).await
    }
}

fn sequential_ids() -> impl FnMut() -> MatchId {
    let mut next = 0;
    move || {
        next += 1;
        next.to_string()
    }
}

fn names(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

/// Four-player bracket: final "1", semi-finals "2" (A v B) and "3" (C v D).
async fn seeded_four(store: &ScriptedStore) -> Vec<Player> {
    let players = store
        .create_players(&names(&["A", "B", "C", "D"]))
        .await
        .unwrap();
    let tid = store.create_tournament("Test").await.unwrap();
    let matches = generate_matches(tid, &players, None, &mut sequential_ids());
    store.insert_matches(&matches).await.unwrap();
    players
}

fn advanced(outcome: &ScoreOutcome) -> (PlayerId, Slot) {
    match outcome {
        ScoreOutcome::Advanced { winner, slot, .. } => (*winner, *slot),
        other => panic!("expected advance, got {other:?}"),
    }
}

#[tokio::test]
async fn simultaneous_sibling_winners_split_the_final_slots() {
    let store = ScriptedStore {
        yield_after_reads: true,
        ..Default::default()
    };
    let p = seeded_four(&store).await;

    let (left, right) = tokio::join!(
        record_score(&store, "2", 3, 1),
        record_score(&store, "3", 3, 1),
    );
    let (left, right) = (advanced(&left.unwrap()), advanced(&right.unwrap()));

    // Both read the final while it was empty; one lost the player1 write and re-read.
    assert_eq!(store.lost_slot_writes.load(Ordering::SeqCst), 1);
    let (first, second) = if left.1 == Slot::Player1 {
        (left, right)
    } else {
        (right, left)
    };
    assert_eq!(first.1, Slot::Player1);
    assert_eq!(second.1, Slot::Player2);

    let final_match = get_match(&store, "1").await.unwrap();
    assert_eq!(final_match.player1, Some(first.0));
    assert_eq!(final_match.player2, Some(second.0));
    let mut finalists = [first.0, second.0];
    finalists.sort();
    let mut expected = [p[0].id, p[2].id];
    expected.sort();
    assert_eq!(finalists, expected);
}

#[tokio::test]
async fn simultaneous_scores_for_one_match_accept_exactly_one() {
    let store = ScriptedStore {
        yield_after_reads: true,
        ..Default::default()
    };
    let p = seeded_four(&store).await;

    let (first, second) = tokio::join!(
        record_score(&store, "2", 2, 0),
        record_score(&store, "2", 0, 2),
    );

    // Both passed the unscored check; the conditional write let only one through.
    assert_eq!(store.lost_score_writes.load(Ordering::SeqCst), 1);
    let (accepted, rejected) = match (first, second) {
        (Ok(outcome), Err(err)) => ((outcome, (2, 0)), err),
        (Err(err), Ok(outcome)) => ((outcome, (0, 2)), err),
        other => panic!("expected one success and one failure, got {other:?}"),
    };
    assert!(matches!(rejected, TournamentError::AlreadyScored));

    let (outcome, (s1, s2)) = accepted;
    let game = get_match(&store, "2").await.unwrap();
    assert_eq!((game.player1_score, game.player2_score), (Some(s1), Some(s2)));

    let expected_winner = if s1 > s2 { p[0].id } else { p[1].id };
    assert_eq!(outcome.winner(), expected_winner);
    let final_match = get_match(&store, "1").await.unwrap();
    assert_eq!(final_match.player1, Some(expected_winner));
    assert_eq!(final_match.player2, None);
}

#[tokio::test]
async fn propagation_stops_after_one_attempt_per_slot() {
    let store = ScriptedStore {
        reject_slot_writes: true,
        ..Default::default()
    };
    let tid = store.create_tournament("Test").await.unwrap();
    store
        .insert_matches(&[GameMatch::new("open".into(), tid, None, None, None)])
        .await
        .unwrap();

    let err = propagate_winner(&store, "open", Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, TournamentError::BothSlotsFilled));
    assert_eq!(store.lost_slot_writes.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn failed_bracket_insert_leaves_no_tournament() {
    let store = ScriptedStore {
        fail_match_inserts: true,
        ..Default::default()
    };

    let err = create_tournament(&store, "Cup", &names(&["A", "B", "C"]))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        TournamentError::Storage(StorageError::Backend(_))
    ));
    assert!(list_tournaments(&store).await.unwrap().is_empty());
}
