mod common;

use std::time::Duration;

use async_trait::async_trait;
use scoreboard_backend::errors::domain::{ConflictKind, DomainError};
use scoreboard_backend::sync::{ScoreField, StatField, Totals, PLAYER_NAMES};
use scoreboard_backend::{Confirm, LiveSync, ModelStore, NewScore, SeaStore, Score, SyncEvent};

use crate::common::memory_store;

struct Answer {
    yes: bool,
    asked: Vec<String>,
}

impl Answer {
    fn new(yes: bool) -> Self {
        Self { yes, asked: Vec::new() }
    }
}

#[async_trait]
impl Confirm for Answer {
    async fn confirm(&mut self, prompt: &str) -> bool {
        self.asked.push(prompt.to_string());
        self.yes
    }
}

async fn next_event(sync: &mut LiveSync<SeaStore>) -> SyncEvent {
    tokio::time::timeout(Duration::from_secs(2), sync.next_event())
        .await
        .expect("event within timeout")
}

/// Drain pushes until `event` arrives.
async fn wait_for(sync: &mut LiveSync<SeaStore>, event: SyncEvent) {
    loop {
        if next_event(sync).await == event {
            return;
        }
    }
}

async fn mounted() -> LiveSync<SeaStore> {
    let mut sync = LiveSync::new(memory_store().await);
    sync.mount();
    // Initial pushes for both tables, in whichever order they arrive.
    let (mut scores, mut stats) = (false, false);
    while !(scores && stats) {
        match next_event(&mut sync).await {
            SyncEvent::Scores => scores = true,
            SyncEvent::PlayerStats => stats = true,
            SyncEvent::Closed => panic!("closed while priming"),
        }
    }
    sync
}

#[tokio::test]
async fn create_edit_commit_updates_totals() {
    let mut sync = mounted().await;
    assert_eq!(sync.next_round_number(), 1);

    let created = sync.create_round().await.unwrap();
    assert_eq!(created.round_number, 1);
    wait_for(&mut sync, SyncEvent::Scores).await;
    assert_eq!(sync.scores().len(), 1);

    sync.begin_score_edit(created.id).unwrap();
    assert!(sync.change_score_field(ScoreField::Tsim, "8"));
    // Buffer only until commit.
    assert_eq!(sync.totals(), Totals::default());

    let committed = sync.commit_score_edit().await.unwrap().unwrap();
    assert_eq!(committed.tsim, 8);
    wait_for(&mut sync, SyncEvent::Scores).await;

    assert_eq!(
        sync.totals(),
        Totals {
            tsim: 8,
            jason: 0,
            wai: 0,
            mum_soup: 0
        }
    );
    assert!(sync.score_edit().editing_id().is_none());
}

#[tokio::test]
async fn rounds_are_held_in_round_order() {
    let store = memory_store().await;
    for n in [3, 1, 2] {
        ModelStore::<Score>::create(store.as_ref(), NewScore::round(n)).await.unwrap();
    }

    let mut sync = LiveSync::new(store);
    sync.mount();
    wait_for(&mut sync, SyncEvent::Scores).await;

    let rounds: Vec<i32> = sync.scores().iter().map(|s| s.round_number).collect();
    assert_eq!(rounds, vec![1, 2, 3]);
    assert_eq!(sync.next_round_number(), 4);
    assert_eq!(sync.score_by_round(2).map(|s| s.round_number), Some(2));
}

#[tokio::test]
async fn cancel_edit_shows_stored_row() {
    let mut sync = mounted().await;
    let created = sync.create_round().await.unwrap();
    wait_for(&mut sync, SyncEvent::Scores).await;

    sync.begin_score_edit(created.id).unwrap();
    sync.change_score_field(ScoreField::Wai, "42");
    let stored = sync.scores()[0].clone();
    assert_eq!(sync.displayed_score(&stored).wai, 42);

    sync.cancel_score_edit();
    assert_eq!(sync.displayed_score(&stored), &stored);
    assert!(sync.commit_score_edit().await.unwrap().is_none());
}

#[tokio::test]
async fn second_row_edit_is_rejected() {
    let mut sync = mounted().await;
    let a = sync.create_round().await.unwrap();
    wait_for(&mut sync, SyncEvent::Scores).await;
    let b = sync.create_round().await.unwrap();
    wait_for(&mut sync, SyncEvent::Scores).await;
    assert_eq!(b.round_number, 2);

    sync.begin_score_edit(a.id).unwrap();
    let err = sync.begin_score_edit(b.id).unwrap_err();
    assert!(matches!(err, DomainError::Conflict(ConflictKind::EditInProgress, _)));
    assert_eq!(sync.score_edit().editing_id(), Some(a.id));
}

#[tokio::test]
async fn delete_round_requires_confirmation() {
    let mut sync = mounted().await;
    let created = sync.create_round().await.unwrap();
    wait_for(&mut sync, SyncEvent::Scores).await;

    let mut no = Answer::new(false);
    assert!(!sync.delete_round(created.id, &mut no).await.unwrap());
    assert_eq!(no.asked, vec!["Are you sure you want to delete this round?".to_string()]);
    assert_eq!(sync.scores().len(), 1);

    let mut yes = Answer::new(true);
    assert!(sync.delete_round(created.id, &mut yes).await.unwrap());
    wait_for(&mut sync, SyncEvent::Scores).await;
    assert!(sync.scores().is_empty());
}

#[tokio::test]
async fn deleting_the_edited_row_discards_the_buffer() {
    let mut sync = mounted().await;
    let created = sync.create_round().await.unwrap();
    wait_for(&mut sync, SyncEvent::Scores).await;
    sync.begin_score_edit(created.id).unwrap();

    sync.delete_round(created.id, &mut Answer::new(true)).await.unwrap();
    wait_for(&mut sync, SyncEvent::Scores).await;
    assert!(sync.score_edit().editing_id().is_none());
}

#[tokio::test]
async fn initialize_stats_seeds_four_players_once() {
    let mut sync = mounted().await;
    let created = sync.initialize_stats().await.unwrap();
    let mut names: Vec<&str> = created.iter().map(|s| s.player_name.as_str()).collect();
    names.sort_unstable();
    let mut expected = PLAYER_NAMES.to_vec();
    expected.sort_unstable();
    assert_eq!(names, expected);

    while sync.player_stats().len() < 4 {
        wait_for(&mut sync, SyncEvent::PlayerStats).await;
    }
    let err = sync.initialize_stats().await.unwrap_err();
    assert!(matches!(err, DomainError::Conflict(ConflictKind::StatsInitialized, _)));
}

#[tokio::test]
async fn stat_edit_round_trip() {
    let mut sync = mounted().await;
    sync.initialize_stats().await.unwrap();
    while sync.player_stats().len() < 4 {
        wait_for(&mut sync, SyncEvent::PlayerStats).await;
    }

    let jason = sync.stat_by_player("jason").unwrap().id;
    sync.begin_stat_edit(jason).unwrap();
    sync.change_stat_field(StatField::SelfDrawn, "3");
    sync.change_stat_field(StatField::SpecialBonus, "-1x");
    let saved = sync.commit_stat_edit().await.unwrap().unwrap();
    assert_eq!((saved.self_drawn, saved.special_bonus), (3, -1));

    wait_for(&mut sync, SyncEvent::PlayerStats).await;
    assert_eq!(sync.stat_by_player("Jason").unwrap().self_drawn, 3);
}

#[tokio::test]
async fn unmounted_controller_ignores_later_changes() {
    let store = memory_store().await;
    let mut sync = LiveSync::new(store.clone());
    sync.mount();
    wait_for(&mut sync, SyncEvent::Scores).await;

    sync.unmount();
    assert!(!sync.is_mounted());
    ModelStore::<Score>::create(store.as_ref(), NewScore::round(1)).await.unwrap();

    assert_eq!(sync.next_event().await, SyncEvent::Closed);
    assert!(sync.scores().is_empty());
}

#[tokio::test]
async fn mount_is_idempotent() {
    let store = memory_store().await;
    let mut sync = LiveSync::new(store.clone());
    sync.mount();
    sync.mount();
    assert!(sync.is_mounted());
    wait_for(&mut sync, SyncEvent::Scores).await;
}
