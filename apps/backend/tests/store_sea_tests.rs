mod common;

use std::time::Duration;

use scoreboard_backend::errors::domain::{DomainError, NotFoundKind};
use scoreboard_backend::{ModelStore, NewPlayerStat, NewScore, PlayerStat, Score};

use crate::common::memory_store;

#[tokio::test]
async fn create_assigns_next_round_when_absent_or_taken() {
    let store = memory_store().await;

    let first = ModelStore::<Score>::create(store.as_ref(), NewScore::default()).await.unwrap();
    assert_eq!(first.round_number, 1);

    let second = ModelStore::<Score>::create(store.as_ref(), NewScore::round(5)).await.unwrap();
    assert_eq!(second.round_number, 5);

    // 5 is taken: the store picks max + 1.
    let third = ModelStore::<Score>::create(store.as_ref(), NewScore::round(5)).await.unwrap();
    assert_eq!(third.round_number, 6);

    let rounds: Vec<i32> = store.scores().items().iter().map(|s| s.round_number).collect();
    assert_eq!(rounds, vec![1, 5, 6]);
}

#[tokio::test]
async fn created_fields_default_to_zero() {
    let store = memory_store().await;
    let score = ModelStore::<Score>::create(store.as_ref(), NewScore::round(1)).await.unwrap();
    assert_eq!((score.tsim, score.jason, score.wai, score.mum_soup), (0, 0, 0, 0));

    let stat = ModelStore::<PlayerStat>::create(store.as_ref(), NewPlayerStat::named("Wai"))
        .await
        .unwrap();
    assert_eq!(stat.player_name, "Wai");
    assert_eq!(
        (stat.win_by_others, stat.self_drawn, stat.paid_out, stat.special_bonus),
        (0, 0, 0, 0)
    );
}

#[tokio::test]
async fn update_overwrites_whole_row() {
    let store = memory_store().await;
    let created = ModelStore::<Score>::create(store.as_ref(), NewScore::round(1)).await.unwrap();

    let edited = Score {
        tsim: 8,
        jason: -3,
        ..created.clone()
    };
    let updated = ModelStore::<Score>::update(store.as_ref(), edited).await.unwrap();
    assert_eq!((updated.tsim, updated.jason), (8, -3));
    assert_eq!(updated.round_number, 1);
    assert!(updated.updated_at >= created.updated_at);
    assert_eq!(store.scores().items()[0].tsim, 8);
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let store = memory_store().await;
    let ghost = ModelStore::<Score>::create(store.as_ref(), NewScore::round(1)).await.unwrap();
    ModelStore::<Score>::delete(store.as_ref(), ghost.id).await.unwrap();

    let err = ModelStore::<Score>::update(store.as_ref(), ghost.clone()).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound(NotFoundKind::Score, _)));

    let err = ModelStore::<Score>::delete(store.as_ref(), ghost.id).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound(NotFoundKind::Score, _)));

    let err = ModelStore::<PlayerStat>::delete(store.as_ref(), 404).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound(NotFoundKind::PlayerStat, _)));
}

#[tokio::test]
async fn observe_query_starts_with_current_set_then_follows_mutations() {
    let store = memory_store().await;
    ModelStore::<Score>::create(store.as_ref(), NewScore::round(1)).await.unwrap();

    let mut sub = ModelStore::<Score>::observe_query(store.as_ref());
    let initial = sub.next().await.unwrap();
    assert_eq!(initial.items().len(), 1);

    ModelStore::<Score>::create(store.as_ref(), NewScore::round(2)).await.unwrap();
    let next = tokio::time::timeout(Duration::from_secs(2), sub.next())
        .await
        .expect("push after create")
        .unwrap();
    assert_eq!(next.items().len(), 2);
    assert!(next.version > initial.version);
}

#[tokio::test]
async fn tables_publish_independently() {
    let store = memory_store().await;
    let mut scores = ModelStore::<Score>::observe_query(store.as_ref());
    scores.next().await.unwrap();

    ModelStore::<PlayerStat>::create(store.as_ref(), NewPlayerStat::named("Tsim"))
        .await
        .unwrap();

    let quiet = tokio::time::timeout(Duration::from_millis(100), scores.next()).await;
    assert!(quiet.is_err(), "a player stat write must not push on the scores query");
}

#[tokio::test]
async fn reopening_loads_existing_rows() {
    let store = memory_store().await;
    ModelStore::<Score>::create(store.as_ref(), NewScore::round(3)).await.unwrap();

    let reopened = scoreboard_backend::SeaStore::open(store.db().clone()).await.unwrap();
    assert_eq!(reopened.scores().items()[0].round_number, 3);
}

#[tokio::test]
async fn committed_write_succeeds_even_when_republish_fails() {
    use sea_orm::ConnectionTrait;

    let store = memory_store().await;
    let before = store.scores().version;

    // A row whose timestamps cannot be decoded makes every re-read fail.
    store
        .db()
        .execute_unprepared(
            "INSERT INTO scores (round_number, created_at, updated_at) \
             VALUES (99, 'not-a-time', 'not-a-time')",
        )
        .await
        .unwrap();

    let created = ModelStore::<Score>::create(store.as_ref(), NewScore::round(1))
        .await
        .expect("a committed create reports success");
    assert_eq!(created.round_number, 1);
    assert_eq!(store.scores().version, before, "nothing new was published");

    store
        .db()
        .execute_unprepared("DELETE FROM scores WHERE round_number = 99")
        .await
        .unwrap();

    // The next write republishes the whole table, including round 1.
    ModelStore::<Score>::create(store.as_ref(), NewScore::round(2)).await.unwrap();
    let rounds: Vec<i32> = store.scores().items().iter().map(|s| s.round_number).collect();
    assert_eq!(rounds, vec![1, 2]);
}
