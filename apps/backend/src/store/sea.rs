//! Database-backed store. Each mutation commits, re-reads its table and
//! publishes the full set to that table's live query.

use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::{LiveQuery, ModelStore, Record, Snapshot, Subscription};
use crate::db::with_txn;
use crate::errors::domain::DomainError;
use crate::repos::player_stats::{self as stats_repo, NewPlayerStat, PlayerStat};
use crate::repos::scores::{self as scores_repo, NewScore, Score};

/// Live query plus the lock that orders its table's mutations.
struct Table<R> {
    live: LiveQuery<R>,
    write: Mutex<()>,
}

impl<R: Record> Table<R> {
    fn new(initial: Vec<R>) -> Self {
        Self {
            live: LiveQuery::new(initial),
            write: Mutex::new(()),
        }
    }
}

pub struct SeaStore {
    db: DatabaseConnection,
    scores: Table<Score>,
    player_stats: Table<PlayerStat>,
}

impl SeaStore {
    /// Load both tables and start serving live queries.
    pub async fn open(db: DatabaseConnection) -> Result<Self, DomainError> {
        let scores = scores_repo::list_all(&db).await?;
        let player_stats = stats_repo::list_all(&db).await?;
        info!(
            scores = scores.len(),
            player_stats = player_stats.len(),
            "store opened"
        );

        Ok(Self {
            db,
            scores: Table::new(scores),
            player_stats: Table::new(player_stats),
        })
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn scores(&self) -> Snapshot<Score> {
        self.scores.live.current()
    }

    pub fn player_stats(&self) -> Snapshot<PlayerStat> {
        self.player_stats.live.current()
    }

    /// Re-read and publish after a committed write. A failed re-read is only
    /// logged: the write stands and the next mutation republishes the table.
    async fn publish_scores(&self) {
        match scores_repo::list_all(&self.db).await {
            Ok(rows) => {
                let version = self.scores.live.publish(rows);
                debug!(version, "scores published");
            }
            Err(err) => warn!(error = %err, "scores committed but not republished"),
        }
    }

    async fn publish_player_stats(&self) {
        match stats_repo::list_all(&self.db).await {
            Ok(rows) => {
                let version = self.player_stats.live.publish(rows);
                debug!(version, "player_stats published");
            }
            Err(err) => warn!(error = %err, "player_stats committed but not republished"),
        }
    }
}

#[async_trait]
impl ModelStore<Score> for SeaStore {
    async fn create(&self, draft: NewScore) -> Result<Score, DomainError> {
        let _write = self.scores.write.lock().await;
        let requested = draft.round_number;
        let created =
            with_txn(&self.db, |txn| Box::pin(scores_repo::create(txn, draft))).await?;
        if requested.is_some_and(|n| n != created.round_number) {
            info!(
                requested = ?requested,
                assigned = created.round_number,
                "round number reassigned"
            );
        }
        debug!(id = created.id, round_number = created.round_number, "score created");
        self.publish_scores().await;
        Ok(created)
    }

    async fn update(&self, record: Score) -> Result<Score, DomainError> {
        let _write = self.scores.write.lock().await;
        let updated = with_txn(&self.db, |txn| {
            Box::pin(async move { scores_repo::update(txn, &record).await })
        })
        .await?;
        debug!(id = updated.id, "score updated");
        self.publish_scores().await;
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<(), DomainError> {
        let _write = self.scores.write.lock().await;
        with_txn(&self.db, |txn| Box::pin(scores_repo::delete(txn, id))).await?;
        debug!(id, "score deleted");
        self.publish_scores().await;
        Ok(())
    }

    fn observe_query(&self) -> Subscription<Score> {
        self.scores.live.subscribe()
    }
}

#[async_trait]
impl ModelStore<PlayerStat> for SeaStore {
    async fn create(&self, draft: NewPlayerStat) -> Result<PlayerStat, DomainError> {
        let _write = self.player_stats.write.lock().await;
        let created = with_txn(&self.db, |txn| Box::pin(stats_repo::create(txn, draft))).await?;
        debug!(id = created.id, player = %created.player_name, "player stat created");
        self.publish_player_stats().await;
        Ok(created)
    }

    async fn update(&self, record: PlayerStat) -> Result<PlayerStat, DomainError> {
        let _write = self.player_stats.write.lock().await;
        let updated = with_txn(&self.db, |txn| {
            Box::pin(async move { stats_repo::update(txn, &record).await })
        })
        .await?;
        debug!(id = updated.id, "player stat updated");
        self.publish_player_stats().await;
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<(), DomainError> {
        let _write = self.player_stats.write.lock().await;
        with_txn(&self.db, |txn| Box::pin(stats_repo::delete(txn, id))).await?;
        debug!(id, "player stat deleted");
        self.publish_player_stats().await;
        Ok(())
    }

    fn observe_query(&self) -> Subscription<PlayerStat> {
        self.player_stats.live.subscribe()
    }
}
