use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind};
use crate::repos::player_stats::{NewPlayerStat, PlayerStat};
use crate::repos::scores::{NewScore, Score};
use crate::store::{ModelStore, Snapshot, Subscription};
use crate::sync::edit::{EditState, ScoreField, StatField};
use crate::sync::totals::{totals, Totals};

/// Players seeded by `initialize_stats`, in display order.
pub const PLAYER_NAMES: [&str; 4] = ["Tsim", "Jason", "Wai", "MumSoup"];

pub const DELETE_ROUND_PROMPT: &str = "Are you sure you want to delete this round?";

/// Interactive yes/no question asked before destructive actions.
#[async_trait]
pub trait Confirm: Send {
    async fn confirm(&mut self, prompt: &str) -> bool;
}

/// Which local list a push replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncEvent {
    Scores,
    PlayerStats,
    /// Not mounted, or a subscription ended.
    Closed,
}

enum Push {
    Scores(Snapshot<Score>),
    PlayerStats(Snapshot<PlayerStat>),
}

struct Subscriptions {
    scores: Subscription<Score>,
    player_stats: Subscription<PlayerStat>,
}

impl Subscriptions {
    fn cancel(&self) {
        self.scores.cancel();
        self.player_stats.cancel();
    }
}

/// Local mirror of both tables plus their edit buffers.
pub struct LiveSync<S> {
    store: Arc<S>,
    scores: Vec<Score>,
    player_stats: Vec<PlayerStat>,
    score_edit: EditState<Score>,
    stat_edit: EditState<PlayerStat>,
    subs: Option<Subscriptions>,
}

impl<S> LiveSync<S>
where
    S: ModelStore<Score> + ModelStore<PlayerStat>,
{
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            scores: Vec::new(),
            player_stats: Vec::new(),
            score_edit: EditState::Idle,
            stat_edit: EditState::Idle,
            subs: None,
        }
    }

    /// Open one live query per table. Calling it again while mounted does nothing.
    pub fn mount(&mut self) {
        if self.subs.is_some() {
            return;
        }
        self.subs = Some(Subscriptions {
            scores: ModelStore::<Score>::observe_query(self.store.as_ref()),
            player_stats: ModelStore::<PlayerStat>::observe_query(self.store.as_ref()),
        });
        info!("live sync mounted");
    }

    /// Cancel both subscriptions; later pushes are never applied.
    pub fn unmount(&mut self) {
        if let Some(subs) = self.subs.take() {
            subs.cancel();
            info!("live sync unmounted");
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.subs.is_some()
    }

    /// Wait for the next push on either subscription and apply it.
    pub async fn next_event(&mut self) -> SyncEvent {
        let Some(subs) = self.subs.as_mut() else {
            return SyncEvent::Closed;
        };

        let push = tokio::select! {
            snap = subs.scores.next() => snap.map(Push::Scores),
            snap = subs.player_stats.next() => snap.map(Push::PlayerStats),
        };

        match push {
            Some(Push::Scores(snap)) => {
                self.replace_scores(&snap);
                SyncEvent::Scores
            }
            Some(Push::PlayerStats(snap)) => {
                self.replace_player_stats(&snap);
                SyncEvent::PlayerStats
            }
            None => {
                warn!("live query ended; unmounting");
                self.unmount();
                SyncEvent::Closed
            }
        }
    }

    fn replace_scores(&mut self, snap: &Snapshot<Score>) {
        let mut scores = snap.items().to_vec();
        scores.sort_by_key(|s| s.round_number);
        self.scores = scores;

        if let Some(id) = self.score_edit.editing_id() {
            if !self.scores.iter().any(|s| s.id == id) {
                info!(id, "edited score removed from store; discarding edit");
                self.score_edit.cancel();
            }
        }
        debug!(version = snap.version, rows = self.scores.len(), "scores replaced");
    }

    fn replace_player_stats(&mut self, snap: &Snapshot<PlayerStat>) {
        self.player_stats = snap.items().to_vec();

        if let Some(id) = self.stat_edit.editing_id() {
            if !self.player_stats.iter().any(|s| s.id == id) {
                info!(id, "edited player stat removed from store; discarding edit");
                self.stat_edit.cancel();
            }
        }
        debug!(
            version = snap.version,
            rows = self.player_stats.len(),
            "player_stats replaced"
        );
    }

    // ----- reads -----

    /// Rounds ordered by round number.
    pub fn scores(&self) -> &[Score] {
        &self.scores
    }

    /// Player statistics in store order.
    pub fn player_stats(&self) -> &[PlayerStat] {
        &self.player_stats
    }

    pub fn score_edit(&self) -> &EditState<Score> {
        &self.score_edit
    }

    pub fn stat_edit(&self) -> &EditState<PlayerStat> {
        &self.stat_edit
    }

    pub fn displayed_score<'a>(&'a self, score: &'a Score) -> &'a Score {
        self.score_edit.display(score)
    }

    pub fn displayed_stat<'a>(&'a self, stat: &'a PlayerStat) -> &'a PlayerStat {
        self.stat_edit.display(stat)
    }

    pub fn score_by_round(&self, round_number: i32) -> Option<&Score> {
        self.scores.iter().find(|s| s.round_number == round_number)
    }

    pub fn stat_by_player(&self, player_name: &str) -> Option<&PlayerStat> {
        self.player_stats
            .iter()
            .find(|s| s.player_name.eq_ignore_ascii_case(player_name))
    }

    /// Column totals over stored rows (edit buffers excluded).
    pub fn totals(&self) -> Totals {
        totals(&self.scores)
    }

    pub fn next_round_number(&self) -> i32 {
        self.scores
            .iter()
            .map(|s| s.round_number)
            .max()
            .map_or(1, |max| max.saturating_add(1))
    }

    // ----- rounds -----

    /// Create a zeroed round numbered one past the highest local round.
    pub async fn create_round(&self) -> Result<Score, DomainError> {
        let round_number = self.next_round_number();
        let created =
            ModelStore::<Score>::create(self.store.as_ref(), NewScore::round(round_number)).await?;
        info!(
            id = created.id,
            round_number = created.round_number,
            "round created"
        );
        Ok(created)
    }

    pub fn begin_score_edit(&mut self, id: i64) -> Result<(), DomainError> {
        let record = self
            .scores
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| DomainError::not_found(NotFoundKind::Score, format!("Score {id} not found")))?;
        self.score_edit.begin(record)
    }

    pub fn change_score_field(&mut self, field: ScoreField, raw: &str) -> bool {
        self.score_edit.change(field, raw)
    }

    /// Send the whole buffered row as an update. `Ok(None)` when nothing was being edited.
    pub async fn commit_score_edit(&mut self) -> Result<Option<Score>, DomainError> {
        let Some(buffer) = self.score_edit.take() else {
            return Ok(None);
        };
        let updated = ModelStore::<Score>::update(self.store.as_ref(), buffer).await?;
        debug!(id = updated.id, "score edit committed");
        Ok(Some(updated))
    }

    pub fn cancel_score_edit(&mut self) {
        self.score_edit.cancel();
    }

    /// Ask `confirm` first; delete only on a yes. Returns whether the delete was sent.
    pub async fn delete_round<C>(&self, id: i64, confirm: &mut C) -> Result<bool, DomainError>
    where
        C: Confirm + ?Sized,
    {
        if !confirm.confirm(DELETE_ROUND_PROMPT).await {
            debug!(id, "round delete declined");
            return Ok(false);
        }
        ModelStore::<Score>::delete(self.store.as_ref(), id).await?;
        info!(id, "round deleted");
        Ok(true)
    }

    // ----- player stats -----

    /// Seed one zeroed row per player. Only allowed while the local list is empty.
    pub async fn initialize_stats(&self) -> Result<Vec<PlayerStat>, DomainError> {
        if !self.player_stats.is_empty() {
            return Err(DomainError::conflict(
                ConflictKind::StatsInitialized,
                "player statistics already exist",
            ));
        }

        let creates = PLAYER_NAMES.iter().map(|name| {
            ModelStore::<PlayerStat>::create(self.store.as_ref(), NewPlayerStat::named(*name))
        });
        let created = join_all(creates)
            .await
            .into_iter()
            .collect::<Result<Vec<_>, _>>()?;
        info!(count = created.len(), "player stats initialized");
        Ok(created)
    }

    pub fn begin_stat_edit(&mut self, id: i64) -> Result<(), DomainError> {
        let record = self
            .player_stats
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| {
                DomainError::not_found(NotFoundKind::PlayerStat, format!("Player stat {id} not found"))
            })?;
        self.stat_edit.begin(record)
    }

    pub fn change_stat_field(&mut self, field: StatField, raw: &str) -> bool {
        self.stat_edit.change(field, raw)
    }

    pub async fn commit_stat_edit(&mut self) -> Result<Option<PlayerStat>, DomainError> {
        let Some(buffer) = self.stat_edit.take() else {
            return Ok(None);
        };
        let updated = ModelStore::<PlayerStat>::update(self.store.as_ref(), buffer).await?;
        debug!(id = updated.id, "player stat edit committed");
        Ok(Some(updated))
    }

    pub fn cancel_stat_edit(&mut self) {
        self.stat_edit.cancel();
    }
}

impl<S> Drop for LiveSync<S> {
    fn drop(&mut self) {
        if let Some(subs) = self.subs.take() {
            subs.cancel();
        }
    }
}
