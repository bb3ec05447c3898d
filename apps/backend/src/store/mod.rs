//! Record store contract: create / update / delete plus live full-set queries.

use async_trait::async_trait;

use crate::errors::domain::DomainError;
use crate::repos::player_stats::{NewPlayerStat, PlayerStat};
use crate::repos::scores::{NewScore, Score};

pub mod live;
pub mod sea;

pub use live::{LiveQuery, Snapshot, Subscription};
pub use sea::SeaStore;

/// A stored row with a store-assigned id.
pub trait Record: Clone + Send + Sync + 'static {
    /// Fields supplied when creating a row.
    type Draft: Send + 'static;

    fn id(&self) -> i64;
}

impl Record for Score {
    type Draft = NewScore;

    fn id(&self) -> i64 {
        self.id
    }
}

impl Record for PlayerStat {
    type Draft = NewPlayerStat;

    fn id(&self) -> i64 {
        self.id
    }
}

/// Per-record-type operations. Mutation results are also observable through
/// every open `observe_query` subscription.
#[async_trait]
pub trait ModelStore<R: Record>: Send + Sync {
    async fn create(&self, draft: R::Draft) -> Result<R, DomainError>;

    /// Overwrite the stored row with `record` (last write wins).
    async fn update(&self, record: R) -> Result<R, DomainError>;

    async fn delete(&self, id: i64) -> Result<(), DomainError>;

    /// Live sequence of full result sets; the first `next()` yields the current set.
    fn observe_query(&self) -> Subscription<R>;
}
