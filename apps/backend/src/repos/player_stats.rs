//! Player statistics repository functions for domain layer.

use sea_orm::ConnectionTrait;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::adapters::player_stats_sea as stats_adapter;
use crate::entities::player_stats;
use crate::errors::domain::{DomainError, NotFoundKind};

/// Cumulative counters for one named player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStat {
    pub id: i64,
    pub player_name: String,
    /// 食胡
    pub win_by_others: i32,
    /// 自摸
    pub self_drawn: i32,
    /// 出統
    pub paid_out: i32,
    /// 特別賞罰
    pub special_bonus: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewPlayerStat {
    pub player_name: String,
    pub win_by_others: i32,
    pub self_drawn: i32,
    pub paid_out: i32,
    pub special_bonus: i32,
}

impl NewPlayerStat {
    /// All counters zeroed.
    pub fn named(player_name: impl Into<String>) -> Self {
        Self {
            player_name: player_name.into(),
            ..Self::default()
        }
    }
}

pub async fn list_all<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<PlayerStat>, DomainError> {
    let rows = stats_adapter::find_all(conn).await?;
    Ok(rows.into_iter().map(PlayerStat::from).collect())
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    draft: NewPlayerStat,
) -> Result<PlayerStat, DomainError> {
    let dto = stats_adapter::PlayerStatCreate {
        player_name: draft.player_name,
        win_by_others: draft.win_by_others,
        self_drawn: draft.self_drawn,
        paid_out: draft.paid_out,
        special_bonus: draft.special_bonus,
    };
    let row = stats_adapter::create_player_stat(conn, dto).await?;
    Ok(PlayerStat::from(row))
}

pub async fn update<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    stat: &PlayerStat,
) -> Result<PlayerStat, DomainError> {
    let dto = stats_adapter::PlayerStatUpdate {
        id: stat.id,
        player_name: stat.player_name.clone(),
        win_by_others: stat.win_by_others,
        self_drawn: stat.self_drawn,
        paid_out: stat.paid_out,
        special_bonus: stat.special_bonus,
    };
    match stats_adapter::update_player_stat(conn, dto).await {
        Ok(row) => Ok(PlayerStat::from(row)),
        Err(sea_orm::DbErr::RecordNotFound(_)) => Err(not_found(stat.id)),
        Err(e) => Err(e.into()),
    }
}

pub async fn delete<C: ConnectionTrait + Send + Sync>(conn: &C, id: i64) -> Result<(), DomainError> {
    match stats_adapter::delete_player_stat(conn, id).await? {
        0 => Err(not_found(id)),
        _ => Ok(()),
    }
}

fn not_found(id: i64) -> DomainError {
    DomainError::not_found(NotFoundKind::PlayerStat, format!("Player stat {id} not found"))
}

impl From<player_stats::Model> for PlayerStat {
    fn from(model: player_stats::Model) -> Self {
        Self {
            id: model.id,
            player_name: model.player_name,
            win_by_others: model.win_by_others.unwrap_or_default(),
            self_drawn: model.self_drawn.unwrap_or_default(),
            paid_out: model.paid_out.unwrap_or_default(),
            special_bonus: model.special_bonus.unwrap_or_default(),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
