//! Scores repository functions for domain layer.

use sea_orm::ConnectionTrait;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::adapters::scores_sea as scores_adapter;
use crate::entities::scores;
use crate::errors::domain::{DomainError, NotFoundKind};

/// One round: four players' point deltas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    pub id: i64,
    pub round_number: i32,
    pub tsim: i32,
    pub jason: i32,
    pub wai: i32,
    pub mum_soup: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Fields for a new round. `round_number: None` lets the store pick the next one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewScore {
    pub round_number: Option<i32>,
    pub tsim: i32,
    pub jason: i32,
    pub wai: i32,
    pub mum_soup: i32,
}

impl NewScore {
    /// A zeroed round with the given number.
    pub fn round(round_number: i32) -> Self {
        Self {
            round_number: Some(round_number),
            ..Self::default()
        }
    }
}

pub async fn list_all<C: ConnectionTrait + Send + Sync>(conn: &C) -> Result<Vec<Score>, DomainError> {
    let rows = scores_adapter::find_all(conn).await?;
    Ok(rows.into_iter().map(Score::from).collect())
}

/// Next free round number: `max + 1`, or 1 for an empty table.
pub async fn next_round_number<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<i32, DomainError> {
    let max = scores_adapter::max_round_number(conn).await?;
    Ok(max.map_or(1, |m| m.saturating_add(1)))
}

/// Insert a round. A missing or already used round number is replaced by
/// the next free one; run inside a transaction so the check and insert agree.
pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    draft: NewScore,
) -> Result<Score, DomainError> {
    let round_number = match draft.round_number {
        Some(n) if n > 0 && scores_adapter::find_by_round_number(conn, n).await?.is_none() => n,
        _ => next_round_number(conn).await?,
    };

    let dto = scores_adapter::ScoreCreate {
        round_number,
        tsim: draft.tsim,
        jason: draft.jason,
        wai: draft.wai,
        mum_soup: draft.mum_soup,
    };
    let row = scores_adapter::create_score(conn, dto).await?;
    Ok(Score::from(row))
}

/// Full-record overwrite (last write wins). Timestamps on `score` are ignored.
pub async fn update<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    score: &Score,
) -> Result<Score, DomainError> {
    let dto = scores_adapter::ScoreUpdate {
        id: score.id,
        round_number: score.round_number,
        tsim: score.tsim,
        jason: score.jason,
        wai: score.wai,
        mum_soup: score.mum_soup,
    };
    match scores_adapter::update_score(conn, dto).await {
        Ok(row) => Ok(Score::from(row)),
        Err(sea_orm::DbErr::RecordNotFound(_)) => Err(not_found(score.id)),
        Err(e) => Err(e.into()),
    }
}

pub async fn delete<C: ConnectionTrait + Send + Sync>(conn: &C, id: i64) -> Result<(), DomainError> {
    match scores_adapter::delete_score(conn, id).await? {
        0 => Err(not_found(id)),
        _ => Ok(()),
    }
}

fn not_found(id: i64) -> DomainError {
    DomainError::not_found(NotFoundKind::Score, format!("Score {id} not found"))
}

impl From<scores::Model> for Score {
    fn from(model: scores::Model) -> Self {
        Self {
            id: model.id,
            round_number: model.round_number,
            tsim: model.tsim.unwrap_or_default(),
            jason: model.jason.unwrap_or_default(),
            wai: model.wai.unwrap_or_default(),
            mum_soup: model.mum_soup.unwrap_or_default(),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
