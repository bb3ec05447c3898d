//! SeaORM adapter for the scores table.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, Order, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::entities::scores;

pub mod dto;

pub use dto::{ScoreCreate, ScoreUpdate};

/// All rows ordered by id (insertion order).
pub async fn find_all<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<scores::Model>, sea_orm::DbErr> {
    scores::Entity::find()
        .order_by(scores::Column::Id, Order::Asc)
        .all(conn)
        .await
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<scores::Model>, sea_orm::DbErr> {
    scores::Entity::find_by_id(id).one(conn).await
}

pub async fn find_by_round_number<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    round_number: i32,
) -> Result<Option<scores::Model>, sea_orm::DbErr> {
    scores::Entity::find()
        .filter(scores::Column::RoundNumber.eq(round_number))
        .one(conn)
        .await
}

/// Highest stored round number, `None` when the table is empty.
pub async fn max_round_number<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Option<i32>, sea_orm::DbErr> {
    let max: Option<Option<i32>> = scores::Entity::find()
        .select_only()
        .column_as(Expr::col(scores::Column::RoundNumber).max(), "max_round")
        .into_tuple()
        .one(conn)
        .await?;
    Ok(max.flatten())
}

pub async fn create_score<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: ScoreCreate,
) -> Result<scores::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();

    let score = scores::ActiveModel {
        id: NotSet,
        round_number: Set(dto.round_number),
        tsim: Set(Some(dto.tsim)),
        jason: Set(Some(dto.jason)),
        wai: Set(Some(dto.wai)),
        mum_soup: Set(Some(dto.mum_soup)),
        created_at: Set(now),
        updated_at: Set(now),
    };

    score.insert(conn).await
}

/// Overwrite editable columns. Returns `DbErr::RecordNotFound` for unknown ids.
pub async fn update_score<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: ScoreUpdate,
) -> Result<scores::Model, sea_orm::DbErr> {
    let existing = find_by_id(conn, dto.id)
        .await?
        .ok_or_else(|| sea_orm::DbErr::RecordNotFound(format!("scores id={}", dto.id)))?;

    let mut score: scores::ActiveModel = existing.into();
    score.round_number = Set(dto.round_number);
    score.tsim = Set(Some(dto.tsim));
    score.jason = Set(Some(dto.jason));
    score.wai = Set(Some(dto.wai));
    score.mum_soup = Set(Some(dto.mum_soup));
    score.updated_at = Set(time::OffsetDateTime::now_utc());

    score.update(conn).await
}

/// Delete by id, returning the number of rows removed.
pub async fn delete_score<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let result = scores::Entity::delete_by_id(id).exec(conn).await?;
    Ok(result.rows_affected)
}
