//! SeaORM adapter for the player_stats table.

use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, NotSet, Order, QueryOrder, Set};

use crate::entities::player_stats;

pub mod dto;

pub use dto::{PlayerStatCreate, PlayerStatUpdate};

pub async fn find_all<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<player_stats::Model>, sea_orm::DbErr> {
    player_stats::Entity::find()
        .order_by(player_stats::Column::Id, Order::Asc)
        .all(conn)
        .await
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<player_stats::Model>, sea_orm::DbErr> {
    player_stats::Entity::find_by_id(id).one(conn).await
}

pub async fn create_player_stat<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: PlayerStatCreate,
) -> Result<player_stats::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();

    let stat = player_stats::ActiveModel {
        id: NotSet,
        player_name: Set(dto.player_name),
        win_by_others: Set(Some(dto.win_by_others)),
        self_drawn: Set(Some(dto.self_drawn)),
        paid_out: Set(Some(dto.paid_out)),
        special_bonus: Set(Some(dto.special_bonus)),
        created_at: Set(now),
        updated_at: Set(now),
    };

    stat.insert(conn).await
}

pub async fn update_player_stat<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: PlayerStatUpdate,
) -> Result<player_stats::Model, sea_orm::DbErr> {
    let existing = find_by_id(conn, dto.id)
        .await?
        .ok_or_else(|| sea_orm::DbErr::RecordNotFound(format!("player_stats id={}", dto.id)))?;

    let mut stat: player_stats::ActiveModel = existing.into();
    stat.player_name = Set(dto.player_name);
    stat.win_by_others = Set(Some(dto.win_by_others));
    stat.self_drawn = Set(Some(dto.self_drawn));
    stat.paid_out = Set(Some(dto.paid_out));
    stat.special_bonus = Set(Some(dto.special_bonus));
    stat.updated_at = Set(time::OffsetDateTime::now_utc());

    stat.update(conn).await
}

pub async fn delete_player_stat<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let result = player_stats::Entity::delete_by_id(id).exec(conn).await?;
    Ok(result.rows_affected)
}
