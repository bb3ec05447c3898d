use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "player_stats")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "player_name")]
    pub player_name: String,
    #[sea_orm(column_name = "win_by_others")]
    pub win_by_others: Option<i32>,
    #[sea_orm(column_name = "self_drawn")]
    pub self_drawn: Option<i32>,
    #[sea_orm(column_name = "paid_out")]
    pub paid_out: Option<i32>,
    #[sea_orm(column_name = "special_bonus")]
    pub special_bonus: Option<i32>,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
    #[sea_orm(column_name = "updated_at")]
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
