//! DTOs for player_stats_sea adapter.

#[derive(Debug, Clone)]
pub struct PlayerStatCreate {
    pub player_name: String,
    pub win_by_others: i32,
    pub self_drawn: i32,
    pub paid_out: i32,
    pub special_bonus: i32,
}

#[derive(Debug, Clone)]
pub struct PlayerStatUpdate {
    pub id: i64,
    pub player_name: String,
    pub win_by_others: i32,
    pub self_drawn: i32,
    pub paid_out: i32,
    pub special_bonus: i32,
}
