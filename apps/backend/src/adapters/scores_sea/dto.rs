//! DTOs for scores_sea adapter.

/// DTO for creating a score row. `round_number` is already resolved.
#[derive(Debug, Clone)]
pub struct ScoreCreate {
    pub round_number: i32,
    pub tsim: i32,
    pub jason: i32,
    pub wai: i32,
    pub mum_soup: i32,
}

/// DTO for overwriting the editable columns of an existing row.
#[derive(Debug, Clone)]
pub struct ScoreUpdate {
    pub id: i64,
    pub round_number: i32,
    pub tsim: i32,
    pub jason: i32,
    pub wai: i32,
    pub mum_soup: i32,
}
