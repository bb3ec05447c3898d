//! SeaORM adapters. Repos call these and convert models into domain types.

pub mod player_stats_sea;
pub mod scores_sea;
