pub mod player_stats;
pub mod scores;

pub use player_stats::Entity as PlayerStats;
pub use scores::Entity as Scores;
