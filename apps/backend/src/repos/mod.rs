//! Domain-facing repository functions (generic over ConnectionTrait).

pub mod player_stats;
pub mod scores;
