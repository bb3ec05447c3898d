use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::{ColumnDef, Index, Table};

#[derive(DeriveMigrationName)]
pub struct Migration;

// ----- Iden enums for tables & columns -----
#[derive(Iden)]
enum Scores {
    Table,
    Id,
    RoundNumber,
    Tsim,
    Jason,
    Wai,
    MumSoup,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum PlayerStats {
    Table,
    Id,
    PlayerName,
    WinByOthers,
    SelfDrawn,
    PaidOut,
    SpecialBonus,
    CreatedAt,
    UpdatedAt,
}

/// Nullable integer column defaulting to zero.
fn points(col: impl IntoIden) -> ColumnDef {
    ColumnDef::new(col).integer().null().default(0).to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // scores
        manager
            .create_table(
                Table::create()
                    .table(Scores::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Scores::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Scores::RoundNumber).integer().not_null())
                    .col(points(Scores::Tsim))
                    .col(points(Scores::Jason))
                    .col(points(Scores::Wai))
                    .col(points(Scores::MumSoup))
                    .col(
                        ColumnDef::new(Scores::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Scores::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("scores_round_number_key")
                    .table(Scores::Table)
                    .col(Scores::RoundNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // player_stats
        manager
            .create_table(
                Table::create()
                    .table(PlayerStats::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PlayerStats::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(PlayerStats::PlayerName).string().not_null())
                    .col(points(PlayerStats::WinByOthers))
                    .col(points(PlayerStats::SelfDrawn))
                    .col(points(PlayerStats::PaidOut))
                    .col(points(PlayerStats::SpecialBonus))
                    .col(
                        ColumnDef::new(PlayerStats::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PlayerStats::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PlayerStats::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Scores::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}
