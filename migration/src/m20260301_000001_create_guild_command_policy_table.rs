use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GuildCommandPolicy::Table)
                    .if_not_exists()
                    .col(string(GuildCommandPolicy::GuildId).primary_key())
                    .col(string(GuildCommandPolicy::Mode).default("all"))
                    .col(timestamp_with_time_zone(GuildCommandPolicy::CreatedAt))
                    .col(timestamp_with_time_zone(GuildCommandPolicy::UpdatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GuildCommandPolicy::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum GuildCommandPolicy {
    Table,
    GuildId,
    Mode,
    CreatedAt,
    UpdatedAt,
}
