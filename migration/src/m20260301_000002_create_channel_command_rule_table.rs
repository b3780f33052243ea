use sea_orm_migration::{prelude::*, schema::*};

use super::m20260301_000001_create_guild_command_policy_table::GuildCommandPolicy;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ChannelCommandRule::Table)
                    .if_not_exists()
                    .col(string(ChannelCommandRule::GuildId))
                    .col(string(ChannelCommandRule::ChannelId))
                    .col(string(ChannelCommandRule::CmdMode))
                    .col(json(ChannelCommandRule::AllowedCommands))
                    .col(timestamp_with_time_zone(ChannelCommandRule::CreatedAt))
                    .col(timestamp_with_time_zone(ChannelCommandRule::UpdatedAt))
                    // One rule per channel, addressed by key rather than position
                    .primary_key(
                        Index::create()
                            .name("pk_channel_command_rule")
                            .col(ChannelCommandRule::GuildId)
                            .col(ChannelCommandRule::ChannelId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_channel_command_rule_guild_id")
                            .from(ChannelCommandRule::Table, ChannelCommandRule::GuildId)
                            .to(GuildCommandPolicy::Table, GuildCommandPolicy::GuildId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_channel_command_rule_guild_id")
                    .table(ChannelCommandRule::Table)
                    .col(ChannelCommandRule::GuildId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_channel_command_rule_guild_id")
                    .table(ChannelCommandRule::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(ChannelCommandRule::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ChannelCommandRule {
    Table,
    GuildId,
    ChannelId,
    CmdMode,
    AllowedCommands,
    CreatedAt,
    UpdatedAt,
}
