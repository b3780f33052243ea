//! Channel command rule factory for creating test rule rows.

use crate::factory::helpers::next_id;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr, EntityTrait};

/// Factory for creating test channel command rules with customizable fields.
///
/// The owning guild policy row is created in `whitelist` mode if it does not
/// exist yet, so a rule built by this factory is active by default.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::factory::channel_rule::ChannelRuleFactory;
///
/// let rule = ChannelRuleFactory::new(&db, "123")
///     .channel_id("10")
///     .cmd_mode("exclude")
///     .allowed_commands(["rick"])
///     .build()
///     .await?;
/// ```
pub struct ChannelRuleFactory<'a> {
    db: &'a DatabaseConnection,
    guild_id: String,
    channel_id: String,
    cmd_mode: String,
    allowed_commands: serde_json::Value,
    created_at: DateTime<Utc>,
}

impl<'a> ChannelRuleFactory<'a> {
    /// Creates a new ChannelRuleFactory with default values.
    ///
    /// Defaults:
    /// - channel_id: next unique id
    /// - cmd_mode: `"only"`
    /// - allowed_commands: `["ping"]`
    /// - created_at: now
    ///
    /// # Arguments
    /// - `db` - Database connection for inserting the entity
    /// - `guild_id` - Guild the rule belongs to
    pub fn new(db: &'a DatabaseConnection, guild_id: &str) -> Self {
        Self {
            db,
            guild_id: guild_id.to_string(),
            channel_id: next_id().to_string(),
            cmd_mode: "only".to_string(),
            allowed_commands: serde_json::json!(["ping"]),
            created_at: Utc::now(),
        }
    }

    /// Sets the channel ID.
    pub fn channel_id(mut self, channel_id: impl Into<String>) -> Self {
        self.channel_id = channel_id.into();
        self
    }

    /// Sets the raw stored command mode.
    pub fn cmd_mode(mut self, cmd_mode: impl Into<String>) -> Self {
        self.cmd_mode = cmd_mode.into();
        self
    }

    /// Sets the stored command list from names.
    pub fn allowed_commands<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        self.allowed_commands = serde_json::json!(names);
        self
    }

    /// Sets the stored command list to an arbitrary JSON value.
    pub fn raw_allowed_commands(mut self, value: serde_json::Value) -> Self {
        self.allowed_commands = value;
        self
    }

    /// Sets the creation timestamp, which determines rule order.
    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Builds and inserts the rule row, creating the guild policy row when missing.
    ///
    /// # Returns
    /// - `Ok(entity::channel_command_rule::Model)` - Created rule row
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::channel_command_rule::Model, DbErr> {
        let guild = entity::prelude::GuildCommandPolicy::find_by_id(self.guild_id.clone())
            .one(self.db)
            .await?;

        if guild.is_none() {
            crate::factory::guild_policy::GuildPolicyFactory::new(self.db)
                .guild_id(self.guild_id.clone())
                .mode("whitelist")
                .build()
                .await?;
        }

        entity::channel_command_rule::ActiveModel {
            guild_id: ActiveValue::Set(self.guild_id),
            channel_id: ActiveValue::Set(self.channel_id),
            cmd_mode: ActiveValue::Set(self.cmd_mode),
            allowed_commands: ActiveValue::Set(self.allowed_commands),
            created_at: ActiveValue::Set(self.created_at),
            updated_at: ActiveValue::Set(self.created_at),
        }
        .insert(self.db)
        .await
    }
}

/// Creates an `only ping` rule for the given guild and channel.
///
/// Shorthand for `ChannelRuleFactory::new(db, guild_id).channel_id(channel_id).build().await`.
pub async fn create_channel_rule(
    db: &DatabaseConnection,
    guild_id: &str,
    channel_id: &str,
) -> Result<entity::channel_command_rule::Model, DbErr> {
    ChannelRuleFactory::new(db, guild_id)
        .channel_id(channel_id)
        .build()
        .await
}
