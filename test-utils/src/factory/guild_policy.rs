//! Guild command policy factory for creating test policy rows.

use crate::factory::helpers::next_id;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test guild command policies with customizable fields.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::factory::guild_policy::GuildPolicyFactory;
///
/// let policy = GuildPolicyFactory::new(&db)
///     .guild_id("987654321")
///     .mode("whitelist")
///     .build()
///     .await?;
/// ```
pub struct GuildPolicyFactory<'a> {
    db: &'a DatabaseConnection,
    guild_id: String,
    mode: String,
}

impl<'a> GuildPolicyFactory<'a> {
    /// Creates a new GuildPolicyFactory with default values.
    ///
    /// Defaults:
    /// - guild_id: next unique id
    /// - mode: `"all"`
    ///
    /// # Arguments
    /// - `db` - Database connection for inserting the entity
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self {
            db,
            guild_id: next_id().to_string(),
            mode: "all".to_string(),
        }
    }

    /// Sets the guild ID.
    pub fn guild_id(mut self, guild_id: impl Into<String>) -> Self {
        self.guild_id = guild_id.into();
        self
    }

    /// Sets the raw stored mode. Any string is accepted so tests can store corrupt values.
    pub fn mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = mode.into();
        self
    }

    /// Builds and inserts the guild policy row into the database.
    ///
    /// # Returns
    /// - `Ok(entity::guild_command_policy::Model)` - Created policy row
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::guild_command_policy::Model, DbErr> {
        let now = Utc::now();

        entity::guild_command_policy::ActiveModel {
            guild_id: ActiveValue::Set(self.guild_id),
            mode: ActiveValue::Set(self.mode),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        }
        .insert(self.db)
        .await
    }
}

/// Creates a guild policy in the default `all` mode.
///
/// Shorthand for `GuildPolicyFactory::new(db).build().await`.
pub async fn create_guild_policy(
    db: &DatabaseConnection,
) -> Result<entity::guild_command_policy::Model, DbErr> {
    GuildPolicyFactory::new(db).build().await
}

/// Creates a guild policy in `whitelist` mode.
///
/// Shorthand for `GuildPolicyFactory::new(db).mode("whitelist").build().await`.
pub async fn create_whitelist_policy(
    db: &DatabaseConnection,
) -> Result<entity::guild_command_policy::Model, DbErr> {
    GuildPolicyFactory::new(db).mode("whitelist").build().await
}
