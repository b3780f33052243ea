//! Guild command policy repository for database operations.
//!
//! This module provides the `PolicyStore` contract the policy services depend on and
//! `GuildPolicyRepository`, its SeaORM implementation. A guild's policy is one
//! `guild_command_policy` row plus one `channel_command_rule` row per configured
//! channel, keyed by `(guild_id, channel_id)`. Every write addresses exactly one rule
//! row by key inside a transaction, so concurrent edits to different channels of the
//! same guild never overwrite each other.
//!
//! Each store call is bounded by a timeout. Connection failures and timeouts are
//! retried once after a short backoff before surfacing as
//! `PolicyError::StoreUnavailable`.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use migration::OnConflict;
use sea_orm::{
    sea_query::Expr, ActiveValue, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};

use crate::server::{
    error::policy::PolicyError,
    model::policy::{ChannelRule, GuildPolicy, PolicyMode, RuleEdit, RuleMutation},
};

/// Pause before the single retry of a transient store failure.
const RETRY_BACKOFF: Duration = Duration::from_millis(100);

/// Pure function deciding how one channel's rule changes.
///
/// Receives the channel's current rule (if any) and the guild's current mode, and
/// returns the edit to apply or a validation error that aborts the mutation. It may
/// be called more than once if the first attempt hits a transient store failure.
pub type RuleMutator<'m> =
    dyn Fn(Option<&ChannelRule>, &PolicyMode) -> Result<RuleEdit, PolicyError> + Send + Sync + 'm;

/// Persistence contract for guild command policies.
#[async_trait]
pub trait PolicyStore: Send + Sync {
    /// Reads a guild's policy, or the default policy if none is stored.
    async fn get(&self, guild_id: u64) -> Result<GuildPolicy, PolicyError>;

    /// Atomically applies `mutator` to the rule of one channel.
    ///
    /// The guild policy is created on first mutation. When the edit deletes the
    /// guild's last rule, the guild mode is reset to `All` in the same update.
    async fn mutate_channel_rule(
        &self,
        guild_id: u64,
        channel_id: u64,
        mutator: &RuleMutator<'_>,
    ) -> Result<RuleMutation, PolicyError>;

    /// Deletes a guild's policy and all of its rules.
    async fn delete_guild(&self, guild_id: u64) -> Result<(), PolicyError>;
}

/// SeaORM-backed policy store.
pub struct GuildPolicyRepository<'a> {
    db: &'a DatabaseConnection,
    /// Upper bound for a single attempt of a store call.
    timeout: Duration,
}

impl<'a> GuildPolicyRepository<'a> {
    /// Creates a new GuildPolicyRepository instance.
    ///
    /// # Arguments
    /// - `db` - Reference to the database connection
    /// - `timeout` - Upper bound for each attempt of a store call
    ///
    /// # Returns
    /// - `GuildPolicyRepository` - New repository instance
    pub fn new(db: &'a DatabaseConnection, timeout: Duration) -> Self {
        Self { db, timeout }
    }

    async fn try_get(&self, guild_id: u64) -> Result<GuildPolicy, PolicyError> {
        // Single statement so the guild mode and its rules come from one snapshot
        let mut rows = entity::prelude::GuildCommandPolicy::find_by_id(guild_id.to_string())
            .find_with_related(entity::prelude::ChannelCommandRule)
            .order_by_asc(entity::channel_command_rule::Column::CreatedAt)
            .order_by_asc(entity::channel_command_rule::Column::ChannelId)
            .all(self.db)
            .await?;

        let Some((guild, rules)) = rows.pop() else {
            return Ok(GuildPolicy::default());
        };

        Ok(GuildPolicy::from_entities(guild, rules))
    }

    async fn try_mutate(
        &self,
        guild_id: u64,
        channel_id: u64,
        mutator: &RuleMutator<'_>,
    ) -> Result<RuleMutation, PolicyError> {
        let txn = self.db.begin().await?;
        let guild_key = guild_id.to_string();
        let channel_key = channel_id.to_string();

        // Upserting the guild row materializes the policy on first mutation and
        // serializes writers of the same guild on that row.
        let guild = touch_guild(&txn, &guild_key).await?;
        let mode = PolicyMode::parse(&guild.mode);

        let previous = entity::prelude::ChannelCommandRule::find_by_id((
            guild_key.clone(),
            channel_key.clone(),
        ))
        .one(&txn)
        .await?
        .and_then(ChannelRule::from_entity);

        match mutator(previous.as_ref(), &mode)? {
            RuleEdit::Keep => {
                txn.rollback().await?;

                Ok(RuleMutation {
                    current: previous.clone(),
                    previous,
                    mode,
                })
            }
            RuleEdit::Put {
                rule,
                activate_whitelist,
            } => {
                let now = Utc::now();

                entity::prelude::ChannelCommandRule::insert(
                    entity::channel_command_rule::ActiveModel {
                        guild_id: ActiveValue::Set(guild_key.clone()),
                        channel_id: ActiveValue::Set(channel_key),
                        cmd_mode: ActiveValue::Set(rule.cmd_mode.as_str().to_string()),
                        allowed_commands: ActiveValue::Set(rule.allowed_commands_json()),
                        created_at: ActiveValue::Set(now),
                        updated_at: ActiveValue::Set(now),
                    },
                )
                .on_conflict(
                    OnConflict::columns([
                        entity::channel_command_rule::Column::GuildId,
                        entity::channel_command_rule::Column::ChannelId,
                    ])
                    .update_columns([
                        entity::channel_command_rule::Column::CmdMode,
                        entity::channel_command_rule::Column::AllowedCommands,
                        entity::channel_command_rule::Column::UpdatedAt,
                    ])
                    .to_owned(),
                )
                .exec(&txn)
                .await?;

                let mode = if activate_whitelist && mode != PolicyMode::Whitelist {
                    set_mode(&txn, &guild_key, PolicyMode::Whitelist).await?
                } else {
                    mode
                };

                txn.commit().await?;

                Ok(RuleMutation {
                    previous,
                    current: Some(rule),
                    mode,
                })
            }
            RuleEdit::Delete => {
                entity::prelude::ChannelCommandRule::delete_by_id((
                    guild_key.clone(),
                    channel_key,
                ))
                .exec(&txn)
                .await?;

                let remaining = entity::prelude::ChannelCommandRule::find()
                    .filter(
                        entity::channel_command_rule::Column::GuildId.eq(guild_key.as_str()),
                    )
                    .count(&txn)
                    .await?;

                // An empty whitelist must never mean "allow nothing"
                let mode = if remaining == 0 && mode != PolicyMode::All {
                    set_mode(&txn, &guild_key, PolicyMode::All).await?
                } else {
                    mode
                };

                txn.commit().await?;

                Ok(RuleMutation {
                    previous,
                    current: None,
                    mode,
                })
            }
        }
    }

    async fn try_delete_guild(&self, guild_id: u64) -> Result<(), PolicyError> {
        let txn = self.db.begin().await?;
        let guild_key = guild_id.to_string();

        entity::prelude::ChannelCommandRule::delete_many()
            .filter(entity::channel_command_rule::Column::GuildId.eq(guild_key.as_str()))
            .exec(&txn)
            .await?;

        entity::prelude::GuildCommandPolicy::delete_by_id(guild_key)
            .exec(&txn)
            .await?;

        txn.commit().await?;

        Ok(())
    }
}

#[async_trait]
impl PolicyStore for GuildPolicyRepository<'_> {
    async fn get(&self, guild_id: u64) -> Result<GuildPolicy, PolicyError> {
        with_retry(self.timeout, "policy read", || self.try_get(guild_id)).await
    }

    async fn mutate_channel_rule(
        &self,
        guild_id: u64,
        channel_id: u64,
        mutator: &RuleMutator<'_>,
    ) -> Result<RuleMutation, PolicyError> {
        with_retry(self.timeout, "rule mutation", || {
            self.try_mutate(guild_id, channel_id, mutator)
        })
        .await
    }

    async fn delete_guild(&self, guild_id: u64) -> Result<(), PolicyError> {
        with_retry(self.timeout, "policy deletion", || {
            self.try_delete_guild(guild_id)
        })
        .await
    }
}

/// Runs `attempt` under `timeout`, retrying once on a transient failure.
///
/// A timed out attempt counts as transient. A second transient failure is returned
/// as is; non-transient errors are returned without retrying.
pub(crate) async fn with_retry<T, F, Fut>(
    timeout: Duration,
    operation: &str,
    mut attempt: F,
) -> Result<T, PolicyError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, PolicyError>>,
{
    let mut retried = false;

    loop {
        let result = match tokio::time::timeout(timeout, attempt()).await {
            Ok(result) => result,
            Err(_) => Err(PolicyError::StoreUnavailable(format!(
                "{} timed out after {}ms",
                operation,
                timeout.as_millis()
            ))),
        };

        match result {
            Err(err) if err.is_transient() && !retried => {
                tracing::warn!("Retrying {} after transient failure: {}", operation, err);
                retried = true;
                tokio::time::sleep(RETRY_BACKOFF).await;
            }
            result => return result,
        }
    }
}

/// Creates the guild row if missing, otherwise bumps its `updated_at`.
///
/// # Returns
/// - `Ok(Model)` - The guild row as it is inside the transaction
/// - `Err(PolicyError)` - Database error during upsert
async fn touch_guild(
    txn: &DatabaseTransaction,
    guild_key: &str,
) -> Result<entity::guild_command_policy::Model, PolicyError> {
    let now = Utc::now();

    let guild = entity::prelude::GuildCommandPolicy::insert(
        entity::guild_command_policy::ActiveModel {
            guild_id: ActiveValue::Set(guild_key.to_string()),
            mode: ActiveValue::Set(PolicyMode::All.as_str().to_string()),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        },
    )
    .on_conflict(
        OnConflict::column(entity::guild_command_policy::Column::GuildId)
            .update_column(entity::guild_command_policy::Column::UpdatedAt)
            .to_owned(),
    )
    .exec_with_returning(txn)
    .await?;

    Ok(guild)
}

async fn set_mode(
    txn: &DatabaseTransaction,
    guild_key: &str,
    mode: PolicyMode,
) -> Result<PolicyMode, PolicyError> {
    entity::prelude::GuildCommandPolicy::update_many()
        .col_expr(
            entity::guild_command_policy::Column::Mode,
            Expr::value(mode.as_str()),
        )
        .filter(entity::guild_command_policy::Column::GuildId.eq(guild_key))
        .exec(txn)
        .await?;

    tracing::info!("Guild {} command policy mode set to {}", guild_key, mode);

    Ok(mode)
}
