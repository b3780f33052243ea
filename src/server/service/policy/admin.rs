//! Policy administration.
//!
//! `PolicyAdminService` is the only writer of guild command policies. Each operation
//! validates its arguments against the command catalog, then hands the store a pure
//! mutator for exactly one `(guild_id, channel_id)` rule. The store applies it inside
//! a single transaction, so concurrent edits to different channels never interfere.

use std::collections::BTreeSet;

use crate::server::{
    data::guild_policy::PolicyStore,
    error::policy::{PolicyError, ValidationError},
    model::{
        command::ResolvedCommand,
        policy::{
            BulkApplyReport, ChannelRule, ChannelRuleUpdate, CommandMode, CommandSetChange,
            GuildPolicy, PolicyMode, RuleEdit, RuleRemoval,
        },
    },
    service::catalog::CommandCatalog,
};

pub struct PolicyAdminService<'a, S: PolicyStore + ?Sized> {
    store: &'a S,
    catalog: &'a CommandCatalog,
}

impl<'a, S: PolicyStore + ?Sized> PolicyAdminService<'a, S> {
    pub fn new(store: &'a S, catalog: &'a CommandCatalog) -> Self {
        Self { store, catalog }
    }

    /// Configures a channel's rule, replacing any existing rule as a unit.
    ///
    /// Command names are resolved through the catalog and stored by canonical name.
    /// The guild is switched to whitelist mode in the same update.
    ///
    /// # Arguments
    /// - `guild_id` - Guild being configured
    /// - `channel_id` - Channel or thread the rule applies to
    /// - `cmd_mode` - How the command list is interpreted
    /// - `names` - Command names or aliases; must be empty for `All`
    ///
    /// # Returns
    /// - `Ok(ChannelRuleUpdate)` - The stored rule and the rule it replaced
    /// - `Err(PolicyError::Validation)` - Unknown names, or names contradicting the mode
    /// - `Err(PolicyError::StoreUnavailable)` - Nothing was persisted
    pub async fn set_channel_rule(
        &self,
        guild_id: u64,
        channel_id: u64,
        cmd_mode: CommandMode,
        names: &[String],
    ) -> Result<ChannelRuleUpdate, PolicyError> {
        if let CommandMode::Invalid(raw) = &cmd_mode {
            return Err(ValidationError::UnknownMode(raw.clone()).into());
        }

        if cmd_mode == CommandMode::All && !names.is_empty() {
            return Err(ValidationError::CommandsWithAllMode.into());
        }

        let (resolved, unknown) = self.catalog.resolve_all(names.iter().map(String::as_str));
        if !unknown.is_empty() {
            return Err(ValidationError::UnknownCommands(unknown).into());
        }

        if cmd_mode.requires_commands() && resolved.is_empty() {
            return Err(ValidationError::MissingCommands(cmd_mode.to_string()).into());
        }

        let rule = ChannelRule::new(
            channel_id,
            cmd_mode,
            resolved.into_iter().map(|command| command.canonical),
        );

        let mutation = self
            .store
            .mutate_channel_rule(guild_id, channel_id, &|_, _| {
                Ok(RuleEdit::Put {
                    rule: rule.clone(),
                    activate_whitelist: true,
                })
            })
            .await?;

        tracing::info!(
            "Channel {} in guild {} configured as {} {:?}",
            channel_id,
            guild_id,
            rule.cmd_mode,
            rule.allowed_commands
        );

        Ok(ChannelRuleUpdate {
            previous: mutation.previous,
            rule,
        })
    }

    /// Removes a channel's rule.
    ///
    /// Removing the guild's last rule reverts the guild to unrestricted in the same
    /// update.
    ///
    /// # Returns
    /// - `Ok(RuleRemoval::Removed)` - The rule was deleted
    /// - `Ok(RuleRemoval::NotConfigured)` - The channel had no rule; nothing written
    /// - `Err(PolicyError::StoreUnavailable)` - Nothing was persisted
    pub async fn remove_channel_rule(
        &self,
        guild_id: u64,
        channel_id: u64,
    ) -> Result<RuleRemoval, PolicyError> {
        let mutation = self
            .store
            .mutate_channel_rule(guild_id, channel_id, &|current, _| {
                Ok(match current {
                    Some(_) => RuleEdit::Delete,
                    None => RuleEdit::Keep,
                })
            })
            .await?;

        let Some(rule) = mutation.previous else {
            return Ok(RuleRemoval::NotConfigured);
        };

        let reverted_to_open = mutation.mode == PolicyMode::All;

        tracing::info!(
            "Channel {} in guild {} rule removed{}",
            channel_id,
            guild_id,
            if reverted_to_open {
                "; guild is unrestricted again"
            } else {
                ""
            }
        );

        Ok(RuleRemoval::Removed {
            rule,
            reverted_to_open,
        })
    }

    /// Allows a command in a channel, creating an `only` rule when none exists.
    ///
    /// Adding a command that is already listed (under any of its names) changes
    /// nothing. A channel in `all` mode already permits every command and is left as
    /// it is. On an `exclude` rule the command joins the blocked set.
    ///
    /// # Returns
    /// - `Ok(CommandSetChange)` - Rule after the operation and whether it changed
    /// - `Err(PolicyError::Validation)` - Missing or unknown command name
    /// - `Err(PolicyError::Configuration)` - The stored rule is corrupt
    pub async fn add_command_to_channel(
        &self,
        guild_id: u64,
        channel_id: u64,
        name: &str,
    ) -> Result<CommandSetChange, PolicyError> {
        let command = self.resolve_one(name)?;

        let mutation = self
            .store
            .mutate_channel_rule(guild_id, channel_id, &|current, _| {
                add_command(guild_id, channel_id, &command, current)
            })
            .await?;

        if mutation.changed() {
            tracing::info!(
                "Command `{}` added to channel {} in guild {}",
                command.canonical,
                channel_id,
                guild_id
            );
        }

        Ok(CommandSetChange {
            changed: mutation.changed(),
            rule: mutation.current,
            mode: mutation.mode,
        })
    }

    /// Removes a command, under all of its names, from a channel's command set.
    ///
    /// A name that no longer resolves is removed literally so stale entries can be
    /// cleaned up. Removing a non-member, or from a channel without a rule, changes
    /// nothing. An `exclude` rule whose set becomes empty turns into `all`; emptying
    /// an `only` rule is rejected.
    ///
    /// # Returns
    /// - `Ok(CommandSetChange)` - Rule after the operation and whether it changed
    /// - `Err(ValidationError::WouldEmptyWhitelist)` - Last command of an `only` rule
    /// - `Err(PolicyError::Configuration)` - The stored rule is corrupt
    pub async fn remove_command_from_channel(
        &self,
        guild_id: u64,
        channel_id: u64,
        name: &str,
    ) -> Result<CommandSetChange, PolicyError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingCommandName.into());
        }

        let names: BTreeSet<String> = match self.catalog.resolve(name) {
            Some(command) => command.names().map(str::to_string).collect(),
            None => BTreeSet::from([name.to_string()]),
        };

        let mutation = self
            .store
            .mutate_channel_rule(guild_id, channel_id, &|current, _| {
                remove_commands(guild_id, channel_id, name, &names, current)
            })
            .await?;

        if mutation.changed() {
            tracing::info!(
                "Command `{}` removed from channel {} in guild {}",
                name,
                channel_id,
                guild_id
            );
        }

        Ok(CommandSetChange {
            changed: mutation.changed(),
            rule: mutation.current,
            mode: mutation.mode,
        })
    }

    /// Allows a command in every given channel without discarding anything already
    /// allowed there.
    ///
    /// Channels without a rule get an `only` rule, `only` rules gain the command,
    /// `exclude` rules stop blocking it and `all` rules are left alone. Each channel
    /// is its own atomic update; the first failure stops the run.
    ///
    /// # Arguments
    /// - `guild_id` - Guild being configured
    /// - `channel_ids` - Every channel and thread currently known to the guild
    /// - `name` - Command name or alias to allow
    ///
    /// # Returns
    /// - `Ok(BulkApplyReport)` - Channels grouped by what happened to them
    /// - `Err(PolicyError)` - First failure; earlier channels stay updated
    pub async fn bulk_apply_command_to_all_channels(
        &self,
        guild_id: u64,
        channel_ids: &[u64],
        name: &str,
    ) -> Result<BulkApplyReport, PolicyError> {
        let command = self.resolve_one(name)?;
        let mut report = BulkApplyReport::default();

        for &channel_id in channel_ids {
            let mutation = self
                .store
                .mutate_channel_rule(guild_id, channel_id, &|current, _| {
                    allow_command(guild_id, channel_id, &command, current)
                })
                .await?;

            match (&mutation.previous, mutation.changed()) {
                (None, true) => report.created.push(channel_id),
                (Some(_), true) => report.merged.push(channel_id),
                (_, false) => report.unchanged.push(channel_id),
            }
            report.mode = mutation.mode;
        }

        tracing::info!(
            "Command `{}` allowed across guild {}: {} created, {} merged, {} unchanged",
            command.canonical,
            guild_id,
            report.created.len(),
            report.merged.len(),
            report.unchanged.len()
        );

        Ok(report)
    }

    /// Returns the guild's current policy.
    pub async fn list_channel_rules(&self, guild_id: u64) -> Result<GuildPolicy, PolicyError> {
        self.store.get(guild_id).await
    }

    /// Drops the rule of a channel or thread that no longer exists.
    pub async fn forget_channel(
        &self,
        guild_id: u64,
        channel_id: u64,
    ) -> Result<RuleRemoval, PolicyError> {
        let removal = self.remove_channel_rule(guild_id, channel_id).await?;

        if matches!(removal, RuleRemoval::Removed { .. }) {
            tracing::info!(
                "Forgot command rule of deleted channel {} in guild {}",
                channel_id,
                guild_id
            );
        }

        Ok(removal)
    }

    /// Deletes the policy of a guild the bot was removed from.
    pub async fn forget_guild(&self, guild_id: u64) -> Result<(), PolicyError> {
        self.store.delete_guild(guild_id).await?;

        tracing::info!("Forgot command policy of guild {}", guild_id);

        Ok(())
    }

    fn resolve_one(&self, name: &str) -> Result<ResolvedCommand, PolicyError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingCommandName.into());
        }

        self.catalog
            .resolve(name)
            .ok_or_else(|| ValidationError::UnknownCommands(vec![name.to_string()]).into())
    }
}

fn corrupt_rule(guild_id: u64, rule: &ChannelRule, reason: &str) -> PolicyError {
    PolicyError::Configuration {
        guild_id,
        reason: format!(
            "channel {} has an invalid rule ({}); reconfigure it with channel-configure",
            rule.channel_id, reason
        ),
    }
}

fn add_command(
    guild_id: u64,
    channel_id: u64,
    command: &ResolvedCommand,
    current: Option<&ChannelRule>,
) -> Result<RuleEdit, PolicyError> {
    let Some(rule) = current else {
        return Ok(RuleEdit::Put {
            rule: ChannelRule::new(channel_id, CommandMode::Only, [command.canonical.clone()]),
            activate_whitelist: false,
        });
    };

    match &rule.cmd_mode {
        CommandMode::Invalid(reason) => Err(corrupt_rule(guild_id, rule, reason)),
        CommandMode::All => Ok(RuleEdit::Keep),
        CommandMode::Only | CommandMode::Exclude if rule.lists(command) => Ok(RuleEdit::Keep),
        CommandMode::Only | CommandMode::Exclude => {
            let mut rule = rule.clone();
            rule.allowed_commands.insert(command.canonical.clone());

            Ok(RuleEdit::Put {
                rule,
                activate_whitelist: false,
            })
        }
    }
}

fn remove_commands(
    guild_id: u64,
    channel_id: u64,
    typed_name: &str,
    names: &BTreeSet<String>,
    current: Option<&ChannelRule>,
) -> Result<RuleEdit, PolicyError> {
    let Some(rule) = current else {
        return Ok(RuleEdit::Keep);
    };

    match &rule.cmd_mode {
        CommandMode::Invalid(reason) => Err(corrupt_rule(guild_id, rule, reason)),
        CommandMode::All => Ok(RuleEdit::Keep),
        CommandMode::Only | CommandMode::Exclude => {
            let remaining: BTreeSet<String> = rule
                .allowed_commands
                .difference(names)
                .cloned()
                .collect();

            if remaining.len() == rule.allowed_commands.len() {
                return Ok(RuleEdit::Keep);
            }

            if !remaining.is_empty() {
                return Ok(RuleEdit::Put {
                    rule: ChannelRule::new(channel_id, rule.cmd_mode.clone(), remaining),
                    activate_whitelist: false,
                });
            }

            if rule.cmd_mode == CommandMode::Only {
                return Err(ValidationError::WouldEmptyWhitelist {
                    channel_id,
                    command: typed_name.to_string(),
                }
                .into());
            }

            Ok(RuleEdit::Put {
                rule: ChannelRule::new(channel_id, CommandMode::All, Vec::new()),
                activate_whitelist: false,
            })
        }
    }
}

fn allow_command(
    guild_id: u64,
    channel_id: u64,
    command: &ResolvedCommand,
    current: Option<&ChannelRule>,
) -> Result<RuleEdit, PolicyError> {
    match current.map(|rule| &rule.cmd_mode) {
        Some(CommandMode::Exclude) => {
            let names: BTreeSet<String> = command.names().map(str::to_string).collect();
            remove_commands(guild_id, channel_id, &command.canonical, &names, current)
        }
        _ => add_command(guild_id, channel_id, command, current),
    }
}
