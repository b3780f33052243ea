//! Domain models for per-guild command policies.
//!
//! A guild policy decides which commands may run in which channels. Policies are
//! read from two tables (`guild_command_policy` and `channel_command_rule`) and
//! converted here at the repository boundary. Stored modes are kept as strings in
//! the database so that unknown values survive the round trip and can be detected
//! as invalid configuration instead of silently defaulting.

use std::collections::BTreeSet;
use std::fmt;

use serde_json::Value;

use crate::model::policy::{ChannelRuleDto, GuildPolicyDto};
use crate::server::model::command::ResolvedCommand;

/// Guild-wide restriction mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PolicyMode {
    /// No restriction; channel rules are inactive configuration.
    #[default]
    All,
    /// Only channels with a rule may run commands.
    Whitelist,
    /// Unrecognized stored value, kept verbatim for logging.
    Invalid(String),
}

impl PolicyMode {
    /// Parses a stored mode string. Unknown values become `Invalid`.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "all" => Self::All,
            "whitelist" => Self::Whitelist,
            other => Self::Invalid(other.to_string()),
        }
    }

    /// Returns the stored string form of the mode.
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => "all",
            Self::Whitelist => "whitelist",
            Self::Invalid(raw) => raw,
        }
    }
}

impl fmt::Display for PolicyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-channel command filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandMode {
    /// Every command is allowed in the channel.
    All,
    /// Only the listed commands are allowed.
    Only,
    /// Every command except the listed ones is allowed.
    Exclude,
    /// Corrupt stored rule; carries a description of what was wrong.
    Invalid(String),
}

impl CommandMode {
    /// Parses a stored mode string. Unknown values become `Invalid`.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "all" => Self::All,
            "only" => Self::Only,
            "exclude" => Self::Exclude,
            other => Self::Invalid(format!("unknown command mode '{}'", other)),
        }
    }

    /// Parses a mode typed by a moderator. Never yields `Invalid`.
    pub fn from_user_input(input: &str) -> Option<Self> {
        match input.to_ascii_lowercase().as_str() {
            "all" => Some(Self::All),
            "only" => Some(Self::Only),
            "exclude" => Some(Self::Exclude),
            _ => None,
        }
    }

    /// Returns the stored string form of the mode.
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => "all",
            Self::Only => "only",
            Self::Exclude => "exclude",
            Self::Invalid(_) => "invalid",
        }
    }

    /// Whether the mode needs a non-empty command set.
    pub fn requires_commands(&self) -> bool {
        matches!(self, Self::Only | Self::Exclude)
    }
}

impl fmt::Display for CommandMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Policy entry governing command execution in one channel or thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelRule {
    /// Discord channel or thread ID.
    pub channel_id: u64,
    /// How `allowed_commands` is interpreted.
    pub cmd_mode: CommandMode,
    /// Canonical command names. Empty for `All`, non-empty for `Only`/`Exclude`.
    pub allowed_commands: BTreeSet<String>,
}

impl ChannelRule {
    /// Creates a rule from already-resolved canonical names.
    pub fn new<I>(channel_id: u64, cmd_mode: CommandMode, allowed_commands: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            channel_id,
            cmd_mode,
            allowed_commands: allowed_commands.into_iter().collect(),
        }
    }

    /// Converts a rule row into a domain model at the repository boundary.
    ///
    /// Rows that violate the rule invariants (unknown mode, a command list that is
    /// not an array of strings, `only`/`exclude` with no commands, `all` with
    /// commands) are returned with `CommandMode::Invalid` so evaluation fails closed.
    ///
    /// # Arguments
    /// - `entity` - The rule row from the database
    ///
    /// # Returns
    /// - `Some(ChannelRule)` - Converted rule, possibly marked invalid
    /// - `None` - The stored channel ID is not a snowflake and can never match
    pub fn from_entity(entity: entity::channel_command_rule::Model) -> Option<Self> {
        let Ok(channel_id) = entity.channel_id.parse::<u64>() else {
            tracing::warn!(
                "Skipping command rule with malformed channel id '{}' in guild {}",
                entity.channel_id,
                entity.guild_id
            );
            return None;
        };

        let Some(allowed_commands) = parse_command_list(&entity.allowed_commands) else {
            return Some(Self {
                channel_id,
                cmd_mode: CommandMode::Invalid(format!(
                    "malformed command list {}",
                    entity.allowed_commands
                )),
                allowed_commands: BTreeSet::new(),
            });
        };

        let cmd_mode = match CommandMode::parse(&entity.cmd_mode) {
            mode if mode.requires_commands() && allowed_commands.is_empty() => {
                CommandMode::Invalid(format!("'{}' rule without commands", mode))
            }
            CommandMode::All if !allowed_commands.is_empty() => {
                CommandMode::Invalid("'all' rule with a command list".to_string())
            }
            mode => mode,
        };

        Some(Self {
            channel_id,
            cmd_mode,
            allowed_commands,
        })
    }

    /// Whether the command's canonical name or any alias is in the rule's set.
    pub fn lists(&self, command: &ResolvedCommand) -> bool {
        command
            .names()
            .any(|name| self.allowed_commands.contains(name))
    }

    /// Serializes the command set into the stored JSON array.
    pub fn allowed_commands_json(&self) -> Value {
        Value::Array(
            self.allowed_commands
                .iter()
                .cloned()
                .map(Value::String)
                .collect(),
        )
    }

    /// Converts the rule into its API representation.
    pub fn into_dto(self) -> ChannelRuleDto {
        ChannelRuleDto {
            channel_id: self.channel_id.to_string(),
            cmd_mode: self.cmd_mode.to_string(),
            allowed_commands: self.allowed_commands.into_iter().collect(),
        }
    }
}

fn parse_command_list(value: &Value) -> Option<BTreeSet<String>> {
    value
        .as_array()?
        .iter()
        .map(|name| name.as_str().map(str::to_string))
        .collect()
}

/// Command policy of one guild.
///
/// The default value (`All`, no rules) is the implicit zero-config policy of a
/// guild that has never been configured.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuildPolicy {
    pub mode: PolicyMode,
    /// Rules in creation order, unique by channel ID.
    pub channel_rules: Vec<ChannelRule>,
}

impl GuildPolicy {
    /// Converts the guild row and its rule rows into a domain model.
    ///
    /// A stored whitelist with no rule rows at all is read as `All`: an empty
    /// whitelist means "no restriction", never "allow nothing".
    ///
    /// # Arguments
    /// - `guild` - The guild policy row
    /// - `rules` - The guild's rule rows, already in display order
    pub fn from_entities(
        guild: entity::guild_command_policy::Model,
        rules: Vec<entity::channel_command_rule::Model>,
    ) -> Self {
        let stored_rules = rules.len();
        let channel_rules: Vec<ChannelRule> = rules
            .into_iter()
            .filter_map(ChannelRule::from_entity)
            .collect();

        let mode = match PolicyMode::parse(&guild.mode) {
            PolicyMode::Whitelist if stored_rules == 0 => {
                tracing::warn!(
                    "Guild {} has an empty whitelist; treating it as unrestricted",
                    guild.guild_id
                );
                PolicyMode::All
            }
            mode => mode,
        };

        Self {
            mode,
            channel_rules,
        }
    }

    /// Finds the rule for a channel.
    pub fn rule_for(&self, channel_id: u64) -> Option<&ChannelRule> {
        self.channel_rules
            .iter()
            .find(|rule| rule.channel_id == channel_id)
    }

    /// Converts the policy into its API representation.
    pub fn into_dto(self, guild_id: u64) -> GuildPolicyDto {
        GuildPolicyDto {
            guild_id: guild_id.to_string(),
            mode: self.mode.to_string(),
            channel_rules: self
                .channel_rules
                .into_iter()
                .map(ChannelRule::into_dto)
                .collect(),
        }
    }
}

/// A command invocation as seen by the policy gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    pub guild_id: u64,
    pub channel_id: u64,
    /// The literal token that triggered the command; may be an alias.
    pub invoked_name: String,
    pub is_thread: bool,
}

/// Outcome of a policy evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Why a command was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// Guild is in whitelist mode and the channel has no rule.
    ChannelNotConfigured,
    /// Channel is in `only` mode and the command is not listed.
    NotWhitelisted,
    /// Channel is in `exclude` mode and the command is listed.
    Blacklisted,
    /// Stored policy is malformed; denied for safety.
    InvalidConfig,
    /// Policy could not be read; denied for safety.
    StoreUnavailable,
}

impl DenyReason {
    /// Stable machine-readable reason code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ChannelNotConfigured => "channel-not-configured",
            Self::NotWhitelisted => "not-whitelisted",
            Self::Blacklisted => "blacklisted",
            Self::InvalidConfig => "invalid-config",
            Self::StoreUnavailable => "store-unavailable",
        }
    }

    /// User-facing refusal message for this reason.
    ///
    /// # Arguments
    /// - `invoked_name` - The name the user typed, shown back to them
    pub fn user_message(&self, invoked_name: &str) -> String {
        match self {
            Self::ChannelNotConfigured => {
                "🚫 This channel is not configured for bot commands.".to_string()
            }
            Self::NotWhitelisted => format!(
                "🚫 `{}` is not enabled in this channel. Please use it in an allowed channel.",
                invoked_name
            ),
            Self::Blacklisted => format!("🚫 `{}` is disabled in this channel.", invoked_name),
            Self::InvalidConfig => {
                "⚠️ This channel has an invalid command configuration; blocking for safety."
                    .to_string()
            }
            Self::StoreUnavailable => {
                "⚠️ Command permissions could not be checked right now, please try again shortly."
                    .to_string()
            }
        }
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Change a mutator asks the store to apply to one channel's rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleEdit {
    /// Leave the rule as it is; nothing is written.
    Keep,
    /// Create or replace the rule as a unit.
    Put {
        rule: ChannelRule,
        /// Switch the guild to whitelist mode in the same update.
        activate_whitelist: bool,
    },
    /// Delete the rule. The guild reverts to `All` when no rules remain.
    Delete,
}

/// Result of a keyed rule mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMutation {
    /// Rule before the mutation.
    pub previous: Option<ChannelRule>,
    /// Rule after the mutation.
    pub current: Option<ChannelRule>,
    /// Guild mode after the mutation.
    pub mode: PolicyMode,
}

impl RuleMutation {
    /// Whether the channel's rule differs from before.
    pub fn changed(&self) -> bool {
        self.previous != self.current
    }
}

/// Result of configuring a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelRuleUpdate {
    /// Rule that was replaced, if the channel was already configured.
    pub previous: Option<ChannelRule>,
    pub rule: ChannelRule,
}

/// Result of removing a channel's rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleRemoval {
    Removed {
        rule: ChannelRule,
        /// The last rule was removed and the guild is unrestricted again.
        reverted_to_open: bool,
    },
    NotConfigured,
}

/// Result of adding or removing one command in a channel's set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSetChange {
    /// Channel rule after the operation.
    pub rule: Option<ChannelRule>,
    /// Whether anything was written.
    pub changed: bool,
    /// Guild mode after the operation.
    pub mode: PolicyMode,
}

/// Per-channel outcome of allowing a command across a guild.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkApplyReport {
    /// Channels that received a new `only` rule.
    pub created: Vec<u64>,
    /// Channels whose existing rule was changed.
    pub merged: Vec<u64>,
    /// Channels that already allowed the command.
    pub unchanged: Vec<u64>,
    /// Guild mode after the operation.
    pub mode: PolicyMode,
}
