//! Pure command authorization decisions.
//!
//! `evaluate` is a function of one invocation, one policy snapshot and one resolved
//! command. It performs no I/O and never fails: malformed stored configuration is
//! logged and denied.

use crate::server::model::{
    command::ResolvedCommand,
    policy::{CommandInvocation, CommandMode, Decision, DenyReason, GuildPolicy, PolicyMode},
};

/// Commands that are always allowed so moderators can never lock themselves out of
/// reconfiguring the policy.
pub const ADMINISTRATION_COMMANDS: &[&str] = &[
    "channel-configure",
    "channel-remove",
    "channel-list",
    "command-add",
    "command-remove",
    "command-allow-all",
    "help",
    "info",
];

/// Whether the command bypasses channel policy entirely.
pub fn is_administration_command(command: &ResolvedCommand) -> bool {
    ADMINISTRATION_COMMANDS.contains(&command.canonical.as_str())
}

/// Decides whether `command` may run where `invocation` happened.
///
/// # Arguments
/// - `invocation` - Guild, channel and typed name of the invocation
/// - `policy` - Snapshot of the guild's policy (the default policy if none is stored)
/// - `command` - The invoked command resolved through the catalog
///
/// # Returns
/// - `Decision::Allow` - The command may run
/// - `Decision::Deny(reason)` - The command must not run; `reason` selects the message
pub fn evaluate(
    invocation: &CommandInvocation,
    policy: &GuildPolicy,
    command: &ResolvedCommand,
) -> Decision {
    if is_administration_command(command) {
        return Decision::Allow;
    }

    match &policy.mode {
        PolicyMode::All => return Decision::Allow,
        PolicyMode::Whitelist => {}
        PolicyMode::Invalid(raw) => {
            tracing::warn!(
                "Guild {} has unknown policy mode '{}'; denying `{}`",
                invocation.guild_id,
                raw,
                command.canonical
            );
            return Decision::Deny(DenyReason::InvalidConfig);
        }
    }

    let Some(rule) = policy.rule_for(invocation.channel_id) else {
        return Decision::Deny(DenyReason::ChannelNotConfigured);
    };

    match &rule.cmd_mode {
        CommandMode::All => Decision::Allow,
        CommandMode::Only if rule.lists(command) => Decision::Allow,
        CommandMode::Only => Decision::Deny(DenyReason::NotWhitelisted),
        CommandMode::Exclude if rule.lists(command) => Decision::Deny(DenyReason::Blacklisted),
        CommandMode::Exclude => Decision::Allow,
        CommandMode::Invalid(reason) => {
            tracing::warn!(
                "Channel {} in guild {} has an invalid command rule ({}); denying `{}`",
                invocation.channel_id,
                invocation.guild_id,
                reason,
                command.canonical
            );
            Decision::Deny(DenyReason::InvalidConfig)
        }
    }
}
