//! Moderator commands that edit a guild's command policy.
//!
//! Each command targets the channel (or thread) it was typed in. Replies are plain
//! text; validation errors are shown to the moderator as they are.

use serenity::all::{ChannelType, Context, GuildId, Message};

use crate::server::{
    bot::handler::Handler,
    data::guild_policy::PolicyStore,
    error::{
        policy::{PolicyError, ValidationError},
        AppError,
    },
    model::policy::{
        BulkApplyReport, ChannelRule, ChannelRuleUpdate, CommandMode, CommandSetChange,
        GuildPolicy, PolicyMode, RuleRemoval,
    },
    service::policy::admin::PolicyAdminService,
};

/// Runs a policy command and replies with its outcome.
///
/// # Arguments
/// - `handler` - Bot handler holding the database and catalog
/// - `ctx` - Discord context for replies and cache access
/// - `message` - The invoking message; its channel is the target channel
/// - `name` - Canonical command name
/// - `args` - Arguments following the command name
///
/// # Returns
/// - `Ok(())` - A reply was sent, including for rejected requests
/// - `Err(AppError)` - The reply could not be sent
pub async fn run(
    handler: &Handler,
    ctx: &Context,
    message: &Message,
    name: &str,
    args: &[&str],
) -> Result<(), AppError> {
    let Some(guild) = message.guild_id else {
        message
            .channel_id
            .say(&ctx.http, format!("❌ {}", ValidationError::GuildOnly))
            .await?;
        return Ok(());
    };

    let guild_id = guild.get();
    let channel_id = message.channel_id.get();
    let typed = args.first().copied().unwrap_or_default();

    let store = handler.store();
    let admin = PolicyAdminService::new(&store, &handler.catalog);

    let result = match name {
        "channel-configure" => configure(&admin, guild_id, channel_id, args).await,
        "channel-remove" => admin
            .remove_channel_rule(guild_id, channel_id)
            .await
            .map(|removal| format_removal(channel_id, &removal)),
        "channel-list" => admin
            .list_channel_rules(guild_id)
            .await
            .map(|policy| format_policy(&policy)),
        "command-add" => admin
            .add_command_to_channel(guild_id, channel_id, typed)
            .await
            .map(|change| format_added(channel_id, typed, &change)),
        "command-remove" => admin
            .remove_command_from_channel(guild_id, channel_id, typed)
            .await
            .map(|change| format_removed(channel_id, typed, &change)),
        "command-allow-all" => {
            let channel_ids = guild_channel_ids(ctx, guild);
            admin
                .bulk_apply_command_to_all_channels(guild_id, &channel_ids, typed)
                .await
                .map(|report| format_bulk(typed, &report))
        }
        other => {
            tracing::warn!("No handler registered for command `{}`", other);
            return Ok(());
        }
    };

    let reply = match result {
        Ok(reply) => reply,
        Err(err) => error_reply(name, guild_id, err),
    };

    message.channel_id.say(&ctx.http, reply).await?;

    Ok(())
}

async fn configure<S: PolicyStore + ?Sized>(
    admin: &PolicyAdminService<'_, S>,
    guild_id: u64,
    channel_id: u64,
    args: &[&str],
) -> Result<String, PolicyError> {
    let (cmd_mode, names) = parse_configure_args(args)?;

    let update = admin
        .set_channel_rule(guild_id, channel_id, cmd_mode, &names)
        .await?;

    Ok(format_update(&update))
}

/// Splits `channel-configure` arguments into a mode and command names.
///
/// Names may be separated by spaces, commas, or both.
fn parse_configure_args(args: &[&str]) -> Result<(CommandMode, Vec<String>), ValidationError> {
    let Some((mode, names)) = args.split_first() else {
        return Err(ValidationError::MissingMode);
    };

    let cmd_mode = CommandMode::from_user_input(mode)
        .ok_or_else(|| ValidationError::UnknownMode(mode.to_string()))?;

    let names = names
        .iter()
        .flat_map(|arg| arg.split(','))
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect();

    Ok((cmd_mode, names))
}

/// Text channels, announcement channels and active threads of a cached guild.
fn guild_channel_ids(ctx: &Context, guild_id: GuildId) -> Vec<u64> {
    let Some(guild) = ctx.cache.guild(guild_id) else {
        tracing::warn!("Guild {} is not cached; no channels to update", guild_id);
        return Vec::new();
    };

    let mut channel_ids: Vec<u64> = guild
        .channels
        .values()
        .filter(|channel| matches!(channel.kind, ChannelType::Text | ChannelType::News))
        .chain(guild.threads.iter())
        .map(|channel| channel.id.get())
        .collect();

    channel_ids.sort_unstable();
    channel_ids.dedup();
    channel_ids
}

fn error_reply(command: &str, guild_id: u64, err: PolicyError) -> String {
    match err {
        PolicyError::Validation(err) => format!("❌ {}", err),
        err @ PolicyError::Configuration { .. } => format!("⚠️ {}", err),
        PolicyError::StoreUnavailable(reason) => {
            tracing::error!(
                "`{}` in guild {} failed, policy store unavailable: {}",
                command,
                guild_id,
                reason
            );
            "⚠️ Command permissions could not be saved right now, please try again shortly."
                .to_string()
        }
        PolicyError::Database(err) => {
            tracing::error!("`{}` in guild {} failed: {}", command, guild_id, err);
            "⚠️ Something went wrong while updating command permissions.".to_string()
        }
    }
}

fn format_names<'a>(names: impl IntoIterator<Item = &'a String>) -> String {
    names
        .into_iter()
        .map(|name| format!("`{}`", name))
        .collect::<Vec<_>>()
        .join(", ")
}

fn describe_rule(rule: &ChannelRule) -> String {
    match &rule.cmd_mode {
        CommandMode::All => "all commands".to_string(),
        CommandMode::Only => format!("only {}", format_names(&rule.allowed_commands)),
        CommandMode::Exclude => format!(
            "all commands except {}",
            format_names(&rule.allowed_commands)
        ),
        CommandMode::Invalid(reason) => format!("nothing (invalid rule: {})", reason),
    }
}

fn format_update(update: &ChannelRuleUpdate) -> String {
    let mut reply = format!(
        "✅ <#{}> now runs {}.",
        update.rule.channel_id,
        describe_rule(&update.rule)
    );

    if let Some(previous) = &update.previous {
        reply.push_str(&format!(" Previously: {}.", describe_rule(previous)));
    }

    reply
}

fn format_removal(channel_id: u64, removal: &RuleRemoval) -> String {
    match removal {
        RuleRemoval::Removed {
            reverted_to_open: true,
            ..
        } => format!(
            "✅ Removed the command rule for <#{}>. No channels are configured any more, so commands work everywhere again.",
            channel_id
        ),
        RuleRemoval::Removed { .. } => {
            format!("✅ Removed the command rule for <#{}>.", channel_id)
        }
        RuleRemoval::NotConfigured => format!("ℹ️ <#{}> has no command rule.", channel_id),
    }
}

const INACTIVE_NOTE: &str =
    " Commands still run everywhere until a channel is configured with `channel-configure`.";

fn format_policy(policy: &GuildPolicy) -> String {
    if policy.channel_rules.is_empty() {
        return match &policy.mode {
            PolicyMode::All => {
                "ℹ️ No channels are configured; commands work in every channel.".to_string()
            }
            _ => "⚠️ No usable channel rules are stored; commands are blocked in every channel until one is configured with `channel-configure`.".to_string(),
        };
    }

    let header = match &policy.mode {
        PolicyMode::Whitelist => "**Command policy:** commands only run in these channels:".to_string(),
        PolicyMode::All => {
            "**Command policy:** unrestricted. These rules are saved but inactive until a channel is configured:"
                .to_string()
        }
        PolicyMode::Invalid(raw) => format!(
            "⚠️ **Command policy:** unknown mode `{}`; commands are blocked until a channel is configured:",
            raw
        ),
    };

    let lines: Vec<String> = policy
        .channel_rules
        .iter()
        .map(|rule| format!("• <#{}>: {}", rule.channel_id, describe_rule(rule)))
        .collect();

    format!("{}\n{}", header, lines.join("\n"))
}

fn format_added(channel_id: u64, typed: &str, change: &CommandSetChange) -> String {
    match &change.rule {
        Some(rule) if change.changed => {
            let mut reply = format!(
                "✅ Added `{}` to <#{}>; it now runs {}.",
                typed,
                channel_id,
                describe_rule(rule)
            );
            if change.mode == PolicyMode::All {
                reply.push_str(INACTIVE_NOTE);
            }
            reply
        }
        Some(rule) if rule.cmd_mode == CommandMode::All => {
            format!("ℹ️ <#{}> already allows every command.", channel_id)
        }
        _ => format!("ℹ️ `{}` is already listed for <#{}>.", typed, channel_id),
    }
}

fn format_removed(channel_id: u64, typed: &str, change: &CommandSetChange) -> String {
    match &change.rule {
        Some(rule) if change.changed => format!(
            "✅ Removed `{}` from <#{}>; it now runs {}.",
            typed,
            channel_id,
            describe_rule(rule)
        ),
        _ => format!("ℹ️ `{}` is not listed for <#{}>.", typed, channel_id),
    }
}

fn format_bulk(typed: &str, report: &BulkApplyReport) -> String {
    let total = report.created.len() + report.merged.len() + report.unchanged.len();

    let mut reply = format!(
        "✅ Allowed `{}` in {} channels: {} new rules, {} updated, {} already allowed it.",
        typed,
        total,
        report.created.len(),
        report.merged.len(),
        report.unchanged.len()
    );

    let applied = report.created.len() + report.merged.len();
    if applied > 0 && report.mode == PolicyMode::All {
        reply.push_str(INACTIVE_NOTE);
    }

    reply
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(channel_id: u64, cmd_mode: CommandMode, names: &[&str]) -> ChannelRule {
        ChannelRule::new(channel_id, cmd_mode, names.iter().map(|n| n.to_string()))
    }

    #[test]
    fn parses_mode_and_comma_separated_names() {
        let (mode, names) = parse_configure_args(&["Only", "ping,help", "rick"]).unwrap();

        assert_eq!(mode, CommandMode::Only);
        assert_eq!(names, vec!["ping", "help", "rick"]);
    }

    #[test]
    fn rejects_missing_or_unknown_mode() {
        assert_eq!(parse_configure_args(&[]), Err(ValidationError::MissingMode));
        assert_eq!(
            parse_configure_args(&["some", "ping"]),
            Err(ValidationError::UnknownMode("some".to_string()))
        );
    }

    #[test]
    fn describes_each_rule_mode() {
        assert_eq!(describe_rule(&rule(1, CommandMode::All, &[])), "all commands");
        assert_eq!(
            describe_rule(&rule(1, CommandMode::Only, &["ping", "help"])),
            "only `help`, `ping`"
        );
        assert_eq!(
            describe_rule(&rule(1, CommandMode::Exclude, &["rick"])),
            "all commands except `rick`"
        );
    }

    #[test]
    fn lists_rules_with_mode_header() {
        let policy = GuildPolicy {
            mode: PolicyMode::Whitelist,
            channel_rules: vec![
                rule(10, CommandMode::Only, &["ping"]),
                rule(20, CommandMode::All, &[]),
            ],
        };

        let reply = format_policy(&policy);

        assert_eq!(
            reply,
            "**Command policy:** commands only run in these channels:\n\
             • <#10>: only `ping`\n\
             • <#20>: all commands"
        );
    }

    #[test]
    fn reports_empty_policy() {
        let reply = format_policy(&GuildPolicy::default());

        assert!(reply.contains("No channels are configured"));
    }

    #[test]
    fn mentions_reopened_guild_on_last_removal() {
        let removal = RuleRemoval::Removed {
            rule: rule(10, CommandMode::Only, &["ping"]),
            reverted_to_open: true,
        };

        assert!(format_removal(10, &removal).contains("commands work everywhere again"));
        assert_eq!(
            format_removal(10, &RuleRemoval::NotConfigured),
            "ℹ️ <#10> has no command rule."
        );
    }

    #[test]
    fn distinguishes_unchanged_additions() {
        let all = CommandSetChange {
            rule: Some(rule(10, CommandMode::All, &[])),
            changed: false,
            mode: PolicyMode::Whitelist,
        };
        let listed = CommandSetChange {
            rule: Some(rule(10, CommandMode::Only, &["ping"])),
            changed: false,
            mode: PolicyMode::Whitelist,
        };

        assert_eq!(
            format_added(10, "ping", &all),
            "ℹ️ <#10> already allows every command."
        );
        assert_eq!(
            format_added(10, "p", &listed),
            "ℹ️ `p` is already listed for <#10>."
        );
    }

    #[test]
    fn summarizes_bulk_report() {
        let report = BulkApplyReport {
            created: vec![1, 2],
            merged: vec![3],
            unchanged: vec![],
            mode: PolicyMode::Whitelist,
        };

        assert_eq!(
            format_bulk("ping", &report),
            "✅ Allowed `ping` in 3 channels: 2 new rules, 1 updated, 0 already allowed it."
        );
    }

    #[test]
    fn warns_that_rules_are_inactive_in_unrestricted_guild() {
        let added = CommandSetChange {
            rule: Some(rule(10, CommandMode::Only, &["ping"])),
            changed: true,
            mode: PolicyMode::All,
        };
        let bulk = BulkApplyReport {
            created: vec![1],
            merged: vec![],
            unchanged: vec![2],
            mode: PolicyMode::All,
        };

        assert!(format_added(10, "ping", &added).ends_with(INACTIVE_NOTE));
        assert!(format_bulk("ping", &bulk).ends_with(INACTIVE_NOTE));
    }

    #[test]
    fn omits_inactive_note_when_nothing_applied_or_whitelisted() {
        let whitelisted = CommandSetChange {
            rule: Some(rule(10, CommandMode::Only, &["ping"])),
            changed: true,
            mode: PolicyMode::Whitelist,
        };
        let unchanged = BulkApplyReport {
            unchanged: vec![1, 2],
            ..BulkApplyReport::default()
        };

        assert!(!format_added(10, "ping", &whitelisted).contains("channel-configure"));
        assert!(!format_bulk("ping", &unchanged).contains("channel-configure"));
    }

    #[test]
    fn reports_whitelist_without_usable_rules_as_blocked() {
        let policy = GuildPolicy {
            mode: PolicyMode::Whitelist,
            channel_rules: Vec::new(),
        };

        assert!(format_policy(&policy).contains("blocked in every channel"));
        assert_eq!(
            format_policy(&GuildPolicy::default()),
            "ℹ️ No channels are configured; commands work in every channel."
        );
    }

    #[test]
    fn shows_validation_errors_verbatim() {
        let reply = error_reply(
            "command-add",
            1,
            ValidationError::UnknownCommands(vec!["dance".to_string()]).into(),
        );

        assert_eq!(reply, "❌ These commands were not found: `dance`");
    }
}
