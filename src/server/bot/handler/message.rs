//! Message handler: prefix command parsing, policy gate and dispatch.
//!
//! Every guild command passes the policy gate before it runs. Moderator commands are
//! additionally restricted to members holding a role whose name contains the
//! configured moderator role. Direct messages have no guild policy and skip the gate.

use serenity::all::{ChannelId, Context, GuildId, Message, RoleId};

use crate::server::{
    bot::{command, handler::Handler},
    error::{policy::ValidationError, AppError},
    model::{
        command::ResolvedCommand,
        policy::{CommandInvocation, Decision},
    },
    service::policy::gate::PolicyGate,
};

/// Handle message creation in a channel
pub async fn handle_message(handler: &Handler, ctx: Context, message: Message) {
    if message.author.bot {
        return;
    }

    let Some(parsed) = command::parse(&message.content, &handler.prefix) else {
        return;
    };

    let Some(resolved) = handler.catalog.resolve(parsed.name) else {
        tracing::debug!("Ignoring unknown command `{}`", parsed.name);
        return;
    };

    if let Err(e) =
        authorize_and_run(handler, &ctx, &message, &resolved, parsed.name, &parsed.args).await
    {
        tracing::error!(
            "Command `{}` in channel {} failed: {}",
            resolved.canonical,
            message.channel_id,
            e
        );

        if let Err(e) = message
            .channel_id
            .say(&ctx.http, "⚠️ Something went wrong while running that command.")
            .await
        {
            tracing::error!("Failed to send error reply: {}", e);
        }
    }
}

async fn authorize_and_run(
    handler: &Handler,
    ctx: &Context,
    message: &Message,
    resolved: &ResolvedCommand,
    invoked_name: &str,
    args: &[&str],
) -> Result<(), AppError> {
    let Some(guild_id) = message.guild_id else {
        if resolved.moderator_only {
            message
                .channel_id
                .say(&ctx.http, format!("❌ {}", ValidationError::GuildOnly))
                .await?;
            return Ok(());
        }

        return command::run(handler, ctx, message, resolved, args).await;
    };

    let invocation = CommandInvocation {
        guild_id: guild_id.get(),
        channel_id: message.channel_id.get(),
        invoked_name: invoked_name.to_string(),
        is_thread: is_thread(ctx, guild_id, message.channel_id),
    };

    let store = handler.store();
    if let Decision::Deny(reason) = PolicyGate::new(&store).evaluate(&invocation, resolved).await {
        tracing::info!(
            "Denied `{}` in channel {} of guild {}: {}",
            invoked_name,
            invocation.channel_id,
            invocation.guild_id,
            reason
        );

        message
            .channel_id
            .say(&ctx.http, reason.user_message(invoked_name))
            .await?;
        return Ok(());
    }

    if resolved.moderator_only && !is_moderator(handler, ctx, message, guild_id).await? {
        message
            .channel_id
            .say(
                &ctx.http,
                format!(
                    "🚫 You need the `{}` role to use `{}`.",
                    handler.moderator_role, invoked_name
                ),
            )
            .await?;
        return Ok(());
    }

    command::run(handler, ctx, message, resolved, args).await
}

/// Whether the channel is a thread known to the guild cache.
fn is_thread(ctx: &Context, guild_id: GuildId, channel_id: ChannelId) -> bool {
    ctx.cache
        .guild(guild_id)
        .map(|guild| guild.threads.iter().any(|thread| thread.id == channel_id))
        .unwrap_or(false)
}

async fn is_moderator(
    handler: &Handler,
    ctx: &Context,
    message: &Message,
    guild_id: GuildId,
) -> Result<bool, AppError> {
    let role_ids = match &message.member {
        Some(member) => member.roles.clone(),
        None => guild_id.member(ctx, message.author.id).await?.roles,
    };

    let role_names = cached_role_names(ctx, guild_id, &role_ids);

    Ok(holds_moderator_role(&role_names, &handler.moderator_role))
}

fn cached_role_names(ctx: &Context, guild_id: GuildId, role_ids: &[RoleId]) -> Vec<String> {
    let Some(guild) = ctx.cache.guild(guild_id) else {
        tracing::warn!("Guild {} is not cached; cannot resolve member roles", guild_id);
        return Vec::new();
    };

    role_ids
        .iter()
        .filter_map(|role_id| guild.roles.get(role_id))
        .map(|role| role.name.clone())
        .collect()
}

/// Case-insensitive match of any role name against the moderator role.
fn holds_moderator_role(role_names: &[String], moderator_role: &str) -> bool {
    let moderator_role = moderator_role.to_lowercase();

    role_names
        .iter()
        .any(|name| name.to_lowercase().contains(&moderator_role))
}
