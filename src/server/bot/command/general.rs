//! Commands available to every member, subject to channel policy.

use std::time::Instant;

use rand::seq::IndexedRandom;
use serenity::all::{Colour, Context, CreateEmbed, CreateEmbedFooter, CreateMessage, EditMessage, Message};

use crate::server::{
    bot::handler::Handler, error::AppError, model::command::CommandSpec,
    service::catalog::CommandCatalog,
};

/// Upper bound for `rick`.
const MAX_EMOJIS: usize = 10;

pub async fn ping(ctx: &Context, message: &Message) -> Result<(), AppError> {
    let start = Instant::now();
    let mut reply = message.channel_id.say(&ctx.http, "🏓 Pong!").await?;
    let elapsed = start.elapsed().as_millis();

    reply
        .edit(ctx, EditMessage::new().content(format!("🏓 Pong! `{}ms`", elapsed)))
        .await?;

    Ok(())
}

pub async fn hello(ctx: &Context, message: &Message) -> Result<(), AppError> {
    message
        .channel_id
        .say(&ctx.http, format!("Hello! {}", message.author.display_name()))
        .await?;

    Ok(())
}

/// Sends random custom emojis of the guild the command was used in.
///
/// # Arguments
/// - `count` - Requested emoji count as typed; clamped to 1..=10, defaults to 1
pub async fn rick(ctx: &Context, message: &Message, count: Option<&str>) -> Result<(), AppError> {
    let emojis: Vec<String> = message
        .guild_id
        .and_then(|guild_id| ctx.cache.guild(guild_id))
        .map(|guild| guild.emojis.values().map(|emoji| emoji.to_string()).collect())
        .unwrap_or_default();

    let reply = if emojis.is_empty() {
        "This server has no custom emojis.".to_string()
    } else {
        pick_emojis(&emojis, rick_count(count)).join(" ")
    };

    message.channel_id.say(&ctx.http, reply).await?;

    Ok(())
}

pub async fn help(handler: &Handler, ctx: &Context, message: &Message) -> Result<(), AppError> {
    let text = help_text(&handler.catalog, &handler.prefix, &handler.moderator_role);

    message.channel_id.say(&ctx.http, text).await?;

    Ok(())
}

pub async fn info(handler: &Handler, ctx: &Context, message: &Message) -> Result<(), AppError> {
    let current_user = ctx.cache.current_user().name.clone();

    // Cache references must be dropped before the next await
    let server = message.guild_id.and_then(|guild_id| {
        ctx.cache.guild(guild_id).map(|guild| {
            (
                guild.name.clone(),
                guild.member_count,
                guild.channels.len(),
            )
        })
    });

    let mut embed = CreateEmbed::new()
        .title(format!("{} info", current_user))
        .colour(Colour::BLURPLE)
        .field("Prefix", format!("`{}`", handler.prefix), true)
        .field("Commands", handler.catalog.commands().len().to_string(), true)
        .footer(CreateEmbedFooter::new(format!(
            "Use {}help to list commands",
            handler.prefix
        )));

    if let Some((name, members, channels)) = server {
        embed = embed
            .field("Server", name, false)
            .field("Members", members.to_string(), true)
            .field("Channels", channels.to_string(), true);
    }

    message
        .channel_id
        .send_message(&ctx.http, CreateMessage::new().embed(embed))
        .await?;

    Ok(())
}

fn rick_count(requested: Option<&str>) -> usize {
    requested
        .and_then(|raw| raw.parse::<usize>().ok())
        .unwrap_or(1)
        .clamp(1, MAX_EMOJIS)
}

fn pick_emojis(emojis: &[String], count: usize) -> Vec<String> {
    let mut rng = rand::rng();

    (0..count)
        .filter_map(|_| emojis.choose(&mut rng).cloned())
        .collect()
}

/// Renders the help menu, general commands first.
fn help_text(catalog: &CommandCatalog, prefix: &str, moderator_role: &str) -> String {
    let line = |command: &CommandSpec| {
        let mut usage = format!("{}{}", prefix, command.name);
        if !command.usage.is_empty() {
            usage.push(' ');
            usage.push_str(command.usage);
        }

        let mut line = format!("`{}` - {}", usage, command.description);
        if !command.aliases.is_empty() {
            let aliases: Vec<String> = command
                .aliases
                .iter()
                .map(|alias| format!("`{}{}`", prefix, alias))
                .collect();
            line.push_str(&format!(" (aliases: {})", aliases.join(", ")));
        }
        line
    };

    let (moderator, general): (Vec<_>, Vec<_>) = catalog
        .commands()
        .iter()
        .partition(|command| command.moderator_only);

    let mut text = String::from("**Commands**\n");
    text.push_str(&general.into_iter().map(&line).collect::<Vec<_>>().join("\n"));

    if !moderator.is_empty() {
        text.push_str(&format!(
            "\n\n**Moderator commands** (requires the `{}` role)\n",
            moderator_role
        ));
        text.push_str(&moderator.into_iter().map(&line).collect::<Vec<_>>().join("\n"));
    }

    text
}
