//! Ready event handler for bot initialization.
//!
//! This module handles the `ready` event which is fired when the bot successfully
//! connects to Discord's gateway and completes the initial handshake. It logs the
//! connection and advertises the help command in the bot's activity status.

use serenity::all::{ActivityData, Context, Ready};

use crate::server::bot::handler::Handler;

/// Handles the ready event when the bot connects to Discord.
///
/// # Arguments
/// - `handler` - Bot handler providing the command prefix
/// - `ctx` - Discord context for setting activity status
/// - `ready` - Ready event data containing bot user information
pub async fn handle_ready(handler: &Handler, ctx: Context, ready: Ready) {
    tracing::info!(
        "{} is connected to Discord in {} guilds",
        ready.user.name,
        ready.guilds.len()
    );

    ctx.set_activity(Some(ActivityData::custom(format!(
        "{}help",
        handler.prefix
    ))));
}
