//! Channel event handlers that keep command policies free of deleted channels.
//!
//! When a configured channel or thread is deleted its rule is forgotten through the
//! same path as `channel-remove`, so deleting the last configured channel reopens the
//! guild instead of leaving an empty whitelist behind.

use serenity::all::{Context, GuildChannel, Message, PartialGuildChannel};

use crate::server::{bot::handler::Handler, service::policy::admin::PolicyAdminService};

/// Handles the channel_delete event when a channel is deleted from a guild.
///
/// # Arguments
/// - `handler` - Bot handler providing the policy store and catalog
/// - `_ctx` - Discord context (unused, required by event handler signature)
/// - `channel` - The deleted guild channel from Discord
/// - `_messages` - Messages that were in the channel if available (unused)
pub async fn handle_channel_delete(
    handler: &Handler,
    _ctx: Context,
    channel: GuildChannel,
    _messages: Option<Vec<Message>>,
) {
    forget(handler, channel.guild_id.get(), channel.id.get()).await;
}

/// Handles the thread_delete event when a thread is deleted.
///
/// # Arguments
/// - `handler` - Bot handler providing the policy store and catalog
/// - `_ctx` - Discord context (unused, required by event handler signature)
/// - `thread` - Identifiers of the deleted thread
/// - `_full_thread_data` - Cached thread data if available (unused)
pub async fn handle_thread_delete(
    handler: &Handler,
    _ctx: Context,
    thread: PartialGuildChannel,
    _full_thread_data: Option<GuildChannel>,
) {
    forget(handler, thread.guild_id.get(), thread.id.get()).await;
}

async fn forget(handler: &Handler, guild_id: u64, channel_id: u64) {
    let store = handler.store();
    let admin = PolicyAdminService::new(&store, &handler.catalog);

    if let Err(e) = admin.forget_channel(guild_id, channel_id).await {
        tracing::error!(
            "Failed to forget command rule of deleted channel {} in guild {}: {}",
            channel_id,
            guild_id,
            e
        );
    }
}
