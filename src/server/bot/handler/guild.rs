//! Guild event handlers.
//!
//! `guild_delete` fires both when the bot is removed from a guild and when a guild
//! becomes temporarily unavailable during a Discord outage. Only the former drops the
//! guild's command policy.

use serenity::all::{Context, Guild, UnavailableGuild};

use crate::server::{bot::handler::Handler, service::policy::admin::PolicyAdminService};

/// Handles the guild_delete event when the bot leaves a guild or it becomes unavailable.
///
/// # Arguments
/// - `handler` - Bot handler providing the policy store and catalog
/// - `_ctx` - Discord context (unused, required by event handler signature)
/// - `incomplete` - Guild ID and whether the guild merely became unavailable
/// - `_full` - Cached guild data if available (unused)
pub async fn handle_guild_delete(
    handler: &Handler,
    _ctx: Context,
    incomplete: UnavailableGuild,
    _full: Option<Guild>,
) {
    let guild_id = incomplete.id.get();

    if incomplete.unavailable {
        tracing::warn!("Guild {} became unavailable; keeping its command policy", guild_id);
        return;
    }

    let store = handler.store();
    let admin = PolicyAdminService::new(&store, &handler.catalog);

    if let Err(e) = admin.forget_guild(guild_id).await {
        tracing::error!("Failed to delete command policy of guild {}: {}", guild_id, e);
    }
}
