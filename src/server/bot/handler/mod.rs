use std::sync::Arc;
use std::time::Duration;

use sea_orm::DatabaseConnection;
use serenity::all::{
    Context, EventHandler, Guild, GuildChannel, Message, PartialGuildChannel, Ready,
    UnavailableGuild,
};
use serenity::async_trait;

use crate::server::{
    config::Config, data::guild_policy::GuildPolicyRepository, service::catalog::CommandCatalog,
};

pub mod channel;
pub mod guild;
pub mod message;
pub mod ready;

/// Discord bot event handler
pub struct Handler {
    pub db: DatabaseConnection,
    pub catalog: Arc<CommandCatalog>,
    pub prefix: String,
    pub moderator_role: String,
    pub store_timeout: Duration,
}

impl Handler {
    pub fn new(config: &Config, db: DatabaseConnection, catalog: Arc<CommandCatalog>) -> Self {
        Self {
            db,
            catalog,
            prefix: config.command_prefix.clone(),
            moderator_role: config.moderator_role.clone(),
            store_timeout: config.store_timeout,
        }
    }

    /// Policy store over the bot's database connection.
    pub fn store(&self) -> GuildPolicyRepository<'_> {
        GuildPolicyRepository::new(&self.db, self.store_timeout)
    }
}

#[async_trait]
impl EventHandler for Handler {
    /// Called when the bot is ready and connected to Discord
    async fn ready(&self, ctx: Context, ready: Ready) {
        ready::handle_ready(self, ctx, ready).await;
    }

    /// Called when a message is sent in a channel
    async fn message(&self, ctx: Context, message: Message) {
        message::handle_message(self, ctx, message).await;
    }

    /// Called when a channel is deleted from a guild
    async fn channel_delete(
        &self,
        ctx: Context,
        channel: GuildChannel,
        messages: Option<Vec<Message>>,
    ) {
        channel::handle_channel_delete(self, ctx, channel, messages).await;
    }

    /// Called when a thread is deleted
    async fn thread_delete(
        &self,
        ctx: Context,
        thread: PartialGuildChannel,
        full_thread_data: Option<GuildChannel>,
    ) {
        channel::handle_thread_delete(self, ctx, thread, full_thread_data).await;
    }

    /// Called when the bot leaves a guild or the guild becomes unavailable
    async fn guild_delete(&self, ctx: Context, incomplete: UnavailableGuild, full: Option<Guild>) {
        guild::handle_guild_delete(self, ctx, incomplete, full).await;
    }
}
