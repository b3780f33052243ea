//! Discord bot integration for per-channel command authorization.
//!
//! The bot answers prefix commands in guild channels and direct messages. Each guild
//! command is resolved through the command catalog and checked against the guild's
//! command policy before it runs; moderators edit that policy with the
//! `channel-*` and `command-*` commands. Channel, thread and guild deletions are
//! used to drop rules that can no longer apply.
//!
//! The bot is initialized during startup and runs in a separate tokio task so it does
//! not block the HTTP API.
//!
//! # Gateway Intents
//!
//! The bot requires the following gateway intents:
//! - `GUILDS` - Guild, channel, thread and role data for the cache and deletion events
//! - `GUILD_MESSAGES` - Messages in guild channels
//! - `GUILD_EMOJIS_AND_STICKERS` - Keeps custom emojis in the cache current
//! - `DIRECT_MESSAGES` - Messages sent to the bot directly
//! - `MESSAGE_CONTENT` - Message text, needed to read prefix commands (privileged intent)
//!
//! Note: `MESSAGE_CONTENT` is a privileged intent and must be explicitly enabled
//! in the Discord Developer Portal for the bot application.

pub mod command;
pub mod handler;
pub mod start;
