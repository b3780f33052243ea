use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A guild's command policy as returned by `GET /api/guilds/{guild_id}/policy`.
///
/// Snowflake IDs are serialized as strings since they exceed the integer precision
/// of JavaScript clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GuildPolicyDto {
    pub guild_id: String,
    pub mode: String,
    pub channel_rules: Vec<ChannelRuleDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ChannelRuleDto {
    pub channel_id: String,
    pub cmd_mode: String,
    pub allowed_commands: Vec<String>,
}
