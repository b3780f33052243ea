use std::time::Duration;

use crate::server::{
    data::guild_policy::{GuildPolicyRepository, PolicyStore},
    error::{
        policy::{PolicyError, ValidationError},
        AppError,
    },
    model::policy::{ChannelRule, CommandMode, PolicyMode, RuleEdit},
};
use sea_orm::{EntityTrait, PaginatorTrait};
use test_utils::{builder::TestBuilder, factory};

mod delete_guild;
mod get;
mod mutate_channel_rule;
mod with_retry;

const TIMEOUT: Duration = Duration::from_secs(2);

fn only(channel_id: u64, names: &[&str]) -> ChannelRule {
    ChannelRule::new(
        channel_id,
        CommandMode::Only,
        names.iter().map(|name| name.to_string()),
    )
}
