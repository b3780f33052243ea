use std::time::Duration;

use async_trait::async_trait;
use sea_orm::EntityTrait;
use test_utils::{builder::TestBuilder, factory};

use crate::server::{
    data::guild_policy::{GuildPolicyRepository, PolicyStore, RuleMutator},
    error::{
        policy::{PolicyError, ValidationError},
        AppError,
    },
    model::{
        command::CommandSpec,
        policy::{
            ChannelRule, CommandInvocation, CommandMode, Decision, DenyReason, GuildPolicy,
            PolicyMode, RuleMutation, RuleRemoval,
        },
    },
    service::{
        catalog::CommandCatalog,
        policy::{admin::PolicyAdminService, gate::PolicyGate},
    },
};


const TIMEOUT: Duration = Duration::from_secs(2);
const GUILD: u64 = 42;

fn spec(name: &'static str, aliases: &'static [&'static str]) -> CommandSpec {
    CommandSpec {
        name,
        aliases,
        usage: "",
        description: "",
        moderator_only: false,
    }
}

fn catalog() -> CommandCatalog {
    CommandCatalog::new(vec![
        spec("ping", &["p", "pong"]),
        spec("hello", &["hi"]),
        spec("rick", &["roll"]),
        spec("help", &["h"]),
        spec("channel-list", &[]),
    ])
    .unwrap()
}

fn names(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

fn rule(channel_id: u64, cmd_mode: CommandMode, commands: &[&str]) -> ChannelRule {
    ChannelRule::new(channel_id, cmd_mode, names(commands))
}

/// Runs the pre-dispatch check for a typed name in a channel of `GUILD`.
async fn check<S: PolicyStore + ?Sized>(
    store: &S,
    catalog: &CommandCatalog,
    channel_id: u64,
    typed: &str,
) -> Decision {
    let command = catalog.resolve(typed).unwrap();
    let invocation = CommandInvocation {
        guild_id: GUILD,
        channel_id,
        invoked_name: typed.to_string(),
        is_thread: false,
    };

    PolicyGate::new(store).evaluate(&invocation, &command).await
}

/// Store whose database is never reachable.
struct UnavailableStore;

#[async_trait]
impl PolicyStore for UnavailableStore {
    async fn get(&self, _guild_id: u64) -> Result<GuildPolicy, PolicyError> {
        Err(PolicyError::StoreUnavailable("connection refused".to_string()))
    }

    async fn mutate_channel_rule(
        &self,
        _guild_id: u64,
        _channel_id: u64,
        _mutator: &RuleMutator<'_>,
    ) -> Result<RuleMutation, PolicyError> {
        Err(PolicyError::StoreUnavailable("connection refused".to_string()))
    }

    async fn delete_guild(&self, _guild_id: u64) -> Result<(), PolicyError> {
        Err(PolicyError::StoreUnavailable("connection refused".to_string()))
    }
}
