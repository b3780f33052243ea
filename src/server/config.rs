use std::net::SocketAddr;
use std::time::Duration;

use crate::server::error::{config::ConfigError, AppError};

const DEFAULT_COMMAND_PREFIX: &str = "!";
const DEFAULT_MODERATOR_ROLE: &str = "Moderator";
const DEFAULT_API_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_STORE_TIMEOUT_MS: u64 = 2000;

pub struct Config {
    pub database_url: String,
    pub discord_bot_token: String,

    /// Prefix that marks a guild message as a bot command.
    pub command_prefix: String,
    /// Members holding a role whose name contains this text may administer policies.
    pub moderator_role: String,

    pub api_addr: SocketAddr,
    /// Upper bound for a single policy store call.
    pub store_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            discord_bot_token: required("DISCORD_BOT_TOKEN")?,
            command_prefix: optional("COMMAND_PREFIX", DEFAULT_COMMAND_PREFIX),
            moderator_role: optional("MODERATOR_ROLE", DEFAULT_MODERATOR_ROLE),
            api_addr: parse("API_ADDR", &optional("API_ADDR", DEFAULT_API_ADDR))?,
            store_timeout: Duration::from_millis(parse(
                "STORE_TIMEOUT_MS",
                &optional("STORE_TIMEOUT_MS", &DEFAULT_STORE_TIMEOUT_MS.to_string()),
            )?),
        })
    }
}

fn required(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

fn optional(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse<T>(name: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|err: T::Err| ConfigError::InvalidEnvVar {
            name: name.to_string(),
            value: value.to_string(),
            reason: err.to_string(),
        })
}
