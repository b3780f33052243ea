//! Prefix command parsing and dispatch.
//!
//! Messages starting with the configured prefix are split into a command name and
//! whitespace-separated arguments. The name is resolved through the command catalog
//! by the message handler, which runs the policy gate before anything here executes.

use serenity::all::{Context, Message};

use crate::server::{bot::handler::Handler, error::AppError, model::command::ResolvedCommand};

pub mod general;
pub mod policy;
pub mod registry;

/// A prefix command split into its typed name and arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand<'a> {
    /// Name exactly as typed; may be an alias.
    pub name: &'a str,
    pub args: Vec<&'a str>,
}

/// Splits a message into a command name and arguments.
///
/// # Returns
/// - `Some(ParsedCommand)` - The message starts with `prefix` directly followed by a name
/// - `None` - The message is not a command
pub fn parse<'a>(content: &'a str, prefix: &str) -> Option<ParsedCommand<'a>> {
    let rest = content.trim_start().strip_prefix(prefix)?;

    if rest.starts_with(char::is_whitespace) {
        return None;
    }

    let mut parts = rest.split_whitespace();
    let name = parts.next()?;

    Some(ParsedCommand {
        name,
        args: parts.collect(),
    })
}

/// Runs an authorized command.
///
/// # Arguments
/// - `handler` - Bot handler holding the database, catalog and settings
/// - `ctx` - Discord context for replies and cache access
/// - `message` - The invoking message
/// - `command` - The invoked command resolved through the catalog
/// - `args` - Arguments following the command name
pub async fn run(
    handler: &Handler,
    ctx: &Context,
    message: &Message,
    command: &ResolvedCommand,
    args: &[&str],
) -> Result<(), AppError> {
    match command.canonical.as_str() {
        "ping" => general::ping(ctx, message).await,
        "hello" => general::hello(ctx, message).await,
        "rick" => general::rick(ctx, message, args.first().copied()).await,
        "help" => general::help(handler, ctx, message).await,
        "info" => general::info(handler, ctx, message).await,
        name => policy::run(handler, ctx, message, name, args).await,
    }
}
