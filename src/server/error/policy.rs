//! Errors raised by the command policy store and administrator.

use sea_orm::DbErr;
use thiserror::Error;

/// Errors from reading or mutating a guild command policy.
#[derive(Error, Debug)]
pub enum PolicyError {
    /// The caller supplied missing or contradictory arguments.
    ///
    /// Returned to the moderator verbatim, never coerced into a different change.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The stored policy is malformed.
    ///
    /// Evaluation never raises this; it turns malformed data into a denial.
    #[error("Stored command policy for guild {guild_id} is malformed: {reason}")]
    Configuration { guild_id: u64, reason: String },

    /// The database could not be reached or did not answer in time, after one retry.
    #[error("Policy store unavailable: {0}")]
    StoreUnavailable(String),

    /// Non-transient database failure.
    #[error(transparent)]
    Database(DbErr),
}

impl PolicyError {
    /// Whether retrying the same operation may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_))
    }
}

/// Classifies database errors: connection failures are transient, the rest are not.
impl From<DbErr> for PolicyError {
    fn from(err: DbErr) -> Self {
        match err {
            DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => Self::StoreUnavailable(err.to_string()),
            err => Self::Database(err),
        }
    }
}

/// Invalid administrator request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("These commands were not found: {}", format_names(.0))]
    UnknownCommands(Vec<String>),

    #[error("You must provide at least one command name when using `{0}`.")]
    MissingCommands(String),

    #[error("You cannot provide command names when mode is `all`; use `only` or `exclude` to filter commands.")]
    CommandsWithAllMode,

    #[error("Unknown channel mode `{0}`; expected `all`, `only` or `exclude`.")]
    UnknownMode(String),

    #[error("Please provide a channel mode: `all`, `only` or `exclude`.")]
    MissingMode,

    #[error("Please provide a command name.")]
    MissingCommandName,

    #[error("Removing `{command}` would leave no commands allowed in <#{channel_id}>; remove the channel instead.")]
    WouldEmptyWhitelist { channel_id: u64, command: String },

    #[error("This command can only be used in a server.")]
    GuildOnly,
}

fn format_names(names: &[String]) -> String {
    names
        .iter()
        .map(|name| format!("`{}`", name))
        .collect::<Vec<_>>()
        .join(", ")
}
