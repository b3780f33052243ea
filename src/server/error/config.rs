use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required environment variable is not set.
    ///
    /// The application requires this environment variable to be defined. Check the
    /// documentation or `.env.example` file for required configuration variables.
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// Environment variable is set but cannot be parsed.
    #[error("Invalid value '{value}' for environment variable {name}: {reason}")]
    InvalidEnvVar {
        name: String,
        value: String,
        reason: String,
    },

    /// Two registered commands claim the same name or alias.
    ///
    /// Detected while building the command catalog at startup; command names must
    /// resolve unambiguously for channel rules to mean anything.
    #[error("Command name '{name}' is registered by both '{first}' and '{second}'")]
    DuplicateCommandName {
        name: String,
        first: String,
        second: String,
    },
}
