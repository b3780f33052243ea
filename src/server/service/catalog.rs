//! Command catalog resolving typed names to canonical commands.
//!
//! The catalog is built once at startup from the bot's command registry. Lookups are
//! exact: a name either is a registered canonical name or alias, or it is unknown.
//! There is no prefix or fuzzy matching.

use std::collections::HashMap;

use crate::server::{
    error::config::ConfigError,
    model::command::{CommandSpec, ResolvedCommand},
};

/// Name → command table for every registered command.
#[derive(Debug, Clone)]
pub struct CommandCatalog {
    commands: Vec<CommandSpec>,
    /// Canonical names and aliases mapped to an index into `commands`.
    index: HashMap<&'static str, usize>,
}

impl CommandCatalog {
    /// Builds the catalog from the registered commands.
    ///
    /// # Arguments
    /// - `commands` - Registered commands in help display order
    ///
    /// # Returns
    /// - `Ok(CommandCatalog)` - Every name and alias resolves to exactly one command
    /// - `Err(ConfigError::DuplicateCommandName)` - Two commands share a name or alias
    pub fn new(commands: Vec<CommandSpec>) -> Result<Self, ConfigError> {
        let mut index = HashMap::new();

        for (position, command) in commands.iter().enumerate() {
            for name in std::iter::once(&command.name).chain(command.aliases.iter()) {
                if let Some(existing) = index.insert(*name, position) {
                    return Err(ConfigError::DuplicateCommandName {
                        name: name.to_string(),
                        first: commands[existing].name.to_string(),
                        second: command.name.to_string(),
                    });
                }
            }
        }

        Ok(Self { commands, index })
    }

    /// Resolves a typed name to its canonical command and aliases.
    ///
    /// # Returns
    /// - `Some(ResolvedCommand)` - `name` is a canonical name or alias
    /// - `None` - No command is registered under `name`
    pub fn resolve(&self, name: &str) -> Option<ResolvedCommand> {
        self.index
            .get(name)
            .map(|position| ResolvedCommand::from(&self.commands[*position]))
    }

    /// Resolves several names, splitting them into known commands and unknown names.
    ///
    /// Known commands are deduplicated by canonical name and keep input order.
    pub fn resolve_all<'n, I>(&self, names: I) -> (Vec<ResolvedCommand>, Vec<String>)
    where
        I: IntoIterator<Item = &'n str>,
    {
        let mut resolved: Vec<ResolvedCommand> = Vec::new();
        let mut unknown = Vec::new();

        for name in names {
            match self.resolve(name) {
                Some(command) => {
                    if !resolved.iter().any(|c| c.canonical == command.canonical) {
                        resolved.push(command);
                    }
                }
                None => unknown.push(name.to_string()),
            }
        }

        (resolved, unknown)
    }

    /// All registered commands in registration order.
    pub fn commands(&self) -> &[CommandSpec] {
        &self.commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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
        CommandCatalog::new(vec![spec("ping", &["p", "pong"]), spec("help", &["h"])]).unwrap()
    }

    #[test]
    fn resolves_canonical_name_and_alias() {
        let catalog = catalog();

        let by_name = catalog.resolve("ping").unwrap();
        let by_alias = catalog.resolve("pong").unwrap();

        assert_eq!(by_name, by_alias);
        assert_eq!(by_alias.canonical, "ping");
        assert_eq!(by_alias.aliases, vec!["p".to_string(), "pong".to_string()]);
    }

    #[test]
    fn does_not_prefix_match() {
        let catalog = catalog();

        assert!(catalog.resolve("pin").is_none());
        assert!(catalog.resolve("pings").is_none());
        assert!(catalog.resolve("PING").is_none());
    }

    #[test]
    fn rejects_duplicate_alias() {
        let result = CommandCatalog::new(vec![spec("ping", &["p"]), spec("play", &["p"])]);

        assert!(matches!(
            result,
            Err(ConfigError::DuplicateCommandName { ref name, .. }) if name == "p"
        ));
    }

    #[test]
    fn resolve_all_deduplicates_and_reports_unknown() {
        let catalog = catalog();

        let (resolved, unknown) = catalog.resolve_all(["p", "ping", "nope", "h"]);

        let names: Vec<&str> = resolved.iter().map(|c| c.canonical.as_str()).collect();
        assert_eq!(names, vec!["ping", "help"]);
        assert_eq!(unknown, vec!["nope".to_string()]);
    }
}
