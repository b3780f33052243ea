//! Domain models for bot commands as known to the command catalog.

use crate::model::command::CommandDto;

/// Static registration of a bot command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Canonical name.
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    /// Argument synopsis shown after the name in help, empty when there are none.
    pub usage: &'static str,
    pub description: &'static str,
    /// Only members holding the moderator role may run it.
    pub moderator_only: bool,
}

impl CommandSpec {
    /// Converts the registration into its API representation.
    pub fn to_dto(&self) -> CommandDto {
        CommandDto {
            name: self.name.to_string(),
            aliases: self.aliases.iter().map(|alias| alias.to_string()).collect(),
            usage: self.usage.to_string(),
            description: self.description.to_string(),
            moderator_only: self.moderator_only,
        }
    }
}

/// A typed command name resolved to its canonical name and alias set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCommand {
    pub canonical: String,
    pub aliases: Vec<String>,
    pub moderator_only: bool,
}

impl ResolvedCommand {
    /// Canonical name followed by every alias.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.canonical.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}

impl From<&CommandSpec> for ResolvedCommand {
    fn from(spec: &CommandSpec) -> Self {
        Self {
            canonical: spec.name.to_string(),
            aliases: spec.aliases.iter().map(|alias| alias.to_string()).collect(),
            moderator_only: spec.moderator_only,
        }
    }
}
