//! Every command the bot answers to, in help display order.

use crate::server::model::command::CommandSpec;

/// Builds the registration list the command catalog is created from.
pub fn command_specs() -> Vec<CommandSpec> {
    vec![
        CommandSpec {
            name: "ping",
            aliases: &["latency"],
            usage: "",
            description: "Check bot latency",
            moderator_only: false,
        },
        CommandSpec {
            name: "hello",
            aliases: &["hi"],
            usage: "",
            description: "Say hello to the bot",
            moderator_only: false,
        },
        CommandSpec {
            name: "rick",
            aliases: &["emoji"],
            usage: "[n]",
            description: "Send 1-10 random custom emojis from this server",
            moderator_only: false,
        },
        CommandSpec {
            name: "help",
            aliases: &["commands"],
            usage: "",
            description: "Show this help menu",
            moderator_only: false,
        },
        CommandSpec {
            name: "info",
            aliases: &["about"],
            usage: "",
            description: "Show bot and server info",
            moderator_only: false,
        },
        CommandSpec {
            name: "channel-configure",
            aliases: &["chconfig"],
            usage: "<all|only|exclude> [commands...]",
            description: "Set which commands may run in this channel",
            moderator_only: true,
        },
        CommandSpec {
            name: "channel-remove",
            aliases: &["chremove"],
            usage: "",
            description: "Remove this channel's command rule",
            moderator_only: true,
        },
        CommandSpec {
            name: "channel-list",
            aliases: &["chlist"],
            usage: "",
            description: "List every configured channel",
            moderator_only: true,
        },
        CommandSpec {
            name: "command-add",
            aliases: &["cmdadd"],
            usage: "<command>",
            description: "Add a command to this channel's list",
            moderator_only: true,
        },
        CommandSpec {
            name: "command-remove",
            aliases: &["cmdremove"],
            usage: "<command>",
            description: "Remove a command from this channel's list",
            moderator_only: true,
        },
        CommandSpec {
            name: "command-allow-all",
            aliases: &["cmdallowall"],
            usage: "<command>",
            description: "Allow a command in every channel and thread of this server",
            moderator_only: true,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::service::{catalog::CommandCatalog, policy::engine};

    #[test]
    fn builds_catalog_without_conflicts() {
        let catalog = CommandCatalog::new(command_specs());

        assert!(catalog.is_ok());
    }

    #[test]
    fn registers_every_administration_command() {
        let catalog = CommandCatalog::new(command_specs()).unwrap();

        for name in engine::ADMINISTRATION_COMMANDS {
            let command = catalog.resolve(name);
            assert!(command.is_some(), "{} is not registered", name);
        }
    }

    #[test]
    fn policy_commands_are_moderator_only() {
        for spec in command_specs() {
            let administers_policy =
                spec.name.starts_with("channel-") || spec.name.starts_with("command-");
            assert_eq!(spec.moderator_only, administers_policy, "{}", spec.name);
        }
    }
}
