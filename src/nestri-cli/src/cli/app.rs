//! Root command and built-in command registry.

use std::sync::{Once, OnceLock};

use nestri_commands::{Command, CommandRegistry, Dispatcher, RegistryError};

use super::logging::init_logging;
use super::styles::{AFTER_HELP, get_styles};
use crate::neofetch_cmd::NeofetchCommand;
use crate::run_cmd::RunCommand;

/// Program name shown in usage and help.
pub const BIN_NAME: &str = "nestri";

/// Version string with commit hash and build date.
pub fn long_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = match option_env!("NESTRI_GIT_HASH") {
        Some(v) => v,
        None => "unknown",
    };
    const BUILD_DATE: &str = match option_env!("NESTRI_BUILD_DATE") {
        Some(v) => v,
        None => "unknown",
    };

    static LONG_VERSION: OnceLock<String> = OnceLock::new();
    LONG_VERSION.get_or_init(|| format!("{VERSION} ({GIT_HASH} {BUILD_DATE})"))
}

/// The root clap command: name, version, about text and styling.
pub fn root_command() -> clap::Command {
    clap::Command::new(BIN_NAME)
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version())
        .about("A CLI tool to manage your cloud gaming service")
        .styles(get_styles())
        .after_help(AFTER_HELP)
}

/// Commands shipped with the binary, in help order.
pub fn builtin_commands() -> Vec<Command> {
    vec![
        Command::new(
            NeofetchCommand::NAME,
            NeofetchCommand::DESCRIPTION,
            NeofetchCommand,
        ),
        Command::new(RunCommand::NAME, RunCommand::DESCRIPTION, RunCommand),
    ]
}

/// Build the dispatcher over the built-in commands.
///
/// Logging is installed once routing succeeds, so it honours `-v`.
pub fn build_dispatcher() -> Result<Dispatcher, RegistryError> {
    build_dispatcher_with(builtin_commands())
}

/// Build a dispatcher over `commands` with the standard root and hooks.
pub fn build_dispatcher_with(
    commands: impl IntoIterator<Item = Command>,
) -> Result<Dispatcher, RegistryError> {
    let registry = CommandRegistry::from_commands(commands)?;
    let logging_ready = Once::new();

    Ok(
        Dispatcher::new(root_command(), registry).before_invoke(move |_cmd, ctx| {
            logging_ready.call_once(|| init_logging(ctx));
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builtin_order() {
        let dispatcher = build_dispatcher().unwrap();

        assert_eq!(dispatcher.registry().names(), ["neofetch", "run"]);
    }

    #[test]
    fn test_help_lists_builtins() {
        let help = build_dispatcher().unwrap().render_help().to_string();

        assert!(help.contains("A CLI tool to manage your cloud gaming service"));
        assert!(help.contains("Show important system information"));
        assert!(help.contains("Run a game using nestri"));
        assert!(help.contains("NESTRI_HOME"));
        assert!(
            help.find("Show important system information").unwrap()
                < help.find("Run a game using nestri").unwrap()
        );
    }

    #[test]
    fn test_duplicate_builtin_is_rejected() {
        let mut commands = builtin_commands();
        commands.push(Command::new(
            RunCommand::NAME,
            "Another run",
            RunCommand,
        ));

        let err = build_dispatcher_with(commands).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateName("run".to_string()));
    }

    #[test]
    fn test_root_command_metadata() {
        let root = root_command();

        assert_eq!(root.get_name(), "nestri");
        assert_eq!(root.get_version(), Some(env!("CARGO_PKG_VERSION")));
        assert!(long_version().starts_with(env!("CARGO_PKG_VERSION")));
        assert!(long_version().ends_with(')'));
    }
}
