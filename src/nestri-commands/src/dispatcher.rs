//! Routing of raw process arguments to exactly one registered command.
//!
//! The first positional token names the command. Only the global flags in
//! front of it are parsed with clap; everything after it, including `--`, is
//! forwarded to the handler untouched.

use std::ffi::OsString;
use std::fmt;

use clap::builder::StyledStr;
use clap::error::ErrorKind;
use clap::{Arg, ArgAction};
use tracing::debug;

use crate::command::{Command, GlobalContext};
use crate::registry::CommandRegistry;

/// Id of the counted `-v/--verbose` flag.
pub const VERBOSE_ARG: &str = "verbose";

/// Exit status for a failed command.
pub const EXIT_FAILURE: i32 = 1;

/// Exit status for usage errors, including a missing command.
pub const EXIT_USAGE: i32 = 2;

/// Exit status for an unknown command name.
pub const EXIT_COMMAND_NOT_FOUND: i32 = 127;

/// Result of one dispatch.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// The command ran and returned this exit status.
    Success(i32),

    /// No registered command has this name.
    CommandNotFound(String),

    /// No command name was given.
    NoCommandGiven,

    /// The command ran and reported its own failure.
    CommandFailed(anyhow::Error),

    /// Help or version output was requested, or a global flag was rejected.
    /// Nothing was dispatched.
    Usage(clap::Error),
}

impl DispatchOutcome {
    /// Process exit status for this outcome.
    ///
    /// | outcome              | exit |
    /// |----------------------|------|
    /// | `Success(n)`         | `n`  |
    /// | `Usage` help/version | 0    |
    /// | `Usage` parse error  | 2    |
    /// | `NoCommandGiven`     | 2    |
    /// | `CommandFailed`      | 1    |
    /// | `CommandNotFound`    | 127  |
    pub fn exit_code(&self) -> i32 {
        match self {
            DispatchOutcome::Success(code) => *code,
            DispatchOutcome::Usage(err) => err.exit_code(),
            DispatchOutcome::NoCommandGiven => EXIT_USAGE,
            DispatchOutcome::CommandFailed(_) => EXIT_FAILURE,
            DispatchOutcome::CommandNotFound(_) => EXIT_COMMAND_NOT_FOUND,
        }
    }

    /// Whether the outcome is a routing failure rather than a command result.
    pub fn is_routing_error(&self) -> bool {
        matches!(
            self,
            DispatchOutcome::CommandNotFound(_) | DispatchOutcome::NoCommandGiven
        )
    }
}

/// Hook run after routing succeeded, right before the handler is invoked.
pub type InvokeHook = Box<dyn Fn(&Command, &GlobalContext) + Send + Sync>;

/// Routes arguments to commands held in a [`CommandRegistry`].
pub struct Dispatcher {
    root: clap::Command,
    registry: CommandRegistry,
    hooks: Vec<InvokeHook>,
}

impl Dispatcher {
    /// Create a dispatcher.
    ///
    /// `root` supplies the program name, about text, version and styling.
    /// The verbosity flag and one subcommand per registered command are added
    /// on top of it.
    pub fn new(root: clap::Command, registry: CommandRegistry) -> Self {
        Self {
            root,
            registry,
            hooks: Vec::new(),
        }
    }

    /// Add a hook that runs before every command invocation.
    pub fn before_invoke<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Command, &GlobalContext) + Send + Sync + 'static,
    {
        self.hooks.push(Box::new(hook));
        self
    }

    /// The registry commands are resolved against.
    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Build the clap command for the global flags and help listing.
    pub fn command(&self) -> clap::Command {
        let mut cmd = self
            .root
            .clone()
            .disable_help_subcommand(true)
            .arg(
                Arg::new(VERBOSE_ARG)
                    .short('v')
                    .long("verbose")
                    .action(ArgAction::Count)
                    .help("Increase output verbosity (repeatable, e.g. -vvv)"),
            );

        for entry in &self.registry {
            cmd = cmd.subcommand(
                clap::Command::new(entry.name().to_string())
                    .about(entry.description().to_string())
                    .disable_help_flag(true),
            );
        }

        cmd
    }

    /// Render top-level help, listing commands in registration order.
    pub fn render_help(&self) -> StyledStr {
        self.command().render_help()
    }

    /// Print top-level help to stdout.
    pub fn print_help(&self) -> std::io::Result<()> {
        self.command().print_help()
    }

    /// Registered names that look like what the user meant by `name`.
    ///
    /// A name matches when either one is a case-insensitive prefix of the
    /// other. Results keep registration order.
    pub fn suggestions(&self, name: &str) -> Vec<String> {
        if name.is_empty() {
            return Vec::new();
        }

        let extended = self.registry.find_by_prefix(name);
        let lower = name.to_lowercase();
        self.registry
            .iter()
            .filter(|cmd| {
                extended.iter().any(|c| c.name() == cmd.name())
                    || lower.starts_with(&cmd.name().to_lowercase())
            })
            .map(|cmd| cmd.name().to_string())
            .collect()
    }

    /// Route `args` (without the program name) to a command and run it.
    pub async fn dispatch<I, T>(&self, args: I) -> DispatchOutcome
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        let split = split_command(&args);

        let cmd = self.command();
        let argv = std::iter::once(OsString::from(self.root.get_name()))
            .chain(args[..split.globals_end].iter().cloned());
        let matches = match cmd.clone().try_get_matches_from(argv) {
            Ok(matches) => matches,
            Err(err) => return DispatchOutcome::Usage(err),
        };

        let ctx = GlobalContext::new(matches.get_count(VERBOSE_ARG));

        let Some(index) = split.command else {
            debug!("No command given");
            return DispatchOutcome::NoCommandGiven;
        };

        let name = args[index].to_string_lossy();
        let Some(command) = self.registry.resolve(&name) else {
            debug!(command = %name, "Command not found");
            return DispatchOutcome::CommandNotFound(name.into_owned());
        };

        let mut forwarded = Vec::with_capacity(args.len() - index - 1);
        for arg in &args[index + 1..] {
            match arg.to_str() {
                Some(arg) => forwarded.push(arg.to_string()),
                None => {
                    let err = clap::Error::raw(
                        ErrorKind::InvalidUtf8,
                        format!("invalid UTF-8 in argument {arg:?}\n"),
                    )
                    .with_cmd(&cmd);
                    return DispatchOutcome::Usage(err);
                }
            }
        }

        for hook in &self.hooks {
            hook(command, &ctx);
        }

        debug!(
            command = command.name(),
            args = ?forwarded,
            verbosity = ctx.verbosity_level(),
            "Dispatching command"
        );

        match command.handler().run(&forwarded, &ctx).await {
            Ok(code) => DispatchOutcome::Success(code),
            Err(err) => {
                debug!(command = command.name(), error = %err, "Command failed");
                DispatchOutcome::CommandFailed(err)
            }
        }
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("root", &self.root.get_name())
            .field("commands", &self.registry.names())
            .field("hooks", &self.hooks.len())
            .finish_non_exhaustive()
    }
}

/// Where the global flags end and the command name sits in the arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CommandSplit {
    /// Number of leading arguments that belong to the root command.
    globals_end: usize,
    /// Index of the command name, if one was given.
    command: Option<usize>,
}

/// Find the first positional token.
///
/// Tokens starting with `-` are global flags. A `--` ends them and the token
/// after it is the command name even if it looks like a flag.
fn split_command(args: &[OsString]) -> CommandSplit {
    for (i, arg) in args.iter().enumerate() {
        if arg.as_os_str() == "--" {
            return CommandSplit {
                globals_end: i,
                command: (i + 1 < args.len()).then_some(i + 1),
            };
        }
        let is_flag = arg
            .to_str()
            .is_some_and(|s| s.len() > 1 && s.starts_with('-'));
        if !is_flag {
            return CommandSplit {
                globals_end: i,
                command: Some(i),
            };
        }
    }

    CommandSplit {
        globals_end: args.len(),
        command: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandHandler;
    use async_trait::async_trait;
    use clap::error::ErrorKind;
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};

    type Seen = Arc<Mutex<Vec<(Vec<String>, GlobalContext)>>>;

    /// Records every invocation and returns a fixed result.
    struct Recorder {
        seen: Seen,
        result: fn() -> anyhow::Result<i32>,
    }

    #[async_trait]
    impl CommandHandler for Recorder {
        async fn run(&self, args: &[String], ctx: &GlobalContext) -> anyhow::Result<i32> {
            self.seen.lock().unwrap().push((args.to_vec(), *ctx));
            (self.result)()
        }
    }

    fn recorder(name: &str, result: fn() -> anyhow::Result<i32>) -> (Command, Seen) {
        let seen: Seen = Arc::default();
        let cmd = Command::new(
            name,
            format!("The {name} command"),
            Recorder {
                seen: seen.clone(),
                result,
            },
        );
        (cmd, seen)
    }

    fn dispatcher(commands: Vec<Command>) -> Dispatcher {
        let registry = CommandRegistry::from_commands(commands).unwrap();
        Dispatcher::new(clap::Command::new("tool").version("1.2.3"), registry)
    }

    #[tokio::test]
    async fn test_empty_arguments_yield_no_command() {
        let (build, seen) = recorder("build", || Ok(0));
        let dispatcher = dispatcher(vec![build]);

        let outcome = dispatcher.dispatch(Vec::<String>::new()).await;

        assert!(matches!(outcome, DispatchOutcome::NoCommandGiven));
        assert_eq!(outcome.exit_code(), EXIT_USAGE);
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_only_flags_yield_no_command() {
        let dispatcher = dispatcher(vec![]);

        let outcome = dispatcher.dispatch(["-vv"]).await;

        assert!(matches!(outcome, DispatchOutcome::NoCommandGiven));
    }

    #[tokio::test]
    async fn test_unknown_command() {
        let (build, seen) = recorder("build", || Ok(0));
        let dispatcher = dispatcher(vec![build]);

        let outcome = dispatcher.dispatch(["frobnicate"]).await;

        match &outcome {
            DispatchOutcome::CommandNotFound(name) => assert_eq!(name, "frobnicate"),
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(outcome.exit_code(), EXIT_COMMAND_NOT_FOUND);
        assert!(outcome.is_routing_error());
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_lookup_is_case_sensitive() {
        let (build, _) = recorder("build", || Ok(0));
        let dispatcher = dispatcher(vec![build]);

        let outcome = dispatcher.dispatch(["Build"]).await;

        assert!(matches!(outcome, DispatchOutcome::CommandNotFound(ref n) if n == "Build"));
    }

    #[tokio::test]
    async fn test_forwards_remaining_arguments() {
        let (build, seen) = recorder("build", || Ok(0));
        let (other, other_seen) = recorder("other", || Ok(0));
        let dispatcher = dispatcher(vec![build, other]);

        let outcome = dispatcher.dispatch(["build", "--flag"]).await;

        assert!(matches!(outcome, DispatchOutcome::Success(0)));
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, vec!["--flag".to_string()]);
        assert_eq!(seen[0].1, GlobalContext::new(0));
        assert!(other_seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_forwards_help_and_verbose_after_command_name() {
        let (build, seen) = recorder("build", || Ok(0));
        let dispatcher = dispatcher(vec![build]);

        dispatcher
            .dispatch(["build", "--help", "-v", "target", "-x"])
            .await;

        let seen = seen.lock().unwrap();
        assert_eq!(
            seen[0].0,
            vec!["--help", "-v", "target", "-x"]
                .into_iter()
                .map(String::from)
                .collect::<Vec<_>>()
        );
        assert_eq!(seen[0].1.verbosity_level(), 0);
    }

    #[tokio::test]
    async fn test_forwards_double_dash_verbatim() {
        let (build, seen) = recorder("build", || Ok(0));
        let dispatcher = dispatcher(vec![build]);

        let outcome = dispatcher.dispatch(["build", "--", "x"]).await;
        dispatcher.dispatch(["build", "a", "--", "--b"]).await;

        assert!(matches!(outcome, DispatchOutcome::Success(0)));
        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].0, vec!["--".to_string(), "x".to_string()]);
        assert_eq!(
            seen[1].0,
            vec!["a".to_string(), "--".to_string(), "--b".to_string()]
        );
    }

    #[tokio::test]
    async fn test_double_dash_before_command_name() {
        let (build, seen) = recorder("build", || Ok(0));
        let dispatcher = dispatcher(vec![build]);

        let outcome = dispatcher.dispatch(["-v", "--", "build", "-v"]).await;

        assert!(matches!(outcome, DispatchOutcome::Success(0)));
        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].0, vec!["-v".to_string()]);
        assert_eq!(seen[0].1.verbosity_level(), 1);

        let outcome = dispatcher.dispatch(["--"]).await;
        assert!(matches!(outcome, DispatchOutcome::NoCommandGiven));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_utf8_argument_is_usage_error() {
        use std::os::unix::ffi::OsStringExt;

        let (build, seen) = recorder("build", || Ok(0));
        let dispatcher = dispatcher(vec![build]);

        let outcome = dispatcher
            .dispatch([OsString::from("build"), OsString::from_vec(vec![0xff])])
            .await;

        assert!(
            matches!(outcome, DispatchOutcome::Usage(ref err) if err.kind() == ErrorKind::InvalidUtf8)
        );
        assert_eq!(outcome.exit_code(), EXIT_USAGE);
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_split_command() {
        let split = |args: &[&str]| {
            let args: Vec<OsString> = args.iter().map(OsString::from).collect();
            let split = split_command(&args);
            (split.globals_end, split.command)
        };

        assert_eq!(split(&[]), (0, None));
        assert_eq!(split(&["-vv", "--verbose"]), (2, None));
        assert_eq!(split(&["build", "-v"]), (0, Some(0)));
        assert_eq!(split(&["-v", "build", "--", "x"]), (1, Some(1)));
        assert_eq!(split(&["-v", "--", "--odd"]), (1, Some(2)));
        assert_eq!(split(&["-", "x"]), (0, Some(0)));
    }

    #[test]
    fn test_debug_lists_commands() {
        let (build, _) = recorder("build", || Ok(0));
        let debug = format!("{:?}", dispatcher(vec![build]).before_invoke(|_, _| {}));

        assert!(debug.contains("Dispatcher"));
        assert!(debug.contains("\"build\""));
        assert!(debug.contains("hooks: 1"));
    }

    #[tokio::test]
    async fn test_verbosity_is_counted() {
        let cases: Vec<(Vec<&str>, u8)> = vec![
            (vec![], 0),
            (vec!["-v"], 1),
            (vec!["-v", "-v"], 2),
            (vec!["-vvv"], 3),
            (vec!["--verbose"], 1),
            (vec!["-v", "--verbose", "-vv"], 4),
            (vec!["--verbose", "--verbose"], 2),
        ];

        for (flags, expected) in cases {
            let (build, seen) = recorder("build", || Ok(0));
            let dispatcher = dispatcher(vec![build]);

            let mut args = flags.clone();
            args.push("build");
            let outcome = dispatcher.dispatch(args).await;

            assert!(matches!(outcome, DispatchOutcome::Success(0)), "{flags:?}");
            assert_eq!(
                seen.lock().unwrap()[0].1.verbosity_level(),
                expected,
                "{flags:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_success_code_passes_through() {
        let (build, _) = recorder("build", || Ok(42));
        let dispatcher = dispatcher(vec![build]);

        let outcome = dispatcher.dispatch(["build"]).await;

        assert!(matches!(outcome, DispatchOutcome::Success(42)));
        assert_eq!(outcome.exit_code(), 42);
        assert!(!outcome.is_routing_error());
    }

    #[derive(Debug, thiserror::Error)]
    #[error("disk on fire")]
    struct DiskOnFire;

    #[tokio::test]
    async fn test_failure_passes_through_unchanged() {
        let (build, _) = recorder("build", || Err(DiskOnFire.into()));
        let dispatcher = dispatcher(vec![build]);

        let outcome = dispatcher.dispatch(["build"]).await;

        assert_eq!(outcome.exit_code(), EXIT_FAILURE);
        match outcome {
            DispatchOutcome::CommandFailed(err) => {
                assert!(err.downcast_ref::<DiskOnFire>().is_some());
                assert_eq!(err.to_string(), "disk on fire");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_help_does_not_dispatch() {
        let (build, seen) = recorder("build", || Ok(0));
        let dispatcher = dispatcher(vec![build]);

        for flag in ["--help", "-h"] {
            let outcome = dispatcher.dispatch([flag, "build"]).await;

            match &outcome {
                DispatchOutcome::Usage(err) => assert_eq!(err.kind(), ErrorKind::DisplayHelp),
                other => panic!("unexpected outcome: {other:?}"),
            }
            assert_eq!(outcome.exit_code(), 0);
        }
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_version_flag() {
        let dispatcher = dispatcher(vec![]);

        let outcome = dispatcher.dispatch(["--version"]).await;

        assert!(
            matches!(outcome, DispatchOutcome::Usage(ref err) if err.kind() == ErrorKind::DisplayVersion)
        );
        assert_eq!(outcome.exit_code(), 0);
    }

    #[tokio::test]
    async fn test_unknown_global_flag_is_usage_error() {
        let (build, seen) = recorder("build", || Ok(0));
        let dispatcher = dispatcher(vec![build]);

        let outcome = dispatcher.dispatch(["--bogus", "build"]).await;

        assert!(matches!(outcome, DispatchOutcome::Usage(_)));
        assert_eq!(outcome.exit_code(), EXIT_USAGE);
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_hooks_run_before_handler() {
        let (build, _) = recorder("build", || Ok(0));
        let hooked: Arc<Mutex<Vec<(String, u8)>>> = Arc::default();
        let sink = hooked.clone();

        let dispatcher = dispatcher(vec![build]).before_invoke(move |cmd, ctx| {
            sink.lock()
                .unwrap()
                .push((cmd.name().to_string(), ctx.verbosity_level()));
        });

        dispatcher.dispatch(["-vv", "build"]).await;
        dispatcher.dispatch(["missing"]).await;

        assert_eq!(*hooked.lock().unwrap(), vec![("build".to_string(), 2)]);
    }

    #[test]
    fn test_help_lists_commands_in_order() {
        let (zeta, _) = recorder("zeta", || Ok(0));
        let (alpha, _) = recorder("alpha", || Ok(0));
        let dispatcher = dispatcher(vec![zeta, alpha]);

        let help = dispatcher.render_help().to_string();

        let zeta_at = help.find("zeta").unwrap();
        let alpha_at = help.find("alpha").unwrap();
        assert!(zeta_at < alpha_at);
        assert!(help.contains("The zeta command"));
        assert!(help.contains("--verbose"));
    }

    #[test]
    fn test_suggestions() {
        let (run, _) = recorder("run", || Ok(0));
        let (neofetch, _) = recorder("neofetch", || Ok(0));
        let dispatcher = dispatcher(vec![run, neofetch]);

        assert_eq!(dispatcher.suggestions("neo"), vec!["neofetch"]);
        assert_eq!(dispatcher.suggestions("runner"), vec!["run"]);
        assert!(dispatcher.suggestions("zzz").is_empty());
        assert!(dispatcher.suggestions("").is_empty());
    }
}
