//! Command descriptors and the handler capability.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

/// Cross-cutting options shared by every command.
///
/// Built once from the global flags before dispatch and handed to the
/// invoked command by shared reference. There are no setters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GlobalContext {
    verbosity_level: u8,
}

impl GlobalContext {
    /// Create a context with the given verbosity level.
    pub fn new(verbosity_level: u8) -> Self {
        Self { verbosity_level }
    }

    /// Number of `-v`/`--verbose` occurrences on the command line.
    pub fn verbosity_level(&self) -> u8 {
        self.verbosity_level
    }

    /// Whether at least one verbosity flag was given.
    pub fn is_verbose(&self) -> bool {
        self.verbosity_level > 0
    }
}

/// Something that can execute a command.
///
/// `Ok(code)` is the command's exit status. `Err` carries the command's own
/// failure, which the dispatcher forwards without looking inside it.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Run the command with the arguments that followed its name.
    async fn run(&self, args: &[String], ctx: &GlobalContext) -> anyhow::Result<i32>;
}

/// Adapter for handlers written as plain synchronous closures.
pub struct FnHandler<F>(F);

impl<F> FnHandler<F>
where
    F: Fn(&[String], &GlobalContext) -> anyhow::Result<i32> + Send + Sync,
{
    /// Wrap a closure.
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F> CommandHandler for FnHandler<F>
where
    F: Fn(&[String], &GlobalContext) -> anyhow::Result<i32> + Send + Sync,
{
    async fn run(&self, args: &[String], ctx: &GlobalContext) -> anyhow::Result<i32> {
        (self.0)(args, ctx)
    }
}

/// A named, invocable subcommand.
#[derive(Clone)]
pub struct Command {
    name: String,
    description: String,
    handler: Arc<dyn CommandHandler>,
}

impl Command {
    /// Create a new command descriptor.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        handler: impl CommandHandler + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            handler: Arc::new(handler),
        }
    }

    /// Create a command from a synchronous closure.
    pub fn from_fn<F>(name: impl Into<String>, description: impl Into<String>, f: F) -> Self
    where
        F: Fn(&[String], &GlobalContext) -> anyhow::Result<i32> + Send + Sync + 'static,
    {
        Self::new(name, description, FnHandler::new(f))
    }

    /// Unique name the command is routed by.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// One-line summary shown in help output.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The command's handler.
    pub fn handler(&self) -> &dyn CommandHandler {
        self.handler.as_ref()
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_verbosity() {
        let quiet = GlobalContext::default();
        assert_eq!(quiet.verbosity_level(), 0);
        assert!(!quiet.is_verbose());

        let loud = GlobalContext::new(3);
        assert_eq!(loud.verbosity_level(), 3);
        assert!(loud.is_verbose());
    }

    #[tokio::test]
    async fn test_fn_handler_forwards_arguments() {
        let cmd = Command::from_fn("count", "Count arguments", |args, _ctx| {
            Ok(args.len() as i32)
        });

        let args = vec!["a".to_string(), "b".to_string()];
        let code = cmd
            .handler()
            .run(&args, &GlobalContext::default())
            .await
            .unwrap();

        assert_eq!(code, 2);
        assert_eq!(cmd.name(), "count");
        assert_eq!(cmd.description(), "Count arguments");
    }

    #[test]
    fn test_debug_omits_handler() {
        let cmd = Command::from_fn("noop", "Does nothing", |_, _| Ok(0));
        let debug = format!("{cmd:?}");

        assert!(debug.contains("noop"));
        assert!(debug.contains("Does nothing"));
    }
}
