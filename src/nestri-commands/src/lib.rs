//! Command registry and dispatch core for the nestri CLI.
//!
//! The binary supplies an ordered list of [`Command`] descriptors at startup.
//! They are collected into a [`CommandRegistry`], which rejects duplicate
//! names, and a [`Dispatcher`] routes the raw process arguments to exactly one
//! of them:
//!
//! ```rust,ignore
//! use nestri_commands::{Command, CommandRegistry, Dispatcher};
//!
//! let registry = CommandRegistry::from_commands([
//!     Command::from_fn("hello", "Say hello", |args, _ctx| {
//!         println!("hello {}", args.join(" "));
//!         Ok(0)
//!     }),
//! ])?;
//!
//! let dispatcher = Dispatcher::new(clap::Command::new("nestri"), registry);
//! let outcome = dispatcher.dispatch(std::env::args_os().skip(1)).await;
//! std::process::exit(outcome.exit_code());
//! ```
//!
//! # Global Flags
//!
//! - `-v`, `--verbose` - repeatable, counted into [`GlobalContext`]
//! - `-h`, `--help` - prints top-level help, nothing is dispatched
//!
//! Everything after the command name is passed to its handler unchanged,
//! including flags such as `--help`.

mod command;
mod dispatcher;
mod registry;

pub use command::{Command, CommandHandler, FnHandler, GlobalContext};
pub use dispatcher::{
    DispatchOutcome, Dispatcher, EXIT_COMMAND_NOT_FOUND, EXIT_FAILURE, EXIT_USAGE, InvokeHook,
    VERBOSE_ARG,
};
pub use registry::{CommandRegistry, RegistryError};

/// Re-export common types for convenience.
pub mod prelude {
    pub use crate::{
        Command, CommandHandler, CommandRegistry, DispatchOutcome, Dispatcher, GlobalContext,
        RegistryError,
    };
}
