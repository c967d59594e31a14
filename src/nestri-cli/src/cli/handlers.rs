//! Reporting of dispatch outcomes.
//!
//! Turns a [`DispatchOutcome`] into user-facing output and a process exit
//! code.

use nestri_commands::{DispatchOutcome, Dispatcher};

use super::app::BIN_NAME;
use crate::styled_output::{print_error, print_info};

/// Print whatever the outcome calls for and return the exit code.
pub fn report_outcome(dispatcher: &Dispatcher, outcome: DispatchOutcome) -> i32 {
    let code = outcome.exit_code();
    let routing_error = outcome.is_routing_error();

    match outcome {
        DispatchOutcome::Success(_) => {}
        DispatchOutcome::Usage(err) => {
            // clap routes help/version to stdout and errors to stderr
            if let Err(io_err) = err.print() {
                print_error(&format!("{}", err.render()));
                print_error(&format!("Failed to write output: {io_err}"));
            }
        }
        DispatchOutcome::NoCommandGiven => {
            if let Err(io_err) = dispatcher.print_help() {
                print_error(&format!("Failed to write help: {io_err}"));
            }
            print_error("A command is required");
        }
        DispatchOutcome::CommandNotFound(name) => {
            print_error(&not_found_message(dispatcher, &name));
        }
        DispatchOutcome::CommandFailed(err) => {
            print_error(&format!("{err:#}"));
        }
    }

    if routing_error {
        print_info(&help_hint());
    }

    code
}

/// Pointer to the top-level help printed after routing errors.
pub fn help_hint() -> String {
    format!("Run '{BIN_NAME} --help' to see available commands")
}

/// Message for an unknown command, with suggestions when any match.
pub fn not_found_message(dispatcher: &Dispatcher, name: &str) -> String {
    let suggestions = dispatcher.suggestions(name);
    if suggestions.is_empty() {
        format!("Unknown command '{name}'")
    } else {
        format!(
            "Unknown command '{name}'. Did you mean: {}?",
            suggestions.join(", ")
        )
    }
}
