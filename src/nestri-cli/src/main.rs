//! Nestri CLI - Main entry point.
//!
//! Builds the command registry, routes the process arguments through the
//! dispatcher and exits with the code the outcome maps to.

use std::process::ExitCode;

use nestri_cli::cli::{build_dispatcher, report_outcome};
use nestri_cli::styled_output::print_error;
use nestri_commands::EXIT_FAILURE;

#[tokio::main]
async fn main() -> ExitCode {
    let dispatcher = match build_dispatcher() {
        Ok(dispatcher) => dispatcher,
        Err(err) => {
            print_error(&err.to_string());
            return exit_code(EXIT_FAILURE);
        }
    };

    let outcome = dispatcher.dispatch(std::env::args_os().skip(1)).await;
    exit_code(report_outcome(&dispatcher, outcome))
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
