//! Parsing of the raw arguments forwarded to a command.

use anyhow::{Result, bail};
use clap::Parser;
use clap::error::ErrorKind;

/// Parse a command's forwarded arguments into `T`.
///
/// `--help` and `--version` print their output and yield `Ok(None)`, so the
/// command can exit successfully without doing anything else.
pub fn parse_command_args<T: Parser>(name: &str, args: &[String]) -> Result<Option<T>> {
    let bin_name = format!("nestri {name}");
    let argv = std::iter::once(bin_name.as_str()).chain(args.iter().map(String::as_str));

    match T::try_parse_from(argv) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.print()?;
            Ok(None)
        }
        Err(err) => {
            let rendered = err.render().to_string();
            bail!(
                "{}",
                rendered
                    .trim()
                    .strip_prefix("error: ")
                    .unwrap_or(rendered.trim())
            )
        }
    }
}
