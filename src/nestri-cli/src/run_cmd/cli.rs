//! CLI argument definitions for the run command.

use clap::Parser;

/// Run a game using nestri.
#[derive(Debug, Parser)]
#[command(about = "Run a game using nestri")]
pub struct RunCli {
    /// Game executable to run, relative to ~/game or absolute.
    /// Remembered for the next run when given.
    #[arg(value_name = "GAME")]
    pub game: Option<String>,

    /// Index of the GPU to pass to the container (default: all GPUs).
    #[arg(long = "gpu", value_name = "N")]
    pub gpu: Option<u32>,

    /// Request HDR output.
    #[arg(long = "hdr")]
    pub hdr: bool,
}
