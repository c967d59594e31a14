//! `nestri neofetch`: show host and GPU information.

mod render;
mod specs;

pub use render::render;
pub use specs::{SystemSpecs, collect_host_specs, probe_gpu};

use std::io::Write;

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::Parser;
use nestri_commands::{CommandHandler, GlobalContext};
use tracing::debug;

use crate::styled_output::use_colors;
use crate::utils::args::parse_command_args;

/// Show system information next to the nestri logo.
#[derive(Debug, Parser)]
#[command(about = "Show important system information")]
pub struct NeofetchCli {}

/// Handler for `nestri neofetch`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NeofetchCommand;

impl NeofetchCommand {
    pub const NAME: &'static str = "neofetch";
    pub const DESCRIPTION: &'static str = "Show important system information";
}

#[async_trait]
impl CommandHandler for NeofetchCommand {
    async fn run(&self, args: &[String], _ctx: &GlobalContext) -> Result<i32> {
        let Some(NeofetchCli {}) = parse_command_args(Self::NAME, args)? else {
            return Ok(0);
        };

        let host = tokio::task::spawn_blocking(collect_host_specs);
        let gpu = probe_gpu().await;
        let mut specs = host.await.context("System probe panicked")?;

        specs.gpu = match gpu {
            Ok(name) => Some(name),
            Err(err) => {
                debug!(error = %err, "GPU probe failed");
                None
            }
        };

        let output = render(&specs, use_colors(false));
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(output.as_bytes())?;
        stdout.flush()?;
        Ok(0)
    }
}
