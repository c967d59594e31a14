//! Run command: start a game on the nestri server container.
//!
//! - `nestri run <GAME>` - Run and remember a game
//! - `nestri run` - Run the previously selected game
//! - `--gpu N` - Pass a single GPU to the container
//! - `--hdr` - Request HDR output

mod cli;
mod docker;
mod game;

pub use cli::RunCli;
pub use docker::{ContainerRuntime, ContainerState, LaunchOptions, container_game_path};
pub use game::{generate_session_id, list_games, os_release_version, resolve_game};

use anyhow::{Context, Result};
use async_trait::async_trait;
use nestri_commands::{CommandHandler, GlobalContext};
use tracing::{debug, warn};

use crate::config::NestriConfig;
use crate::styled_output::{print_info, print_success, print_warning};
use crate::utils::args::parse_command_args;
use crate::utils::paths::{expand_tilde, game_directory};

const OS_RELEASE: &str = "/etc/os-release";

/// Handler for `nestri run`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RunCommand;

impl RunCommand {
    pub const NAME: &'static str = "run";
    pub const DESCRIPTION: &'static str = "Run a game using nestri";
}

#[async_trait]
impl CommandHandler for RunCommand {
    async fn run(&self, args: &[String], _ctx: &GlobalContext) -> Result<i32> {
        let Some(cli) = parse_command_args::<RunCli>(Self::NAME, args)? else {
            return Ok(0);
        };

        if !cfg!(target_os = "linux") {
            print_info("nestri run is currently only supported on Linux");
            return Ok(0);
        }

        run_game(cli).await
    }
}

async fn run_game(cli: RunCli) -> Result<i32> {
    let mut config = NestriConfig::load()?;
    let game_dir = game_directory()?;
    let requested = cli.game.as_deref().map(expand_tilde);
    let (game, changed) = resolve_game(requested.as_deref(), &mut config)?;
    let container_game = container_game_path(&game, &game_dir)?;
    if changed {
        config.save().context("Failed to remember the selected game")?;
    }

    match tokio::fs::read_to_string(OS_RELEASE).await {
        Ok(content) => {
            for line in os_release_version(&content) {
                println!("{line}");
            }
        }
        Err(err) => warn!(error = %err, "Could not read {OS_RELEASE}"),
    }

    println!("Game directory: {}", game_dir.display());
    for entry in list_games(&game_dir)? {
        println!("  {entry}");
    }

    let session_id = generate_session_id();
    print_info(&format!("Session id: {session_id}"));
    if cli.hdr {
        print_info("HDR output requested");
    }
    debug!(gpu = ?cli.gpu, game = %container_game, "Preparing container");

    let runtime = ContainerRuntime::locate(config.container)?;
    let opts = LaunchOptions {
        gpu: cli.gpu,
        session_id,
        game_dir,
    };

    let state = runtime.ensure_running(&opts).await?;
    if state != ContainerState::Running {
        print_success(&format!("Container '{}' is up", runtime.name()));
    }

    print_info("Waiting for the display to start...");
    runtime.ensure_display().await?;

    print_info(&format!("Launching {game}"));
    let code = runtime.launch_game(&container_game).await?;
    if code != 0 {
        print_warning(&format!("Game exited with status {code}"));
    }
    Ok(code)
}
