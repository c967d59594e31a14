//! Server container control through the docker CLI.

use std::path::{Component, Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use tokio::process::Command;
use tracing::{debug, info};

use crate::config::ContainerConfig;

/// Directory whose presence means the X server inside the container is up.
pub const X11_SOCKET_DIR: &str = "/tmp/.X11-unix";

/// Script that brings up the display stack inside the container.
pub const STARTUP_SCRIPT: &str = "/etc/startup.sh";

/// Launcher used to start a game inside the container.
pub const GAME_LAUNCHER: &str = "netris-proton";

/// Mount point of the game directory inside the container.
pub const CONTAINER_GAME_DIR: &str = "/game";

/// Interval between display readiness checks.
pub const DISPLAY_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// How long to wait for the display to come up.
pub const DISPLAY_TIMEOUT: Duration = Duration::from_secs(7 * 60);

/// Observed state of the server container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerState {
    Running,
    Stopped,
    Absent,
}

/// Parameters for creating a fresh container.
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    /// GPU index, or every GPU when `None`.
    pub gpu: Option<u32>,
    pub session_id: String,
    pub game_dir: PathBuf,
}

/// Drives the docker CLI for one configured container.
#[derive(Debug, Clone)]
pub struct ContainerRuntime {
    docker: PathBuf,
    config: ContainerConfig,
}

impl ContainerRuntime {
    /// Locate `docker` on `PATH`.
    pub fn locate(config: ContainerConfig) -> Result<Self> {
        let docker = which::which("docker").context(
            "docker was not found on PATH; install Docker and the NVIDIA container toolkit",
        )?;
        debug!(docker = %docker.display(), "Found docker");
        Ok(Self::with_program(docker, config))
    }

    /// Use an explicit docker binary.
    pub fn with_program(docker: impl Into<PathBuf>, config: ContainerConfig) -> Self {
        Self {
            docker: docker.into(),
            config,
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// `docker ps` arguments listing this container's id.
    pub fn ps_args(&self, include_stopped: bool) -> Vec<String> {
        let mut args = vec!["ps".to_string()];
        if include_stopped {
            args.push("-a".to_string());
        }
        args.extend([
            "-q".to_string(),
            "-f".to_string(),
            format!("name=^{}$", self.config.name),
        ]);
        args
    }

    /// `docker run` arguments creating the container.
    pub fn run_args(&self, opts: &LaunchOptions) -> Vec<String> {
        let gpus = match opts.gpu {
            Some(index) => format!("device={index}"),
            None => "all".to_string(),
        };
        let port = self.config.port;

        vec![
            "run".to_string(),
            "-d".to_string(),
            "--gpus".to_string(),
            gpus,
            "--device=/dev/dri".to_string(),
            "--name".to_string(),
            self.config.name.clone(),
            "-it".to_string(),
            "--entrypoint".to_string(),
            "/bin/bash".to_string(),
            "-e".to_string(),
            format!("SESSION_ID={}", opts.session_id),
            "-v".to_string(),
            format!("{}:{CONTAINER_GAME_DIR}", opts.game_dir.display()),
            "-p".to_string(),
            format!("{port}:{port}/udp"),
            "--cap-add=SYS_NICE".to_string(),
            "--cap-add=SYS_ADMIN".to_string(),
            self.config.image.clone(),
        ]
    }

    pub fn start_args(&self) -> Vec<String> {
        vec!["start".to_string(), self.config.name.clone()]
    }

    /// `docker exec` arguments running `command` in the container.
    pub fn exec_args(&self, detached: bool, command: &[&str]) -> Vec<String> {
        let mut args = vec!["exec".to_string()];
        if detached {
            args.push("-d".to_string());
        }
        args.push(self.config.name.clone());
        args.extend(command.iter().map(|s| s.to_string()));
        args
    }

    fn command(&self, args: &[String]) -> Command {
        let mut cmd = if self.config.sudo {
            let mut cmd = Command::new("sudo");
            cmd.arg(&self.docker);
            cmd
        } else {
            Command::new(&self.docker)
        };
        cmd.args(args).stdin(Stdio::null());
        cmd
    }

    /// Run docker and return its trimmed stdout.
    async fn capture(&self, args: &[String]) -> Result<String> {
        debug!(?args, "docker");
        let output = self
            .command(args)
            .output()
            .await
            .with_context(|| format!("Failed to run docker {}", args.join(" ")))?;

        if !output.status.success() {
            bail!(
                "docker {} failed ({}): {}",
                args.first().map(String::as_str).unwrap_or_default(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Run docker with inherited output and return its exit code.
    async fn stream(&self, args: &[String]) -> Result<i32> {
        debug!(?args, "docker");
        let status = self
            .command(args)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .with_context(|| format!("Failed to run docker {}", args.join(" ")))?;

        Ok(status.code().unwrap_or(1))
    }

    /// Query whether the container is running, stopped or missing.
    pub async fn state(&self) -> Result<ContainerState> {
        if !self.capture(&self.ps_args(false)).await?.is_empty() {
            return Ok(ContainerState::Running);
        }
        if !self.capture(&self.ps_args(true)).await?.is_empty() {
            return Ok(ContainerState::Stopped);
        }
        Ok(ContainerState::Absent)
    }

    /// Make sure the container is running, creating it if needed.
    pub async fn ensure_running(&self, opts: &LaunchOptions) -> Result<ContainerState> {
        let state = self.state().await?;
        match state {
            ContainerState::Running => {
                info!(container = self.name(), "Container already running");
            }
            ContainerState::Stopped => {
                info!(container = self.name(), "Starting existing container");
                self.capture(&self.start_args())
                    .await
                    .context("Failed to start the server container")?;
            }
            ContainerState::Absent => {
                info!(container = self.name(), image = %self.config.image, "Creating container");
                self.capture(&self.run_args(opts))
                    .await
                    .context("Failed to create the server container")?;
            }
        }
        Ok(state)
    }

    /// Whether the X server socket directory exists in the container.
    pub async fn display_ready(&self) -> Result<bool> {
        let args = self.exec_args(false, &["test", "-e", X11_SOCKET_DIR]);
        let status = self
            .command(&args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .context("Failed to query the container display")?;
        Ok(status.success())
    }

    /// Start the display stack if needed and wait until it is up.
    pub async fn ensure_display(&self) -> Result<()> {
        if self.display_ready().await? {
            debug!("Display already running");
            return Ok(());
        }

        info!("Starting display stack");
        self.capture(&self.exec_args(true, &[STARTUP_SCRIPT]))
            .await
            .context("Failed to run the container startup script")?;

        let wait = async {
            loop {
                tokio::time::sleep(DISPLAY_POLL_INTERVAL).await;
                if self.display_ready().await? {
                    return Ok::<_, anyhow::Error>(());
                }
                debug!("Display not ready yet");
            }
        };

        match tokio::time::timeout(DISPLAY_TIMEOUT, wait).await {
            Ok(result) => result,
            Err(_) => bail!(
                "Display did not come up within {} minutes",
                DISPLAY_TIMEOUT.as_secs() / 60
            ),
        }
    }

    /// Launch the game at container path `game` and wait for it to exit.
    pub async fn launch_game(&self, game: &str) -> Result<i32> {
        info!(game = %game, "Launching game");
        self.stream(&self.exec_args(false, &[GAME_LAUNCHER, "-pr", game]))
            .await
    }
}

/// Path of `game` as seen inside the container.
///
/// Relative names resolve against the mounted game directory. Absolute paths
/// must lie under `host_game_dir` and are rewritten onto its mount point.
pub fn container_game_path(game: &str, host_game_dir: &Path) -> Result<String> {
    let path = Path::new(game);
    let relative = if path.is_absolute() {
        path.strip_prefix(host_game_dir).with_context(|| {
            format!(
                "'{game}' is outside the game directory {}; move it there first",
                host_game_dir.display()
            )
        })?
    } else {
        path
    };

    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
    {
        bail!("'{game}' must stay inside the game directory");
    }
    if relative.file_name().is_none() {
        bail!("'{game}' does not name a game file");
    }

    Ok(Path::new(CONTAINER_GAME_DIR)
        .join(relative)
        .to_string_lossy()
        .into_owned())
}
