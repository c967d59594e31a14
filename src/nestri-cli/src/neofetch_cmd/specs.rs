//! Host facts shown by `nestri neofetch`.

use std::path::Path;

use anyhow::{Context, Result, bail};
use sysinfo::{Disks, System};
use tokio::process::Command;
use tracing::debug;

/// Collected system information. Unknown facts are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SystemSpecs {
    pub user_host: Option<String>,
    pub os: Option<String>,
    pub kernel: Option<String>,
    pub uptime: Option<String>,
    pub shell: Option<String>,
    pub cpu: Option<String>,
    pub memory: Option<String>,
    pub gpu: Option<String>,
    pub arch: Option<String>,
    pub disk: Option<String>,
}

impl SystemSpecs {
    /// Label/value rows in display order.
    pub fn rows(&self) -> Vec<(&'static str, &str)> {
        fn value(v: &Option<String>) -> &str {
            v.as_deref().unwrap_or("unknown")
        }

        vec![
            ("OS", value(&self.os)),
            ("Kernel", value(&self.kernel)),
            ("Uptime", value(&self.uptime)),
            ("Shell", value(&self.shell)),
            ("CPU", value(&self.cpu)),
            ("Memory", value(&self.memory)),
            ("GPU", value(&self.gpu)),
            ("Arch", value(&self.arch)),
            ("Disk (/)", value(&self.disk)),
        ]
    }
}

/// Gather everything except the GPU, which needs an external tool.
///
/// Blocking; call from `spawn_blocking`.
pub fn collect_host_specs() -> SystemSpecs {
    let sys = System::new_all();

    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .ok();
    let user_host = match (user, System::host_name()) {
        (Some(user), Some(host)) => Some(format!("{user}@{host}")),
        (Some(user), None) => Some(user),
        (None, Some(host)) => Some(host),
        (None, None) => None,
    };

    let cpu = sys.cpus().first().map(|cpu| {
        let brand = cpu.brand().trim();
        let brand = if brand.is_empty() { "Unknown CPU" } else { brand };
        format!("{brand} ({})", sys.cpus().len())
    });

    let disks = Disks::new_with_refreshed_list();
    let disk = disks
        .list()
        .iter()
        .find(|d| d.mount_point() == Path::new("/"))
        .or_else(|| disks.list().first())
        .map(|d| {
            let total = d.total_space();
            format_usage(total.saturating_sub(d.available_space()), total)
        });

    SystemSpecs {
        user_host,
        os: System::long_os_version().or_else(System::name),
        kernel: System::kernel_version(),
        uptime: Some(format_uptime(System::uptime())),
        shell: std::env::var("SHELL").ok().as_deref().and_then(shell_name),
        cpu,
        memory: Some(format_usage(sys.used_memory(), sys.total_memory())),
        gpu: None,
        arch: Some(std::env::consts::ARCH.to_string()),
        disk,
    }
}

/// Query the GPU name with the platform's tool.
pub async fn probe_gpu() -> Result<String> {
    let os = std::env::consts::OS;
    let (program, args): (&str, &[&str]) = match os {
        "windows" => ("wmic", &["path", "win32_VideoController", "get", "name"]),
        "macos" => ("system_profiler", &["SPDisplaysDataType"]),
        "linux" => ("lspci", &["-vnn"]),
        other => bail!("GPU information retrieval not implemented for {other}"),
    };

    debug!(program, ?args, "Probing GPU");
    let output = Command::new(program)
        .args(args)
        .output()
        .await
        .with_context(|| format!("Failed to run {program}"))?;

    if !output.status.success() {
        bail!("{program} exited with {}", output.status);
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed = match os {
        "windows" => parse_wmic_gpu(&stdout),
        "macos" => parse_system_profiler_gpu(&stdout),
        _ => parse_lspci_gpu(&stdout),
    };

    parsed.with_context(|| format!("Could not find a GPU in {program} output"))
}

/// Extract the GPU name from `lspci -vnn` output.
///
/// Prefers a VGA controller and falls back to a 3D controller.
pub fn parse_lspci_gpu(output: &str) -> Option<String> {
    ["VGA compatible controller", "3D controller"]
        .iter()
        .find_map(|marker| {
            output.lines().find_map(|line| {
                let (_, rest) = line.split_once(marker)?;
                let (_, name) = rest.split_once(": ")?;
                let name = name.trim();
                (!name.is_empty()).then(|| name.to_string())
            })
        })
}

/// Extract the GPU name from `system_profiler SPDisplaysDataType` output.
pub fn parse_system_profiler_gpu(output: &str) -> Option<String> {
    output.lines().find_map(|line| {
        let (_, name) = line.split_once("Chipset Model:")?;
        let name = name.trim();
        (!name.is_empty()).then(|| name.to_string())
    })
}

/// Extract GPU names from `wmic ... get name` output.
///
/// The first line is the `Name` header; remaining names are joined.
pub fn parse_wmic_gpu(output: &str) -> Option<String> {
    let names: Vec<&str> = output
        .lines()
        .skip(1)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    (!names.is_empty()).then(|| names.join(" "))
}

/// Format seconds as `2 days, 3 hours, 4 mins`.
pub fn format_uptime(secs: u64) -> String {
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let mins = (secs % 3_600) / 60;

    let unit = |n: u64, word: &str| {
        if n == 1 {
            format!("1 {word}")
        } else {
            format!("{n} {word}s")
        }
    };

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(unit(days, "day"));
    }
    if hours > 0 {
        parts.push(unit(hours, "hour"));
    }
    if mins > 0 || parts.is_empty() {
        parts.push(unit(mins, "min"));
    }
    parts.join(", ")
}

/// Format a used/total byte pair as `used / total (pct%)` in MiB or GiB.
pub fn format_usage(used: u64, total: u64) -> String {
    const MIB: f64 = 1024.0 * 1024.0;
    const GIB: f64 = MIB * 1024.0;

    let pct = if total == 0 {
        0
    } else {
        ((used as f64 / total as f64) * 100.0).round() as u64
    };

    if (total as f64) >= GIB {
        format!(
            "{:.1} GiB / {:.1} GiB ({pct}%)",
            used as f64 / GIB,
            total as f64 / GIB
        )
    } else {
        format!(
            "{:.0} MiB / {:.0} MiB ({pct}%)",
            used as f64 / MIB,
            total as f64 / MIB
        )
    }
}

fn shell_name(path: &str) -> Option<String> {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .filter(|name| !name.is_empty())
}
