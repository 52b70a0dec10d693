//! `nvidia-smi` output parsing
//!
//! Scrapes the driver version and GPU listing from the human-readable
//! output of `nvidia-smi`. The text format is not a stable interface, so
//! all knowledge of it stays in this module; the capability resolver only
//! ever sees [`GpuRecord`]s.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{NvprobeError, Result};
use crate::locate::find_command;
use crate::runner::CommandRunner;
use crate::types::{DriverVersion, GpuRecord};

/// Default name of the vendor diagnostic tool
pub const DEFAULT_SMI_COMMAND: &str = "nvidia-smi";

/// Flag that makes `nvidia-smi` print one line per GPU
pub const LIST_GPUS_FLAG: &str = "-L";

// Only "major.minor" is captured; a trailing ".patch" is ignored.
static DRIVER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Driver Version: (\d+)\.(\d+)").expect("driver version pattern is valid")
});

static GPU_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^GPU (\d+): ([a-zA-Z0-9 -]+) \(UUID: ([a-zA-Z0-9-]+)\)")
        .expect("GPU listing pattern is valid")
});

/// Find the driver version in the default `nvidia-smi` report
///
/// The first line carrying `Driver Version: ` wins.
pub fn parse_driver_version(text: &str) -> Option<DriverVersion> {
    let caps = text.lines().find_map(|line| DRIVER_PATTERN.captures(line))?;
    let major = caps[1].parse().ok()?;
    let minor = caps[2].parse().ok()?;
    Some(DriverVersion { major, minor })
}

impl GpuRecord {
    /// Parse one `nvidia-smi -L` line, `None` if it does not match
    pub fn try_parse(line: &str) -> Option<Self> {
        let caps = GPU_PATTERN.captures(line.trim())?;
        let index = caps[1].parse().ok()?;
        Some(Self::new(index, &caps[2], &caps[3]))
    }

    /// Parse one `nvidia-smi -L` line, falling back to [`GpuRecord::unknown`]
    pub fn parse(line: &str) -> Self {
        Self::try_parse(line).unwrap_or_else(|| {
            warn!("failed to parse: {}", line.trim());
            Self::unknown()
        })
    }
}

/// Parse every non-blank line of an `nvidia-smi -L` listing
pub fn parse_gpu_list(text: &str) -> Vec<GpuRecord> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(GpuRecord::parse)
        .collect()
}

/// Driver version and GPU listing from one probe run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Enumeration {
    /// Driver version, when it could be determined
    pub driver: Option<DriverVersion>,
    /// GPUs in listing order, including placeholders for unparseable lines
    pub gpus: Vec<GpuRecord>,
}

impl Enumeration {
    pub fn is_empty(&self) -> bool {
        self.gpus.is_empty()
    }
}

/// Queries `nvidia-smi` through a [`CommandRunner`]
#[derive(Debug, Clone)]
pub struct SmiProbe<R> {
    runner: R,
    command: String,
}

impl<R: CommandRunner> SmiProbe<R> {
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            command: DEFAULT_SMI_COMMAND.to_string(),
        }
    }

    /// Use a different executable name than `nvidia-smi`
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = command.into();
        self
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Enumerate GPUs, reporting the first failure as an error
    pub fn try_enumerate_gpus(&self) -> Result<Enumeration> {
        let smi = find_command(&self.runner, &self.command)
            .ok_or_else(|| NvprobeError::not_found(&self.command))?;

        let driver = self.driver_version(&smi)?;
        debug!(
            "NVIDIA driver version: {} (major={}, minor={})",
            driver, driver.major, driver.minor
        );
        if !driver.is_supported() {
            return Err(NvprobeError::UnsupportedDriver {
                major: driver.major,
                minor: driver.minor,
            });
        }

        let gpus = self.list_gpus(&smi)?;
        let names = if gpus.is_empty() {
            String::new()
        } else {
            let names: Vec<&str> = gpus.iter().map(|g| g.name.as_str()).collect();
            format!(" ({})", names.join(", "))
        };
        info!("number of NVIDIA GPUs available: {}{}", gpus.len(), names);

        Ok(Enumeration {
            driver: Some(driver),
            gpus,
        })
    }

    /// Enumerate GPUs, logging any failure and returning what is known
    ///
    /// A missing tool, a failing tool, unparseable output, or an old driver
    /// all produce an empty GPU list. An old driver still reports its
    /// version.
    pub fn enumerate_gpus(&self) -> Enumeration {
        match self.try_enumerate_gpus() {
            Ok(enumeration) => enumeration,
            // find_command has already warned
            Err(NvprobeError::CommandNotFound(_)) => Enumeration::default(),
            Err(NvprobeError::UnsupportedDriver { major, minor }) => {
                warn!(
                    "NVIDIA driver must be newer than 450.xx (found {}.{:02}): please update via https://www.nvidia.com/Download/index.aspx",
                    major, minor
                );
                Enumeration {
                    driver: Some(DriverVersion::new(major, minor)),
                    gpus: Vec::new(),
                }
            }
            Err(e) => {
                warn!("{}", e);
                Enumeration::default()
            }
        }
    }

    fn driver_version(&self, smi: &Path) -> Result<DriverVersion> {
        let program = smi.to_string_lossy();
        let output = self.runner.run(&program, &[])?.check(&self.command)?;
        parse_driver_version(&output.stdout).ok_or_else(|| {
            NvprobeError::parse(format!(
                "failed to parse the driver version from '{}'",
                self.command
            ))
        })
    }

    fn list_gpus(&self, smi: &Path) -> Result<Vec<GpuRecord>> {
        let program = smi.to_string_lossy();
        let output = self
            .runner
            .run(&program, &[LIST_GPUS_FLAG])?
            .check(&self.command)
            .map_err(|e| e.with_context("failed to list up available GPUs"))?;
        Ok(parse_gpu_list(&output.stdout))
    }
}
