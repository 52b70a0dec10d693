//! Configuration file loading and saving
//!
//! Loads user configuration from `~/.config/nvprobe/config.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::error::{NvprobeError, Result, ResultExt};
use crate::smi::DEFAULT_SMI_COMMAND;

/// Configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    /// nvidia-smi invocation settings
    #[serde(default)]
    pub probe: ProbeSettings,

    /// Reference dataset settings
    #[serde(default)]
    pub dataset: DatasetSettings,
}

/// Vendor tool settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeSettings {
    /// Executable name or path handed to the command locator
    #[serde(default = "default_command")]
    pub command: String,
}

/// Reference dataset settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSettings {
    /// Dataset TOML to use instead of the bundled one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Reject datasets that list a model in more than one section
    #[serde(default)]
    pub strict: bool,
}

fn default_command() -> String {
    DEFAULT_SMI_COMMAND.to_string()
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            command: default_command(),
        }
    }
}

impl ConfigFile {
    /// Get the default config file path
    pub fn default_path() -> PathBuf {
        if let Some(config_dir) = dirs::config_dir() {
            config_dir.join("nvprobe").join("config.toml")
        } else if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("nvprobe")
                .join("config.toml")
        } else {
            PathBuf::from("/etc/nvprobe/config.toml")
        }
    }

    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        Self::load_from(Self::default_path())
    }

    /// Load configuration from a specific path
    pub fn load_from(path: PathBuf) -> Result<Self> {
        if !path.exists() {
            debug!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .map_err(NvprobeError::from)
            .context(format!("Failed to read config file {}", path.display()))?;

        let config: ConfigFile = toml::from_str(&content)
            .map_err(|e| NvprobeError::config(format!("Failed to parse config file: {}", e)))?;

        info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Load configuration, logging warnings but returning defaults on error
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(e) => {
                warn!("Failed to load config file: {}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(Self::default_path())
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(NvprobeError::from)
                    .context(format!("Failed to create config directory {}", parent.display()))?;
            }
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| NvprobeError::config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(&path, content)
            .map_err(NvprobeError::from)
            .context(format!("Failed to write config file {}", path.display()))?;

        info!("Saved configuration to {:?}", path);
        Ok(())
    }
}

/// Generate a sample configuration file
pub fn sample_config() -> String {
    r#"# nvprobe Configuration

[probe]
# Vendor diagnostic tool, looked up with `which` (`where` on Windows)
command = "nvidia-smi"

[dataset]
# NVENC reference table to use instead of the bundled one.
# Same layout as nvprobe-core/data/nvenc_h264.toml.
# path = "/etc/nvprobe/nvenc_h264.toml"

# Refuse datasets that list a GPU under more than one of
# [none], [ambiguous] and [compat]. When false, such GPUs are logged
# and the first matching section wins.
strict = false
"#
    .to_string()
}
