//! Configuration types for nvprobe
//!
//! [`ConfigFile`] is the on-disk format; [`ProbeConfig`] is what a probe
//! run actually uses after CLI overrides are applied.

mod file;

pub use file::{sample_config, ConfigFile, DatasetSettings, ProbeSettings};

use std::path::PathBuf;

use crate::dataset::ReferenceDataset;
use crate::error::Result;
use crate::smi::DEFAULT_SMI_COMMAND;

/// Runtime configuration for a probe run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeConfig {
    /// Vendor tool name or path
    pub command: String,
    /// Dataset file, `None` for the bundled table
    pub dataset_path: Option<PathBuf>,
    /// Reject inconsistent datasets instead of warning
    pub strict_dataset: bool,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            command: DEFAULT_SMI_COMMAND.to_string(),
            dataset_path: None,
            strict_dataset: false,
        }
    }
}

impl ProbeConfig {
    /// Set the vendor tool name
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = command.into();
        self
    }

    /// Use a dataset file instead of the bundled table
    pub fn with_dataset_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.dataset_path = Some(path.into());
        self
    }

    /// Enable or disable strict dataset validation
    pub fn with_strict_dataset(mut self, strict: bool) -> Self {
        self.strict_dataset = strict;
        self
    }

    /// Load the configured dataset and apply the consistency policy
    pub fn load_dataset(&self) -> Result<ReferenceDataset> {
        let dataset = match &self.dataset_path {
            Some(path) => ReferenceDataset::load_from(path)?,
            None => ReferenceDataset::bundled()?,
        };
        dataset.checked(self.strict_dataset)
    }

    /// Where the dataset comes from, for display
    pub fn dataset_source(&self) -> String {
        match &self.dataset_path {
            Some(path) if path.is_file() => path.display().to_string(),
            Some(path) => format!("{} (missing)", path.display()),
            None => "bundled".to_string(),
        }
    }

    /// Whether anything differs from the built-in defaults
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

impl From<&ProbeConfig> for ConfigFile {
    fn from(config: &ProbeConfig) -> Self {
        Self {
            probe: ProbeSettings {
                command: config.command.clone(),
            },
            dataset: DatasetSettings {
                path: config.dataset_path.clone(),
                strict: config.strict_dataset,
            },
        }
    }
}

impl From<&ConfigFile> for ProbeConfig {
    fn from(file: &ConfigFile) -> Self {
        Self {
            command: file.probe.command.clone(),
            dataset_path: file.dataset.path.clone(),
            strict_dataset: file.dataset.strict,
        }
    }
}
