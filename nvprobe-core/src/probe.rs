//! End-to-end NVENC probe
//!
//! Ties the pieces together: locate `nvidia-smi`, read the driver version
//! and GPU listing, then classify every GPU against the dataset.

use serde::Serialize;
use tracing::warn;

use crate::capability::{CapabilityResolver, Verdict};
use crate::config::{ConfigFile, ProbeConfig};
use crate::dataset::ReferenceDataset;
use crate::error::Result;
use crate::runner::{CommandRunner, SystemRunner};
use crate::smi::{Enumeration, SmiProbe};
use crate::types::{DriverVersion, GpuRecord};

/// One GPU and how it was classified
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GpuReport {
    #[serde(flatten)]
    pub gpu: GpuRecord,
    pub verdict: Verdict,
    pub has_nvenc: bool,
}

/// Result of a full probe run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProbeReport {
    pub driver: Option<DriverVersion>,
    pub gpus: Vec<GpuReport>,
}

impl ProbeReport {
    /// Number of GPUs counted as H.264 NVENC capable
    pub fn nvenc_count(&self) -> usize {
        self.gpus.iter().filter(|g| g.has_nvenc).count()
    }

    /// Number of GPUs listed by the driver, parseable or not
    pub fn gpu_count(&self) -> usize {
        self.gpus.len()
    }
}

/// Counts NVENC-capable GPUs using a runner and an injected dataset
#[derive(Debug, Clone)]
pub struct NvencProbe<R> {
    smi: SmiProbe<R>,
    dataset: ReferenceDataset,
}

impl<R: CommandRunner> NvencProbe<R> {
    pub fn new(runner: R, dataset: ReferenceDataset) -> Self {
        Self {
            smi: SmiProbe::new(runner),
            dataset,
        }
    }

    /// Build a probe from runtime configuration, loading its dataset
    pub fn from_config(runner: R, config: &ProbeConfig) -> Result<Self> {
        let dataset = config.load_dataset()?;
        Ok(Self::new(runner, dataset).with_command(&config.command))
    }

    /// Use a different executable name than `nvidia-smi`
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.smi = self.smi.with_command(command);
        self
    }

    pub fn dataset(&self) -> &ReferenceDataset {
        &self.dataset
    }

    pub fn resolver(&self) -> CapabilityResolver<'_> {
        CapabilityResolver::new(&self.dataset)
    }

    /// Enumerate and classify, degrading to an empty report on failure
    pub fn report(&self) -> ProbeReport {
        self.classify_all(self.smi.enumerate_gpus())
    }

    /// Enumerate and classify, reporting the first failure as an error
    pub fn try_report(&self) -> Result<ProbeReport> {
        Ok(self.classify_all(self.smi.try_enumerate_gpus()?))
    }

    /// Number of GPUs on this host counted as H.264 NVENC capable
    ///
    /// Returns 0 when `nvidia-smi` is missing, fails, reports an old
    /// driver, or lists nothing.
    pub fn number_of_nvenc_gpus(&self) -> usize {
        let enumeration = self.smi.enumerate_gpus();
        self.resolver().count_capable(&enumeration.gpus)
    }

    fn classify_all(&self, enumeration: Enumeration) -> ProbeReport {
        let resolver = self.resolver();
        let gpus = enumeration
            .gpus
            .into_iter()
            .map(|gpu| {
                let verdict = resolver.classify(&gpu);
                GpuReport {
                    gpu,
                    verdict,
                    has_nvenc: verdict.has_nvenc(),
                }
            })
            .collect();

        ProbeReport {
            driver: enumeration.driver,
            gpus,
        }
    }
}

/// Count NVENC-capable GPUs with `runner` under runtime configuration
///
/// A dataset that cannot be loaded (missing file, bad TOML, overlaps in
/// strict mode) is logged and counts as zero GPUs; `nvidia-smi` is not run.
pub fn count_nvenc_gpus<R: CommandRunner>(runner: R, config: &ProbeConfig) -> usize {
    match NvencProbe::from_config(runner, config) {
        Ok(probe) => probe.number_of_nvenc_gpus(),
        Err(e) => {
            warn!("{}", e);
            0
        }
    }
}

/// Number of GPUs on this host counted as H.264 NVENC capable
///
/// Uses the system runner and the user's configuration file (defaults when
/// there is none). Never fails: every problem is logged as a warning and
/// counts as zero GPUs.
pub fn number_of_nvenc_gpus() -> usize {
    let config = ProbeConfig::from(&ConfigFile::load_or_default());
    count_nvenc_gpus(SystemRunner, &config)
}
