//! NVENC H.264 capability resolution
//!
//! Decides from a GPU's model name whether it has usable NVENC hardware.
//! The reference dataset is incomplete and some model names cover several
//! silicon variants, so the decision is a layered policy rather than a
//! single lookup. Rules are tried in order and the first match wins:
//!
//! 1. Workstation/datacenter branding ("Quadro", "NVS", "Tesla"): capable.
//! 2. Listed under `none`: not capable.
//! 3. Listed under `ambiguous`: capable (optimistic).
//! 4. Not listed under `compat`: not capable (too old or too new).
//! 5. Listed under `compat`: capable if any possible core type has at
//!    least one H.264 NVENC core.

use serde::Serialize;
use tracing::{info, warn};

use crate::dataset::ReferenceDataset;
use crate::types::GpuRecord;

/// Name fragments that are treated as NVENC-capable regardless of the dataset
pub const BRAND_OVERRIDES: [&str; 3] = ["Quadro", "NVS", "Tesla"];

/// Concurrent H.264 encode sessions one NVENC core is assumed to sustain
pub const SESSIONS_PER_CORE: u32 = 3;

const SUPPORT_MATRIX_URL: &str =
    "https://developer.nvidia.com/video-encode-and-decode-gpu-support-matrix-new";

/// Simultaneous encodes for `cores` NVENC cores, clamped at `u32::MAX`
pub fn sessions_for(cores: u32) -> u32 {
    cores.saturating_mul(SESSIONS_PER_CORE)
}

/// Outcome of classifying one GPU
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Verdict {
    /// Name carries a professional or datacenter brand
    BrandOverride { brand: &'static str },
    /// Confirmed to have no NVENC core
    NoCore,
    /// NVENC presence could not be determined
    Ambiguous,
    /// Model is not in the dataset
    Unregistered,
    /// Model is registered; core count over its possible variants
    Registered { min_cores: u32, max_cores: u32 },
}

impl Verdict {
    /// Whether the GPU should be counted as H.264 NVENC capable
    pub fn has_nvenc(&self) -> bool {
        match self {
            Self::BrandOverride { .. } | Self::Ambiguous => true,
            Self::NoCore | Self::Unregistered => false,
            Self::Registered { max_cores, .. } => *max_cores > 0,
        }
    }

    /// Upper bound on simultaneous encodes, when the core count is known
    pub fn max_sessions(&self) -> Option<u32> {
        match self {
            Self::Registered { max_cores, .. } => Some(sessions_for(*max_cores)),
            _ => None,
        }
    }

    /// Whether the exact silicon variant (and so the core count) is known
    pub fn is_exact(&self) -> bool {
        matches!(self, Self::Registered { min_cores, max_cores } if min_cores == max_cores)
    }

    /// Short human-readable description
    pub fn summary(&self) -> String {
        match self {
            Self::BrandOverride { brand } => format!("yes ({} brand, unverified)", brand),
            Self::NoCore => "no (no NVENC core)".to_string(),
            Self::Ambiguous => "maybe (uncertain)".to_string(),
            Self::Unregistered => "no (not in dataset)".to_string(),
            Self::Registered {
                min_cores,
                max_cores,
            } if min_cores == max_cores => format!(
                "{} ({} core{}, up to {} sessions)",
                if self.has_nvenc() { "yes" } else { "no" },
                max_cores,
                if *max_cores == 1 { "" } else { "s" },
                sessions_for(*max_cores)
            ),
            Self::Registered {
                min_cores,
                max_cores,
            } => format!(
                "{} ({}-{} cores, possibly up to {} sessions)",
                if self.has_nvenc() { "likely" } else { "no" },
                min_cores,
                max_cores,
                sessions_for(*max_cores)
            ),
        }
    }
}

/// Classifies GPUs against an injected [`ReferenceDataset`]
#[derive(Debug, Clone, Copy)]
pub struct CapabilityResolver<'a> {
    dataset: &'a ReferenceDataset,
}

impl<'a> CapabilityResolver<'a> {
    pub fn new(dataset: &'a ReferenceDataset) -> Self {
        Self { dataset }
    }

    pub fn dataset(&self) -> &'a ReferenceDataset {
        self.dataset
    }

    /// Whether `gpu` should be counted as H.264 NVENC capable
    pub fn has_nvenc(&self, gpu: &GpuRecord) -> bool {
        self.classify(gpu).has_nvenc()
    }

    /// Classify `gpu`, logging the reasoning
    pub fn classify(&self, gpu: &GpuRecord) -> Verdict {
        self.classify_name(&gpu.name)
    }

    /// Classify a bare model name, logging the reasoning
    pub fn classify_name(&self, name: &str) -> Verdict {
        if let Some(brand) = BRAND_OVERRIDES.iter().copied().find(|b| name.contains(b)) {
            warn!(
                "note that having this type of GPU ({}) does not ascertain the availability of NVENC functionality: check the list of supported GPUs at: {}",
                name, SUPPORT_MATRIX_URL
            );
            return Verdict::BrandOverride { brand };
        }

        if self.dataset.none.contains_key(name) {
            warn!("{} appears to have no NVENC core.", name);
            return Verdict::NoCore;
        }

        if self.dataset.ambiguous.contains_key(name) {
            warn!(
                "unable to determine whether {} has an NVENC core. NVENC functionality may not work properly.",
                name
            );
            return Verdict::Ambiguous;
        }

        let Some(tags) = self.dataset.compat.get(name) else {
            warn!(
                "{} is not registered in the list of NVENC-compatible NVIDIA cores. This may mean the core is either too old or too new.",
                name
            );
            return Verdict::Unregistered;
        };

        let cores = tags.iter().map(|tag| self.dataset.cores_for(tag));
        let min_cores = cores.clone().min().unwrap_or(0);
        let max_cores = cores.max().unwrap_or(0);

        if min_cores == max_cores {
            info!(
                "{}: number of NVENC cores: {} (up to {} simultaneous encoding)",
                name,
                max_cores,
                sessions_for(max_cores)
            );
        } else {
            info!(
                "{}: number of NVENC cores: {}-{} (depends; possibly up to {} simultaneous encoding)",
                name,
                min_cores,
                max_cores,
                sessions_for(max_cores)
            );
        }

        if min_cores == 0 {
            warn!(
                "note that {} may _not_ have an NVENC-compatible core, and the functionality may not work properly.",
                name
            );
        }

        Verdict::Registered {
            min_cores,
            max_cores,
        }
    }

    /// Number of GPUs in `gpus` counted as H.264 NVENC capable
    pub fn count_capable<'g>(&self, gpus: impl IntoIterator<Item = &'g GpuRecord>) -> usize {
        gpus.into_iter().filter(|gpu| self.has_nvenc(gpu)).count()
    }
}
