//! NVENC reference dataset
//!
//! A versioned lookup table mapping GPU model names to NVENC core types and
//! core types to H.264 NVENC core counts. The table is data, not code: a
//! default copy is bundled from `data/nvenc_h264.toml` and a replacement
//! can be loaded from any TOML file with the same layout.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{NvprobeError, Result};

const BUNDLED: &str = include_str!("../data/nvenc_h264.toml");

/// Which lookup table a model name was found in
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    /// Confirmed to have no NVENC core
    None,
    /// NVENC presence uncertain
    Ambiguous,
    /// Registered with one or more core types
    Compat,
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Ambiguous => write!(f, "ambiguous"),
            Self::Compat => write!(f, "compat"),
        }
    }
}

/// A model name registered in more than one section
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Overlap {
    pub name: String,
    pub sections: Vec<Section>,
}

/// GPU-to-NVENC compatibility table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceDataset {
    /// Dataset revision, informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Model name -> marker, for GPUs with no NVENC core
    #[serde(default)]
    pub none: BTreeMap<String, String>,

    /// Model name -> marker, for GPUs whose NVENC presence is uncertain
    #[serde(default)]
    pub ambiguous: BTreeMap<String, String>,

    /// Model name -> possible core types, in dataset order
    #[serde(default)]
    pub compat: BTreeMap<String, Vec<String>>,

    /// Core type -> H.264 NVENC core count
    #[serde(default)]
    pub nvenc_cores_h264: BTreeMap<String, u32>,
}

impl ReferenceDataset {
    /// The table shipped with this build
    pub fn bundled() -> Result<Self> {
        Self::from_toml_str(BUNDLED).map_err(|e| e.with_context("bundled dataset"))
    }

    /// Parse a dataset from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| NvprobeError::dataset(format!("Failed to parse dataset: {}", e)))
    }

    /// Load a dataset from a TOML file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| NvprobeError::dataset_file(path, format!("Failed to read: {}", e)))?;
        let dataset: Self = toml::from_str(&content)
            .map_err(|e| NvprobeError::dataset_file(path, format!("Failed to parse: {}", e)))?;

        info!(
            "Loaded NVENC dataset {} from {:?}",
            dataset.version.as_deref().unwrap_or("(unversioned)"),
            path
        );
        Ok(dataset)
    }

    /// Mark `name` as having no NVENC core
    pub fn with_none(mut self, name: impl Into<String>) -> Self {
        self.none.insert(name.into(), String::new());
        self
    }

    /// Mark `name` as uncertain
    pub fn with_ambiguous(mut self, name: impl Into<String>) -> Self {
        self.ambiguous.insert(name.into(), String::new());
        self
    }

    /// Register `name` with its possible core types
    pub fn with_compat<I, S>(mut self, name: impl Into<String>, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.compat
            .insert(name.into(), tags.into_iter().map(Into::into).collect());
        self
    }

    /// Set the H.264 NVENC core count of a core type
    pub fn with_cores(mut self, tag: impl Into<String>, cores: u32) -> Self {
        self.nvenc_cores_h264.insert(tag.into(), cores);
        self
    }

    /// Core count of a core type; unknown types have none
    pub fn cores_for(&self, tag: &str) -> u32 {
        self.nvenc_cores_h264.get(tag).copied().unwrap_or(0)
    }

    /// Every section `name` is registered in, in lookup order
    pub fn sections_of(&self, name: &str) -> Vec<Section> {
        let mut sections = Vec::new();
        if self.none.contains_key(name) {
            sections.push(Section::None);
        }
        if self.ambiguous.contains_key(name) {
            sections.push(Section::Ambiguous);
        }
        if self.compat.contains_key(name) {
            sections.push(Section::Compat);
        }
        sections
    }

    /// Model names registered in more than one section
    pub fn overlaps(&self) -> Vec<Overlap> {
        let names: BTreeSet<&String> = self
            .none
            .keys()
            .chain(self.ambiguous.keys())
            .chain(self.compat.keys())
            .collect();

        names
            .into_iter()
            .filter_map(|name| {
                let sections = self.sections_of(name);
                (sections.len() > 1).then(|| Overlap {
                    name: name.clone(),
                    sections,
                })
            })
            .collect()
    }

    /// Core types referenced from `compat` but missing a core count
    pub fn dangling_tags(&self) -> Vec<String> {
        let tags: BTreeSet<&String> = self
            .compat
            .values()
            .flatten()
            .filter(|tag| !self.nvenc_cores_h264.contains_key(tag.as_str()))
            .collect();
        tags.into_iter().cloned().collect()
    }

    /// Fail if any model name is registered in more than one section
    pub fn validate(&self) -> Result<()> {
        let overlaps = self.overlaps();
        if overlaps.is_empty() {
            return Ok(());
        }

        let names: Vec<String> = overlaps
            .iter()
            .map(|o| {
                let sections: Vec<String> = o.sections.iter().map(|s| s.to_string()).collect();
                format!("{} ({})", o.name, sections.join("+"))
            })
            .collect();
        Err(NvprobeError::dataset(format!(
            "model names registered in more than one section: {}",
            names.join(", ")
        )))
    }

    /// Apply the consistency policy
    ///
    /// Strict mode rejects overlapping sections. Otherwise overlaps are
    /// logged and lookups keep their first-match-wins order.
    pub fn checked(self, strict: bool) -> Result<Self> {
        if strict {
            self.validate()?;
        } else {
            for overlap in self.overlaps() {
                warn!(
                    "{} is registered in several dataset sections ({:?}); the first one wins",
                    overlap.name, overlap.sections
                );
            }
        }

        for tag in self.dangling_tags() {
            debug!("core type {} has no H.264 core count; treating it as 0", tag);
        }

        Ok(self)
    }

    /// Number of model names across all sections
    pub fn model_count(&self) -> usize {
        self.none.len() + self.ambiguous.len() + self.compat.len()
    }
}
