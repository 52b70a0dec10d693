//! Shared types for nvprobe

use serde::{Deserialize, Serialize};

/// Minimum driver major version with the NVENC interface nvprobe expects
pub const MIN_DRIVER_MAJOR: u32 = 450;

/// NVIDIA driver version as reported by `nvidia-smi`
///
/// Only the first two components are significant; `535.104.05` is
/// `535.104`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DriverVersion {
    pub major: u32,
    pub minor: u32,
}

impl DriverVersion {
    pub fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Drivers older than 450.xx belong to a known-incompatible era
    pub fn is_supported(&self) -> bool {
        self.major >= MIN_DRIVER_MAJOR
    }
}

impl std::fmt::Display for DriverVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:02}", self.major, self.minor)
    }
}

/// One GPU as listed by `nvidia-smi -L`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GpuRecord {
    /// Device index, `-1` for a line that could not be parsed
    pub index: i32,
    /// Marketing name, e.g. "GeForce RTX 3080"
    pub name: String,
    /// Device UUID, e.g. "GPU-1234abcd"
    pub uuid: String,
}

impl GpuRecord {
    /// Name carried by records for unparseable lines
    pub const UNKNOWN_NAME: &'static str = "<unknown>";

    pub fn new(index: i32, name: impl Into<String>, uuid: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
            uuid: uuid.into(),
        }
    }

    /// Placeholder for a listing line that did not match the expected format
    ///
    /// The GPU still counts as present but never matches the dataset.
    pub fn unknown() -> Self {
        Self::new(-1, Self::UNKNOWN_NAME, "0")
    }

    pub fn is_unknown(&self) -> bool {
        self.index < 0
    }
}

impl std::fmt::Display for GpuRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GPU {}: {} (UUID: {})", self.index, self.name, self.uuid)
    }
}
