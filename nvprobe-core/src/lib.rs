//! nvprobe Core Library
//!
//! Counts the NVIDIA GPUs on this machine that can encode H.264 with NVENC.
//!
//! This library provides:
//! - `nvidia-smi` discovery and output parsing (driver version, GPU list)
//! - A versioned GPU-to-NVENC reference dataset
//! - Capability resolution from GPU model names
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐    ┌──────────────┐    ┌─────────────────────┐
//! │ Command Locator │───▶│ nvidia-smi   │───▶│ Capability Resolver │
//! │ (which/where)   │    │ (-L, driver) │    │ (dataset lookup)    │
//! └─────────────────┘    └──────────────┘    └─────────────────────┘
//! ```
//!
//! The library only emits `tracing` events; installing a subscriber is up
//! to the caller.

pub mod capability;
pub mod config;
pub mod dataset;
pub mod error;
pub mod locate;
pub mod probe;
pub mod runner;
pub mod smi;
pub mod types;

pub use capability::{CapabilityResolver, Verdict};
pub use config::{ConfigFile, ProbeConfig};
pub use dataset::ReferenceDataset;
pub use error::{NvprobeError, Result};
pub use probe::{count_nvenc_gpus, number_of_nvenc_gpus, NvencProbe, ProbeReport};
pub use runner::{CommandOutput, CommandRunner, SystemRunner};
pub use smi::{Enumeration, SmiProbe};
pub use types::{DriverVersion, GpuRecord};
