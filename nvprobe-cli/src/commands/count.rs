//! Count command - print the number of NVENC-capable GPUs

use anyhow::Result;
use nvprobe_core::{count_nvenc_gpus, ProbeConfig, SystemRunner};

/// Print the number of H.264 NVENC-capable GPUs
///
/// Behaves like the library's `number_of_nvenc_gpus`: prints 0 when
/// nothing can be detected, including when the dataset fails to load. The
/// reason is in the warnings. `nvprobe dataset` reports dataset errors as
/// a failing exit status instead.
pub fn count(config: &ProbeConfig) -> Result<()> {
    println!("{}", count_nvenc_gpus(SystemRunner, config));
    Ok(())
}
