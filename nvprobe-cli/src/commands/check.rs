//! Check command - classify model names without running nvidia-smi

use anyhow::Result;
use clap::Args;
use nvprobe_core::{CapabilityResolver, ProbeConfig};

/// Arguments for the check command
#[derive(Args)]
pub struct CheckArgs {
    /// GPU model names exactly as `nvidia-smi -L` prints them
    #[arg(required = true, value_name = "NAME")]
    pub names: Vec<String>,
}

/// Classify each name against the configured dataset
pub fn check(config: &ProbeConfig, args: CheckArgs) -> Result<()> {
    let dataset = config.load_dataset()?;
    let resolver = CapabilityResolver::new(&dataset);

    let width = args.names.iter().map(|n| n.len()).max().unwrap_or(0);
    for name in &args.names {
        let verdict = resolver.classify_name(name);
        println!("{:<width$}  {}", name, verdict.summary(), width = width);
    }

    Ok(())
}
