//! List command - show every GPU and its NVENC classification

use anyhow::Result;
use clap::Args;
use nvprobe_core::{NvencProbe, ProbeConfig, SystemRunner};

/// Arguments for the list command
#[derive(Args)]
pub struct ListArgs {
    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Fail instead of printing an empty list when nvidia-smi is unusable
    #[arg(long)]
    pub fail: bool,
}

/// List GPUs and their NVENC classification
pub fn list(config: &ProbeConfig, args: ListArgs) -> Result<()> {
    let probe = NvencProbe::from_config(SystemRunner, config)?;
    let report = if args.fail {
        probe.try_report()?
    } else {
        probe.report()
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("nvprobe - NVIDIA GPUs\n");

    match report.driver {
        Some(driver) => println!("Driver: {}", driver),
        None => println!("Driver: unknown"),
    }
    println!();

    if report.gpus.is_empty() {
        println!("No GPUs found.");
        println!("\nRun with -v to see why nvidia-smi reported nothing.");
        return Ok(());
    }

    println!("{:<6} {:<32} {:<24} {}", "Index", "Name", "UUID", "NVENC (H.264)");
    println!("{}", "-".repeat(100));

    for entry in &report.gpus {
        let index = if entry.gpu.is_unknown() {
            "?".to_string()
        } else {
            entry.gpu.index.to_string()
        };

        println!(
            "{:<6} {:<32} {:<24} {}",
            index,
            truncate(&entry.gpu.name, 30),
            truncate(&entry.gpu.uuid, 22),
            entry.verdict.summary()
        );
    }

    println!(
        "\n{} of {} GPU(s) can encode H.264 with NVENC.",
        report.nvenc_count(),
        report.gpu_count()
    );

    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max - 3).collect();
        format!("{}...", head)
    }
}
