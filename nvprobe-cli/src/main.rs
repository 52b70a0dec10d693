//! nvprobe CLI
//!
//! Count the NVIDIA GPUs on this machine that can encode H.264 with NVENC.
//!
//! # Usage
//!
//! ```bash
//! # Print the number of NVENC-capable GPUs
//! nvprobe count
//!
//! # Show every GPU and how it was classified
//! nvprobe list
//!
//! # Look up a model without touching the hardware
//! nvprobe check "GeForce GTX 1650"
//! ```

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use nvprobe_core::config::{ConfigFile, ProbeConfig};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// nvprobe - NVENC H.264 capability detection
#[derive(Parser)]
#[command(name = "nvprobe")]
#[command(author = "GhostKellz")]
#[command(version)]
#[command(about = "Count the NVIDIA GPUs that can encode H.264 with NVENC", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use this NVENC dataset instead of the configured or bundled one
    #[arg(long, global = true, value_name = "PATH")]
    dataset: Option<PathBuf>,

    /// Reject datasets that list a GPU in more than one section
    #[arg(long, global = true)]
    strict: bool,

    /// Subcommand to run (defaults to `count`)
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the number of NVENC-capable GPUs
    Count,

    /// List GPUs and their NVENC classification
    #[command(alias = "ls")]
    List(commands::ListArgs),

    /// Classify GPU model names against the dataset
    Check(commands::CheckArgs),

    /// Show information about the NVENC dataset
    Dataset,

    /// Manage the configuration file
    Config(commands::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Warnings are the only signal for most failures, so show them by default
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(format!("nvprobe_core={}", level).parse()?)
                .add_directive(format!("nvprobe={}", level).parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut config = ProbeConfig::from(&ConfigFile::load_or_default());
    if let Some(path) = cli.dataset {
        config = config.with_dataset_path(path);
    }
    if cli.strict {
        config = config.with_strict_dataset(true);
    }

    match cli.command.unwrap_or(Commands::Count) {
        Commands::Count => commands::count(&config)?,
        Commands::List(args) => commands::list(&config, args)?,
        Commands::Check(args) => commands::check(&config, args)?,
        Commands::Dataset => commands::dataset(&config)?,
        Commands::Config(args) => commands::config(&config, args)?,
    }

    Ok(())
}
