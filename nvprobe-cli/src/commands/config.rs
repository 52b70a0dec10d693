//! Config command - manage configuration files

use std::path::Path;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use nvprobe_core::config::{sample_config, ConfigFile, ProbeConfig};

/// Arguments for the config command
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show where the config file and the NVENC dataset are read from
    Path,

    /// Show the settings in effect, after --dataset and --strict
    Show,

    /// Generate a config file, recording --dataset and --strict if given
    Init {
        /// Force overwrite if file exists
        #[arg(short, long)]
        force: bool,
    },

    /// Print a sample configuration to stdout
    Sample,
}

/// Run config subcommand
pub fn config(effective: &ProbeConfig, args: ConfigArgs) -> Result<()> {
    let path = ConfigFile::default_path();

    match args.command {
        ConfigCommand::Path => {
            println!("Config:   {}{}", path.display(), presence(&path));
            println!("Dataset:  {}", effective.dataset_source());
            println!("Command:  {}", effective.command);
        }
        ConfigCommand::Show => {
            if path.exists() {
                println!("# Settings from {} and command-line flags\n", path.display());
            } else {
                println!("# No configuration file at {}; defaults and command-line flags\n", path.display());
            }

            let rendered = toml::to_string_pretty(&ConfigFile::from(effective))
                .context("Failed to render configuration")?;
            print!("{}", rendered);
            if effective.dataset_path.is_none() {
                println!("# dataset.path unset: using the bundled NVENC dataset");
            }
        }
        ConfigCommand::Init { force } => {
            if path.exists() && !force {
                println!("Configuration file already exists: {}", path.display());
                println!();
                println!("Use --force to overwrite, or edit the existing file.");
                return Ok(());
            }

            // A plain init gets the commented sample; flags are recorded as settings
            if effective.is_default() {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent).context("Failed to create config directory")?;
                }
                std::fs::write(&path, sample_config()).context("Failed to write config file")?;
            } else {
                ConfigFile::from(effective).save_to(path.clone())?;
            }

            println!("Created configuration file: {}", path.display());
            println!("NVENC dataset: {}", effective.dataset_source());
            if effective.strict_dataset {
                println!("Strict mode: datasets listing a GPU in several sections are rejected");
            }
        }
        ConfigCommand::Sample => {
            print!("{}", sample_config());
        }
    }

    Ok(())
}

fn presence(path: &Path) -> &'static str {
    if path.exists() {
        ""
    } else {
        " (not created yet; run `nvprobe config init`)"
    }
}
