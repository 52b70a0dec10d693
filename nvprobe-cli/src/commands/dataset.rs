//! Dataset command - summarize the NVENC reference table

use anyhow::Result;
use nvprobe_core::ProbeConfig;

/// Show dataset version, section sizes and consistency problems
pub fn dataset(config: &ProbeConfig) -> Result<()> {
    let dataset = config.load_dataset()?;

    println!("nvprobe - NVENC Dataset\n");

    match &config.dataset_path {
        Some(path) => println!("Source:     {}", path.display()),
        None => println!("Source:     bundled"),
    }
    println!(
        "Version:    {}",
        dataset.version.as_deref().unwrap_or("(unversioned)")
    );
    println!();
    println!("  No NVENC:    {:>4} models", dataset.none.len());
    println!("  Ambiguous:   {:>4} models", dataset.ambiguous.len());
    println!("  Registered:  {:>4} models", dataset.compat.len());
    println!("  Core types:  {:>4}", dataset.nvenc_cores_h264.len());

    let overlaps = dataset.overlaps();
    let dangling = dataset.dangling_tags();
    if overlaps.is_empty() && dangling.is_empty() {
        println!("\n[OK] No consistency problems.");
        return Ok(());
    }

    if !overlaps.is_empty() {
        println!("\n[!!] Models listed in more than one section (first one wins):");
        for overlap in &overlaps {
            let sections: Vec<String> = overlap.sections.iter().map(|s| s.to_string()).collect();
            println!("    - {} ({})", overlap.name, sections.join(", "));
        }
    }

    if !dangling.is_empty() {
        println!("\n[!!] Core types without an H.264 core count (treated as 0):");
        for tag in &dangling {
            println!("    - {}", tag);
        }
    }

    Ok(())
}
