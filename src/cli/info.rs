use anyhow::{Context, Result};
use std::path::PathBuf;

use gifti::gifti::GiftiFile;

/// Display information about a GIFTI file
pub fn run(file: PathBuf, json: bool) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let gifti = GiftiFile::read(&file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let summary = gifti.summary();

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("GIFTI File Information");
    println!("======================");
    println!("File: {}", file.display());
    println!("Version: {:.1}", summary.version);
    println!();

    if !summary.metadata.is_empty() {
        println!("Metadata:");
        for entry in &summary.metadata {
            let value_preview = if entry.value.chars().count() > 100 {
                let head: String = entry.value.chars().take(100).collect();
                format!("{}... ({} bytes)", head, entry.value.len())
            } else {
                entry.value.clone()
            };
            println!("  {}: {}", entry.key, value_preview);
        }
        println!();
    }

    if summary.label_count > 0 {
        println!("Label table: {} labels", summary.label_count);
        println!();
    }

    println!("Data arrays: {}", summary.data_arrays.len());
    for array in &summary.data_arrays {
        println!(
            "  {:3}. {} {} {:?}",
            array.index, array.intent, array.data_type, array.dimensions
        );
        println!(
            "       {} / {} / {}",
            array.encoding, array.endian, array.indexing_order
        );
        if let (Some(min), Some(max)) = (array.min, array.max) {
            println!("       range [{}, {}]", min, max);
        }
        if array.matrix_count > 0 || array.metadata_count > 0 {
            println!(
                "       {} transforms, {} metadata entries",
                array.matrix_count, array.metadata_count
            );
        }
    }

    Ok(())
}
