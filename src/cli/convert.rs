use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use gifti::gifti::{GiftiFile, GiftiWriter, WriterConfig};
use gifti::vocabulary::{Encoding, Endian, IndexingOrder};

use super::config::Config;

/// Writer settings given on the command line
pub struct Overrides {
    pub encoding: Option<Encoding>,
    pub endian: Option<Endian>,
    pub indexing_order: Option<IndexingOrder>,
    pub compression_level: Option<u32>,
}

/// Re-encode `input` into `output`
pub fn run(
    input: PathBuf,
    output: PathBuf,
    overrides: Overrides,
    config_path: Option<PathBuf>,
) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("Input file does not exist: {}", input.display());
    }

    let mut config = WriterConfig::default();
    if let Some(path) = &config_path {
        Config::from_file(path)?.write.apply_to(&mut config);
    }
    if overrides.encoding.is_some() {
        config.encoding = overrides.encoding;
    }
    if overrides.endian.is_some() {
        config.endian = overrides.endian;
    }
    if overrides.indexing_order.is_some() {
        config.indexing_order = overrides.indexing_order;
    }
    if let Some(level) = overrides.compression_level {
        config.compression_level = level;
    }

    info!("Input:  {}", input.display());
    info!("Output: {}", output.display());
    info!("Writer config: {:?}", config);

    let file = GiftiFile::read(&input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let stats = GiftiWriter::new(config)
        .write_file(&file, &output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!("{}", stats);
    Ok(())
}
