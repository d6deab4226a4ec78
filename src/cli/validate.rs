use anyhow::Result;
use log::info;
use std::path::PathBuf;

use gifti::gifti::GiftiFile;

/// Validate a GIFTI file
pub fn run(file: PathBuf) -> Result<()> {
    info!("GIFTI Validator");
    info!("File: {}", file.display());

    let gifti = match GiftiFile::read(&file) {
        Ok(gifti) => gifti,
        Err(e) => {
            eprintln!("FAILED ({:?}): {}", e.kind(), e);
            std::process::exit(1);
        }
    };

    if let Err(e) = gifti.validate() {
        eprintln!("FAILED ({:?}): {}", e.kind(), e);
        std::process::exit(1);
    }

    for (index, array) in gifti.data_arrays().iter().enumerate() {
        println!(
            "  DataArray {}: {} {} x {:?} ok",
            index,
            array.intent(),
            array.data_type(),
            array.dimensions()
        );
    }
    println!(
        "OK: {} ({} data arrays)",
        file.display(),
        gifti.number_of_data_arrays()
    );
    Ok(())
}
