//! # GIFTI command-line tool
//!
//! ## Usage
//!
//! ```bash
//! # Summarize a file
//! gifti info lh.pial.surf.gii
//!
//! # Check a file parses and satisfies the array invariants
//! gifti validate lh.pial.surf.gii
//!
//! # Re-encode every array as compressed base64
//! gifti convert in.surf.gii out.surf.gii --encoding GZipBase64Binary
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
