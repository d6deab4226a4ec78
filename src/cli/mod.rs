use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use gifti::vocabulary::{Encoding, Endian, IndexingOrder};

mod config;
mod convert;
mod info;
mod validate;

/// GIFTI - inspect, validate and re-encode GIFTI files
#[derive(Parser)]
#[command(name = "gifti")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display information about a GIFTI file
    Info {
        /// Input GIFTI file path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a GIFTI file
    Validate {
        /// Input GIFTI file path
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Re-encode a GIFTI file
    Convert {
        /// Input GIFTI file path
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output GIFTI file path
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Payload encoding for all arrays (ASCII, Base64Binary, GZipBase64Binary, ExternalFileBinary)
        #[arg(short, long)]
        encoding: Option<Encoding>,

        /// Byte order for binary payloads (BigEndian, LittleEndian)
        #[arg(long)]
        endian: Option<Endian>,

        /// Indexing order of written payloads (RowMajorOrder, ColumnMajorOrder)
        #[arg(long)]
        order: Option<IndexingOrder>,

        /// zlib level for GZipBase64Binary (0-9)
        #[arg(short = 'c', long)]
        compression_level: Option<u32>,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Info { file, json } => info::run(file, json),
        Commands::Validate { file } => validate::run(file),
        Commands::Convert {
            input,
            output,
            encoding,
            endian,
            order,
            compression_level,
            config,
        } => convert::run(
            input,
            output,
            convert::Overrides {
                encoding,
                endian,
                indexing_order: order,
                compression_level,
            },
            config,
        ),
    }
}
