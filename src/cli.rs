use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "autogas-pin")]
#[command(about = "Pin Autogas NFT artwork and metadata to IPFS", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (default: ~/.autogas-pin/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Image to upload (overrides the config file). Defaults to assets/Autogas.jpg
    /// next to the executable, else in the source tree the binary was built from
    #[arg(long, global = true)]
    pub asset: Option<PathBuf>,

    /// Directory for scratch metadata files (overrides the config file)
    #[arg(long, global = true)]
    pub work_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Defaults to `single` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Upload the image and metadata for a single token
    Single,
    /// Upload the image once and metadata for tokens 1..=count
    Batch(BatchCmd),
    /// Verify Pinata credentials without uploading
    Check,
}

#[derive(Parser)]
pub struct BatchCmd {
    /// Number of tokens in the collection
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub count: u32,
}
