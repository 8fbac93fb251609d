//! CLI argument definitions

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// transcache - inspect a per-file transform cache
#[derive(Parser)]
#[command(name = "tcache")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the cache root directory
    #[arg(long, global = true)]
    pub cache_dir: Option<String>,

    /// Disable caching
    #[arg(long, global = true)]
    pub no_cache: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the content hash a file currently maps to
    Hash(TargetArgs),

    /// Report which tier a fresh process would serve a file from
    Lookup(TargetArgs),

    /// Print the cached transform output stored under a hash
    Show {
        /// Content hash (64 hex characters)
        hash: String,
    },
}

/// A source file plus the inputs its transform depends on.
#[derive(Args)]
pub struct TargetArgs {
    /// Source file
    pub file: PathBuf,

    /// Target platform (e.g. ios, android)
    #[arg(short, long)]
    pub platform: Option<String>,

    /// JSON file holding the transform configuration
    #[arg(short = 't', long)]
    pub transform_config: Option<PathBuf>,
}
