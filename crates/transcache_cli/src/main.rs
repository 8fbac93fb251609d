//! transcache CLI
//!
//! Operator tooling for a transform cache root.

mod cli;

use std::process::ExitCode;

use clap::Parser;
use miette::{IntoDiagnostic, Result};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use transcache_core::{
    CacheConfig, CacheCoordinator, ContentHash, Lookup, ResolvedPath, TransformContext,
};

use crate::cli::{Cli, Commands, TargetArgs};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(2)
        }
    }
}

/// Returns `Ok(false)` for a miss or an absent entry.
fn run(cli: Cli) -> Result<bool> {
    let config = load_config(&cli)?;

    match &cli.command {
        Commands::Hash(target) => run_hash(&config, target).map(|_| true),
        Commands::Lookup(target) => run_lookup(&config, target),
        Commands::Show { hash } => run_show(&config, hash),
    }
}

fn load_config(cli: &Cli) -> Result<CacheConfig> {
    let mut config = if let Some(ref path) = cli.config {
        CacheConfig::from_file(path).into_diagnostic()?
    } else if let Some(path) = CacheConfig::discover(".") {
        info!("Using config: {}", path.display());
        CacheConfig::from_file(&path).into_diagnostic()?
    } else {
        CacheConfig::new()
    };

    if let Some(ref dir) = cli.cache_dir {
        config.cache_dir = dir.clone();
        config.base_dir = None;
    }
    if cli.no_cache {
        config.enabled = false;
    }

    Ok(config)
}

fn resolve_target(target: &TargetArgs) -> Result<(ResolvedPath, TransformContext)> {
    let absolute = std::path::absolute(&target.file).into_diagnostic()?;
    let path = ResolvedPath::new(absolute).into_diagnostic()?;

    let transform_config = match &target.transform_config {
        Some(file) => {
            let content = std::fs::read_to_string(file).into_diagnostic()?;
            serde_json::from_str::<serde_json::Value>(&content).into_diagnostic()?
        }
        None => serde_json::json!({}),
    };
    let context =
        TransformContext::new(target.platform.as_deref(), &transform_config).into_diagnostic()?;

    Ok((path, context))
}

fn run_hash(config: &CacheConfig, target: &TargetArgs) -> Result<()> {
    let (path, context) = resolve_target(target)?;
    let cache = CacheCoordinator::new(config);
    let hash = cache.hash_for(&path, &context).into_diagnostic()?;
    println!("{}", hash);
    Ok(())
}

fn run_lookup(config: &CacheConfig, target: &TargetArgs) -> Result<bool> {
    let (path, context) = resolve_target(target)?;
    let cache = CacheCoordinator::new(config);

    match cache.lookup(&path, &context).into_diagnostic()? {
        Lookup::Hit { source, hash, .. } => {
            let source = transcache_core::CacheSource::from(source);
            match hash {
                Some(hash) => println!("{} {}", source, hash),
                None => println!("{}", source),
            }
            Ok(true)
        }
        Lookup::Miss(miss) => {
            match miss.hash() {
                Some(hash) => println!("miss {}", hash),
                None => println!("miss"),
            }
            Ok(false)
        }
    }
}

fn run_show(config: &CacheConfig, hash: &str) -> Result<bool> {
    let hash: ContentHash = hash.parse().into_diagnostic()?;
    let cache = CacheCoordinator::new(config);

    match cache.filesystem().read(&hash).into_diagnostic()? {
        Some(content) => {
            print!("{}", content);
            Ok(true)
        }
        None => {
            eprintln!("No cache entry for {}", hash);
            Ok(false)
        }
    }
}
