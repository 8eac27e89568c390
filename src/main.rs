//! sha3sum CLI - compute and check SHA-3 / SHAKE digests

use clap::Parser;
use sha3sum::config::{CliArgs, HashConfig, LogFormat};
use sha3sum::core::hash_target;
use sha3sum::error::{Result, Sha3SumError};
use sha3sum::fs::STDIN_PATH;
use sha3sum::verify::verify_manifest;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() {
    // Parse CLI arguments
    let args = CliArgs::parse();

    init_logging(&args);

    // Handle result
    if let Err(e) = run(args) {
        // the FAIL line already went to stdout
        if !matches!(e, Sha3SumError::DigestMismatch { .. }) {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }
}

fn init_logging(args: &CliArgs) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_directive()));

    // stdout carries result lines only
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    match args.log_format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn run(args: CliArgs) -> Result<()> {
    let config = HashConfig::from_cli(&args)?;

    let targets = if args.files.is_empty() {
        vec![PathBuf::from(STDIN_PATH)]
    } else {
        args.files.clone()
    };

    tracing::debug!(?config, targets = targets.len(), check = args.check, "starting");

    let stdout = std::io::stdout();
    for target in &targets {
        if args.check {
            verify_manifest(target, &config, stdout.lock())?;
        } else {
            hash_target(target, &config, stdout.lock())?;
        }
    }

    Ok(())
}
