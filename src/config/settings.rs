//! Configuration settings for sha3sum
//!
//! Defines the CLI arguments, the closed set of hash algorithms and the
//! immutable [`HashConfig`] handed to the walker, the worker pool and the
//! verification driver.

use crate::error::{Result, Sha3SumError};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::str::FromStr;

/// Output length used by extendable-output algorithms when none is given
pub const DEFAULT_OUTPUT_LENGTH: usize = 32;

/// Worker count for directory hashing
pub const DEFAULT_WORKERS: usize = 8;

/// Capacity of both the path queue and the result queue
pub const QUEUE_CAPACITY: usize = 512;

/// Read buffer used while streaming a file into a hasher
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// sha3sum - compute and check SHA-3 and SHAKE message digests
#[derive(Parser, Debug, Clone)]
#[command(name = "sha3sum")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Compute and check SHA-3 / SHAKE digests of files and directory trees")]
#[command(long_about = r#"
Print or check SHA-3 family checksums.

Directories are hashed recursively by a pool of worker threads; output
lines appear in completion order. With no FILE, or when FILE is -, read
standard input.

Examples:
  sha3sum file.iso                      # SHAKE256, 32 byte output
  sha3sum -t sum512 file.iso            # SHA3-512
  sha3sum -t shake128 -l 64 dir/        # recursive, 64 byte output
  sha3sum dir/ > SUMS && sha3sum -c SUMS
"#)]
pub struct CliArgs {
    /// Files or directories to hash (manifests with --check)
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Hash algorithm: sum224, sum256, sum384, sum512, shake128, shake256
    #[arg(short = 't', long = "type", env = "SHA3SUM_TYPE", default_value = "shake256", value_name = "ALGO")]
    pub algorithm: String,

    /// Output length in bytes for shake algorithms
    #[arg(short = 'l', long, default_value_t = DEFAULT_OUTPUT_LENGTH, value_name = "BYTES")]
    pub length: usize,

    /// Number of workers for recursive hashing (0 = one per CPU)
    #[arg(short = 'w', long, env = "SHA3SUM_WORKERS", default_value_t = DEFAULT_WORKERS, value_name = "NUM")]
    pub workers: usize,

    /// Read checksums from the FILEs and check them
    #[arg(short = 'c', long)]
    pub check: bool,

    /// Read buffer size per file (e.g., 64K, 1M)
    #[arg(short = 'b', long, default_value = "64K", value_name = "SIZE")]
    pub buffer_size: String,

    /// Verbose logging (can be repeated: -v, -vv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short = 'q', long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(long, value_enum, default_value = "text")]
    pub log_format: LogFormat,
}

impl CliArgs {
    /// Default log directive derived from -v / -q
    pub fn log_directive(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

/// Log line format
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable text
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// Hash algorithm selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HashAlgorithm {
    /// SHA3-224 (28 bytes)
    Sum224,
    /// SHA3-256 (32 bytes)
    Sum256,
    /// SHA3-384 (48 bytes)
    Sum384,
    /// SHA3-512 (64 bytes)
    Sum512,
    /// SHAKE128, caller-chosen length
    Shake128,
    /// SHAKE256, caller-chosen length
    #[default]
    Shake256,
}

impl HashAlgorithm {
    /// Every supported algorithm
    pub const ALL: [HashAlgorithm; 6] = [
        Self::Sum224,
        Self::Sum256,
        Self::Sum384,
        Self::Sum512,
        Self::Shake128,
        Self::Shake256,
    ];

    /// Whether the digest length is chosen by the caller
    pub fn is_extendable(&self) -> bool {
        matches!(self, Self::Shake128 | Self::Shake256)
    }

    /// Digest size in bytes for a given requested length.
    ///
    /// Fixed-output algorithms ignore `requested`.
    pub fn output_size(&self, requested: usize) -> usize {
        match self {
            Self::Sum224 => 28,
            Self::Sum256 => 32,
            Self::Sum384 => 48,
            Self::Sum512 => 64,
            Self::Shake128 | Self::Shake256 => requested,
        }
    }

    /// Selector name as accepted on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sum224 => "sum224",
            Self::Sum256 => "sum256",
            Self::Sum384 => "sum384",
            Self::Sum512 => "sum512",
            Self::Shake128 => "shake128",
            Self::Shake256 => "shake256",
        }
    }
}

impl std::fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = Sha3SumError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sum224" | "sha3-224" => Ok(Self::Sum224),
            "sum256" | "sha3-256" => Ok(Self::Sum256),
            "sum384" | "sha3-384" => Ok(Self::Sum384),
            "sum512" | "sha3-512" => Ok(Self::Sum512),
            "shake128" => Ok(Self::Shake128),
            "shake256" => Ok(Self::Shake256),
            _ => Err(Sha3SumError::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Immutable runtime configuration, built once per invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashConfig {
    /// Hash algorithm
    pub algorithm: HashAlgorithm,
    /// Requested output length for extendable-output algorithms
    pub output_length: usize,
    /// Worker count for directory mode (0 = auto-detect)
    pub workers: usize,
    /// Capacity of the path and result queues
    pub queue_capacity: usize,
    /// Read buffer size in bytes
    pub buffer_size: usize,
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            algorithm: HashAlgorithm::default(),
            output_length: DEFAULT_OUTPUT_LENGTH,
            workers: DEFAULT_WORKERS,
            queue_capacity: QUEUE_CAPACITY,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl HashConfig {
    /// Create a validated config for the given algorithm and output length
    pub fn new(algorithm: HashAlgorithm, output_length: usize) -> Result<Self> {
        let config = Self {
            algorithm,
            output_length,
            ..Default::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Replace the worker count
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Check invariants that every component relies on
    pub fn validate(&self) -> Result<()> {
        if self.algorithm.is_extendable() && self.output_length == 0 {
            return Err(Sha3SumError::InvalidLength(self.output_length));
        }
        if self.queue_capacity == 0 {
            return Err(Sha3SumError::config("queue capacity must be at least 1"));
        }
        if self.buffer_size == 0 {
            return Err(Sha3SumError::config("buffer size must be at least 1 byte"));
        }
        Ok(())
    }

    /// Number of bytes every digest produced under this config will have
    pub fn digest_length(&self) -> usize {
        self.algorithm.output_size(self.output_length)
    }

    /// Worker count with auto-detection resolved
    pub fn effective_workers(&self) -> usize {
        if self.workers == 0 {
            num_cpus::get()
        } else {
            self.workers
        }
    }

    /// Create config from CLI arguments
    pub fn from_cli(args: &CliArgs) -> Result<Self> {
        let buffer_size = parse_size(&args.buffer_size)
            .map_err(|e| Sha3SumError::config(format!("Invalid buffer size: {}", e)))?;

        let config = Self {
            algorithm: args.algorithm.parse()?,
            output_length: args.length,
            workers: args.workers,
            queue_capacity: QUEUE_CAPACITY,
            buffer_size: usize::try_from(buffer_size)
                .map_err(|_| Sha3SumError::config("buffer size too large"))?,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Parse human-readable size string to bytes
pub fn parse_size(size: &str) -> std::result::Result<u64, String> {
    let size = size.trim().to_uppercase();

    if size.is_empty() {
        return Err("Empty size string".to_string());
    }

    let digits_end = size
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(size.len());
    let (num_str, suffix) = size.split_at(digits_end);

    let multiplier: u64 = match suffix.trim() {
        "" | "B" => 1,
        "K" | "KB" => 1024,
        "M" | "MB" => 1024 * 1024,
        "G" | "GB" => 1024 * 1024 * 1024,
        other => return Err(format!("Unknown size suffix: {}", other)),
    };

    let num: f64 = num_str
        .parse()
        .map_err(|_| format!("Invalid number: {}", num_str))?;

    Ok((num * multiplier as f64) as u64)
}
