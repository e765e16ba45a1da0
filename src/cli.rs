use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{OutputFormat, Width};
use crate::logging::LogArgs;

#[derive(Debug, Args)]
pub struct SeedArgs {
    /// 64-bit seed (negative values allowed)
    #[arg(short = 's', long, allow_negative_numbers = true, conflicts_with_all = ["seed_hex", "seed_phrase"])]
    pub seed: Option<i64>,

    /// 32-byte key as 64 hex characters
    #[arg(long = "seed-hex", conflicts_with = "seed_phrase")]
    pub seed_hex: Option<String>,

    /// Derive the key from a passphrase (BLAKE2b-256)
    #[arg(long = "seed-phrase")]
    pub seed_phrase: Option<String>,
}

#[derive(Debug, Parser)]
#[command(
    name = "chacharng",
    about = "Deterministic ChaCha20 random number generator"
)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(flatten)]
    pub seed: SeedArgs,

    /// Number of values to draw (default: 16)
    #[arg(short = 'n', long = "count")]
    pub count: Option<usize>,

    /// Width of each value (default: u32)
    #[arg(short = 'w', long, value_enum)]
    pub width: Option<Width>,

    /// Output format (default: decimal)
    #[arg(short = 'f', long = "format", value_enum)]
    pub format: Option<OutputFormat>,

    /// Start drawing at this 32-bit word position
    #[arg(long = "word-pos")]
    pub word_pos: Option<u128>,

    /// Write output to a file instead of stdout
    #[arg(short = 'o', long = "output-file")]
    pub output_file: Option<PathBuf>,

    /// Configuration file path (default: /etc/chacharng.toml)
    #[arg(long = "config")]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub log: LogArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run known-answer vectors, a rand_chacha cross-check and FIPS 140-2 tests
    Check(CheckArgs),
    /// Print the derived key and first keystream blocks for a seed
    Vectors(VectorsArgs),
}

#[derive(Debug, Parser)]
pub struct CheckArgs {
    /// Seed used for the cross-check and statistical tests
    #[arg(short = 's', long, default_value_t = 0, allow_negative_numbers = true)]
    pub seed: i64,

    /// Number of 2500-byte FIPS 140-2 samples
    #[arg(long, default_value_t = 16)]
    pub samples: usize,

    /// Number of draws compared against rand_chacha
    #[arg(long, default_value_t = 100_000)]
    pub draws: usize,

    #[command(flatten)]
    pub log: LogArgs,
}

#[derive(Debug, Parser)]
pub struct VectorsArgs {
    /// Seed to expand
    #[arg(short = 's', long, default_value_t = 0, allow_negative_numbers = true)]
    pub seed: i64,

    /// Number of 64-byte blocks to print
    #[arg(short = 'b', long, default_value_t = 1)]
    pub blocks: u64,

    #[command(flatten)]
    pub log: LogArgs,
}
