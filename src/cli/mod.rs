// src/cli/mod.rs — Command-line interface

pub mod progress;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "tandem",
    version,
    about = "Solver/reviewer improvement rounds for local models"
)]
pub struct Cli {
    /// Problem statement to solve.
    pub problem: Option<String>,

    /// Number of improvement rounds (clamped to the configured range).
    #[arg(short, long)]
    pub rounds: Option<u8>,

    /// Path to a config file (default: ./tandem.toml when present).
    #[arg(short, long)]
    pub config: Option<String>,

    /// Print the buffered run result as JSON instead of streaming.
    #[arg(long)]
    pub json: bool,

    /// Suppress progress output; print only the best solution.
    #[arg(short, long)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Probe both backends and report whether they are usable.
    Doctor,
}
