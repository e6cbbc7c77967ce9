//! Argument definitions.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::domain::Tenure;

/// Abode - local housing market equilibrium.
#[derive(Parser, Debug)]
#[command(name = "abode")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Solve market-clearing prices for one tenure
    Solve(SolveArgs),

    /// Validate a scenario file
    Check(ConfigPathArg),
}

/// Shared argument for commands that only need a config path.
#[derive(Parser, Debug)]
pub struct ConfigPathArg {
    /// Path to scenario file
    #[arg(short, long, default_value = "scenario.toml")]
    pub config: PathBuf,
}

/// Market selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TenureArg {
    Own,
    Rent,
}

impl From<TenureArg> for Tenure {
    fn from(arg: TenureArg) -> Self {
        match arg {
            TenureArg::Own => Self::Own,
            TenureArg::Rent => Self::Rent,
        }
    }
}

/// Arguments for the `solve` subcommand.
#[derive(Parser, Debug)]
pub struct SolveArgs {
    /// Path to scenario file
    #[arg(short, long, default_value = "scenario.toml")]
    pub config: PathBuf,

    /// Market to solve
    #[arg(long, value_enum, default_value = "own")]
    pub tenure: TenureArg,

    /// Override the solver step budget
    #[arg(long)]
    pub max_steps: Option<usize>,

    /// Override scoring worker threads (0 = one per CPU)
    #[arg(long)]
    pub workers: Option<usize>,

    /// Override log level (debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Emit the outcome and diagnostics as JSON
    #[arg(long)]
    pub json: bool,
}
