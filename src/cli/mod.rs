//! Command-line interface definitions.

pub mod check;
mod command;
pub mod solve;

pub use command::{Cli, Commands, ConfigPathArg, SolveArgs, TenureArg};
