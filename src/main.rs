use anyhow::Context;
use clap::Parser;

use abode::cli::{check, solve, Cli, Commands};

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    match cli.command {
        Commands::Solve(args) => solve::execute(&args)
            .with_context(|| format!("solve failed for {}", args.config.display())),
        Commands::Check(args) => check::execute(&args.config)
            .with_context(|| format!("invalid configuration {}", args.config.display())),
    }
}
