//! Equilibrium solve command.

use serde::Serialize;
use tracing::info;

use super::SolveArgs;
use crate::application::equilibrium::{DemandSupplyTable, PriceTrajectory};
use crate::application::{EquilibriumSolver, SolveOutcome};
use crate::error::Result;
use crate::infrastructure::config::Config;

/// Everything a solve reports on stdout with `--json`.
#[derive(Debug, Serialize)]
pub struct SolveReport<'a> {
    pub outcome: &'a SolveOutcome,
    pub demand_supply: &'a DemandSupplyTable,
    pub trajectory: &'a PriceTrajectory,
}

/// Load the scenario, solve one market and print the result.
pub fn execute(args: &SolveArgs) -> Result<()> {
    let mut config = Config::load(&args.config)?;
    if let Some(level) = &args.log_level {
        config.logging.level.clone_from(level);
    }
    if let Some(max_steps) = args.max_steps {
        config.solver.max_steps = max_steps;
    }
    if let Some(workers) = args.workers {
        config.solver.workers = workers;
    }
    config.init_logging();

    let mut ctx = config.build_context()?;
    let mut solver = EquilibriumSolver::new(config.solver_config())?;
    info!(config = %args.config.display(), "Scenario loaded");

    let outcome = solver.solve(&mut ctx, args.tenure.into())?;

    if args.json {
        let report = SolveReport {
            outcome: &outcome,
            demand_supply: solver.demand_supply(),
            trajectory: solver.trajectory(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let status = if outcome.converged { "converged" } else { "not converged" };
    println!(
        "{} market {status} after {} steps",
        outcome.tenure, outcome.steps_taken
    );
    for row in &solver.demand_supply().rows {
        println!(
            "  {}: price {:.4} per area, demand {:.2} / supply {:.0}",
            row.archetype,
            outcome.price_of(row.archetype).unwrap_or(row.price),
            row.demand,
            row.supply
        );
    }
    Ok(())
}
