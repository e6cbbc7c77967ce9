//! Scenario validation command.

use std::path::Path;

use crate::domain::Tenure;
use crate::error::Result;
use crate::infrastructure::config::Config;

/// Validate a scenario file without solving it.
pub fn execute<P: AsRef<Path>>(config_path: P) -> Result<()> {
    let path = config_path.as_ref();
    println!("Checking configuration: {}", path.display());
    println!();

    let config = Config::load(path)?;
    let ctx = config.build_context()?;

    println!("✓ Configuration file is valid");
    println!();
    println!("Summary:");
    println!(
        "  Households: {} archetypes, {} total",
        ctx.households().len(),
        ctx.households().total()
    );
    for tenure in [Tenure::Own, Tenure::Rent] {
        let market = ctx.market(tenure);
        let supply: u64 = market.iter().map(|&id| ctx.housing().count(id)).sum();
        println!("  {tenure} market: {} archetypes, {supply} units", market.len());
    }
    match ctx.reservation() {
        Some(reservation) => println!("  Reservation: {}", reservation.tenure),
        None => println!("  Reservation: none"),
    }
    println!("  Max steps: {}", config.solver.max_steps);
    println!();
    println!("Configuration is ready to use.");
    Ok(())
}
