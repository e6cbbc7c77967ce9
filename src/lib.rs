//! Abode - a local housing market model.
//!
//! Households choose between owning and renting archetype dwellings. Each
//! choice is scored by solving the household's lifetime consumption under the
//! financial position the move leaves it in, then feeding consumption and the
//! dwelling's attributes through a multi-attribute utility model. A
//! tâtonnement solver adjusts per-area prices until expected demand meets
//! supply in every archetype.
//!
//! # Modules
//!
//! - [`domain`] - Loans, financial positions, households, housing, utility and the archetype registry
//! - [`application`] - Simulation context, equilibrium solver and sensitivity filtering
//! - [`port`] - Trait definitions for scenario feeds
//! - [`infrastructure`] - Configuration loading and logging
//! - [`cli`] - Command-line entry points
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use abode::application::EquilibriumSolver;
//! use abode::domain::Tenure;
//! use abode::infrastructure::config::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("scenario.toml")?;
//!     let mut ctx = config.build_context()?;
//!     let mut solver = EquilibriumSolver::new(config.solver_config())?;
//!     let outcome = solver.solve(&mut ctx, Tenure::Own)?;
//!     println!("converged: {}", outcome.converged);
//!     Ok(())
//! }
//! ```

pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;
