//! Application services.
//!
//! These operate on a [`context::SimulationContext`] and coordinate the domain
//! model into market-level results.

pub mod context;
pub mod equilibrium;
pub mod sensitivity;

pub use context::{MarketTerms, Reservation, SimulationContext};
pub use equilibrium::{EquilibriumSolver, SolveOutcome, SolverConfig};
pub use sensitivity::{marginal_pairs, MarginalPair};
