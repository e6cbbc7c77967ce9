//! Market-clearing price search.
//!
//! The scoring pass, demand normalization and price update live in their own
//! modules; [`EquilibriumSolver`] ties them together into the tâtonnement loop.

mod demand;
mod report;
mod score;
mod solver;

pub use demand::{adjust_price, aggregate_demand, choice_shares, imbalance};
pub use report::{DemandSupplyRow, DemandSupplyTable, PriceTrajectory, TrajectoryRow};
pub use score::{score_choice, settle, Choice, Score, ScoreMatrix};
pub use solver::{ArchetypePrice, EquilibriumSolver, SolveOutcome, SolverConfig};
