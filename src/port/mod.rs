//! Trait definitions (ports). Depend only on domain.
//!
//! - [`ScenarioSource`] - upstream feed of market parameters and archetypes

mod scenario;

pub use scenario::ScenarioSource;
