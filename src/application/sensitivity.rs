//! Marginal-household filtering.
//!
//! Finds the (dwelling, household) pairs whose utility moves the most under a
//! small perturbation, at the prices currently stored in the context.

use serde::Serialize;
use tracing::debug;

use crate::application::context::SimulationContext;
use crate::application::equilibrium::{settle, Choice};
use crate::domain::error::NumericError;
use crate::domain::{ArchetypeId, Filtration, Tenure};

/// A pair whose utility responds to the perturbation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarginalPair {
    pub housing: ArchetypeId,
    pub household: ArchetypeId,
    /// Utility after the perturbation minus utility before it.
    pub delta: f64,
}

/// Pairs with `|Δu| >= threshold`, largest response first.
///
/// Pairs the household cannot afford are skipped.
///
/// # Errors
///
/// Returns a [`NumericError`] if any evaluation leaves its valid domain.
pub fn marginal_pairs(
    ctx: &SimulationContext,
    tenure: Tenure,
    filtration: &Filtration,
    threshold: f64,
) -> Result<Vec<MarginalPair>, NumericError> {
    let mut pairs = Vec::new();
    for id in ctx.market(tenure) {
        let Some(unit) = ctx.housing().get(id) else {
            continue;
        };
        let choice = Choice {
            unit,
            tenure,
            price_per_area: tenure.price_of(unit),
        };
        for (household_id, household, _) in ctx.households().iter() {
            let Ok(consumption) = settle(household, &choice, ctx.terms())? else {
                continue;
            };
            let delta = household
                .utility_model()
                .marginal(household, unit, consumption, filtration)?;
            if delta.abs() >= threshold {
                pairs.push(MarginalPair {
                    housing: id,
                    household: household_id,
                    delta,
                });
            }
        }
    }
    pairs.sort_by(|a, b| b.delta.abs().total_cmp(&a.delta.abs()));
    debug!(tenure = %tenure, pairs = pairs.len(), threshold, "Marginal pairs selected");
    Ok(pairs)
}
