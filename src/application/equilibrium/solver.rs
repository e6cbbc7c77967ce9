//! Tâtonnement price solver.
//!
//! Each step scores every (dwelling, household) pair at the current prices,
//! turns each household's scores into choice shares, aggregates demand per
//! dwelling archetype, and nudges prices towards balance:
//!
//! ```text
//! imbalance_i = clip((demand_i − supply_i) / supply_i, −1, 1)
//! price_i    ← price_i · (1 + imbalance_i · step_size)
//! ```
//!
//! The step size decays geometrically every `relax_interval` steps. The
//! solve stops when every imbalance is within tolerance or the step budget is
//! spent; running out of budget is reported, not treated as success.

use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::demand::{adjust_price, aggregate_demand, imbalance};
use super::report::{DemandSupplyRow, DemandSupplyTable, PriceTrajectory, TrajectoryRow};
use super::score::{Choice, ScoreMatrix};
use crate::application::context::SimulationContext;
use crate::domain::error::DomainError;
use crate::domain::{ArchetypeId, Household, Tenure};
use crate::error::Result;

/// Configuration for the tâtonnement loop.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    /// Largest absolute imbalance accepted as converged.
    pub tolerance: f64,
    /// Maximum number of scoring steps.
    pub max_steps: usize,
    /// Step size of the first step.
    pub initial_step_size: f64,
    /// Number of steps between step-size decays.
    pub relax_interval: usize,
    /// Factor applied to the step size at each decay.
    pub relax_rate: f64,
    /// Logit sensitivity of household choice to utility differences.
    pub choice_sensitivity: f64,
    /// Worker threads for the scoring pass; 1 scores serially.
    pub workers: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-4,
            max_steps: 250,
            initial_step_size: 0.5,
            relax_interval: 25,
            relax_rate: 0.9,
            choice_sensitivity: 20.0,
            workers: 1,
        }
    }
}

impl SolverConfig {
    /// Step size used at 1-based `step`.
    #[must_use]
    pub fn step_size(&self, step: usize) -> f64 {
        let decays = step.saturating_sub(1) / self.relax_interval.max(1);
        let decays = i32::try_from(decays).unwrap_or(i32::MAX);
        self.initial_step_size * self.relax_rate.powi(decays)
    }

    /// Check every field is in range.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidParameter`] naming the first bad field.
    pub fn validate(&self) -> std::result::Result<(), DomainError> {
        let invalid = |field: &'static str, reason: &str| {
            Err(DomainError::InvalidParameter {
                field,
                reason: reason.to_string(),
            })
        };
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return invalid("tolerance", "must be positive");
        }
        if self.max_steps == 0 {
            return invalid("max_steps", "must be at least 1");
        }
        if !(self.initial_step_size > 0.0 && self.initial_step_size < 1.0) {
            return invalid("initial_step_size", "must be in (0, 1)");
        }
        if self.relax_interval == 0 {
            return invalid("relax_interval", "must be at least 1");
        }
        if !(self.relax_rate > 0.0 && self.relax_rate <= 1.0) {
            return invalid("relax_rate", "must be in (0, 1]");
        }
        if !(self.choice_sensitivity.is_finite() && self.choice_sensitivity >= 0.0) {
            return invalid("choice_sensitivity", "must be non-negative");
        }
        if self.workers == 0 {
            return invalid("workers", "must be at least 1");
        }
        Ok(())
    }
}

/// Solved price of one archetype.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ArchetypePrice {
    pub archetype: ArchetypeId,
    pub price: f64,
}

/// Result of a solve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolveOutcome {
    pub tenure: Tenure,
    pub converged: bool,
    pub steps_taken: usize,
    pub final_prices: Vec<ArchetypePrice>,
}

impl SolveOutcome {
    #[must_use]
    pub fn price_of(&self, archetype: ArchetypeId) -> Option<f64> {
        self.final_prices
            .iter()
            .find(|p| p.archetype == archetype)
            .map(|p| p.price)
    }
}

/// Equilibrium solver with diagnostics from its most recent solve.
pub struct EquilibriumSolver {
    config: SolverConfig,
    pool: Option<ThreadPool>,
    trajectory: PriceTrajectory,
    table: DemandSupplyTable,
    scores: Option<ScoreMatrix>,
}

impl EquilibriumSolver {
    /// Create a solver, starting a worker pool when `workers > 1`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is out of range or the worker
    /// pool cannot be built.
    pub fn new(config: SolverConfig) -> Result<Self> {
        config.validate()?;
        let pool = if config.workers > 1 {
            Some(ThreadPoolBuilder::new().num_threads(config.workers).build()?)
        } else {
            None
        };
        Ok(Self {
            config,
            pool,
            trajectory: PriceTrajectory::default(),
            table: DemandSupplyTable::default(),
            scores: None,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Prices and imbalances of every step of the last solve.
    #[must_use]
    pub const fn trajectory(&self) -> &PriceTrajectory {
        &self.trajectory
    }

    /// Demand against supply at the last scored step.
    #[must_use]
    pub const fn demand_supply(&self) -> &DemandSupplyTable {
        &self.table
    }

    /// Score matrix of the last scored step.
    #[must_use]
    pub const fn scores(&self) -> Option<&ScoreMatrix> {
        self.scores.as_ref()
    }

    /// Expected demand per archetype of `tenure` at the given per-area prices.
    ///
    /// `prices` pairs with [`SimulationContext::market`] by position. Nothing is
    /// mutated.
    ///
    /// # Errors
    ///
    /// Returns an error if scoring hits a numeric failure.
    pub fn demand_at(
        &self,
        ctx: &SimulationContext,
        tenure: Tenure,
        prices: &[f64],
    ) -> Result<Vec<f64>> {
        let market = ctx.market(tenure);
        let (scores, counts) = self.score(ctx, tenure, &market, prices)?;
        Ok(aggregate_demand(&scores, &counts, self.config.choice_sensitivity))
    }

    fn score(
        &self,
        ctx: &SimulationContext,
        tenure: Tenure,
        market: &[ArchetypeId],
        prices: &[f64],
    ) -> Result<(ScoreMatrix, Vec<u64>)> {
        let choices: Vec<Choice<'_>> = market
            .iter()
            .zip(prices)
            .filter_map(|(&id, &price)| {
                ctx.housing().get(id).map(|unit| Choice {
                    unit,
                    tenure,
                    price_per_area: price,
                })
            })
            .collect();
        let households: Vec<(ArchetypeId, &Household)> = ctx
            .households()
            .iter()
            .map(|(id, household, _)| (id, household))
            .collect();
        let counts: Vec<u64> = ctx.households().iter().map(|(_, _, count)| count).collect();
        let reservation = ctx.reservation().map(|r| Choice {
            unit: &r.unit,
            tenure: r.tenure,
            price_per_area: r.tenure.price_of(&r.unit),
        });
        let scores = ScoreMatrix::compute(
            market,
            &choices,
            &households,
            reservation.as_ref(),
            ctx.terms(),
            self.pool.as_ref(),
        )?;
        Ok((scores, counts))
    }

    /// Solve the `tenure` market of `ctx` and write the solved prices back.
    ///
    /// # Errors
    ///
    /// Returns an error if scoring hits a numeric failure. Affordability
    /// failures never escape; they become zero demand for that pair.
    pub fn solve(&mut self, ctx: &mut SimulationContext, tenure: Tenure) -> Result<SolveOutcome> {
        let market = ctx.market(tenure);
        let supply: Vec<f64> = market.iter().map(|&id| ctx.housing().count(id) as f64).collect();
        let mut prices: Vec<f64> = market
            .iter()
            .filter_map(|&id| ctx.housing().get(id))
            .map(|unit| tenure.price_of(unit))
            .collect();

        self.trajectory.reset(&market);
        self.table = DemandSupplyTable::default();
        self.scores = None;

        info!(
            tenure = %tenure,
            housing = market.len(),
            households = ctx.households().len(),
            max_steps = self.config.max_steps,
            "Starting equilibrium solve"
        );

        if market.is_empty() {
            warn!(tenure = %tenure, "No housing offered under this tenure");
            return Ok(SolveOutcome {
                tenure,
                converged: true,
                steps_taken: 0,
                final_prices: Vec::new(),
            });
        }

        let mut converged = false;
        let mut steps_taken = 0;
        for step in 1..=self.config.max_steps {
            steps_taken = step;
            let step_size = self.config.step_size(step);
            let (scores, counts) = self.score(ctx, tenure, &market, &prices)?;
            let demand = aggregate_demand(&scores, &counts, self.config.choice_sensitivity);
            let imbalances: Vec<f64> = demand
                .iter()
                .zip(&supply)
                .map(|(&d, &s)| imbalance(d, s))
                .collect();

            self.table = DemandSupplyTable {
                rows: market
                    .iter()
                    .enumerate()
                    .map(|(i, &archetype)| DemandSupplyRow {
                        archetype,
                        price: prices[i],
                        supply: supply[i],
                        demand: demand[i],
                        imbalance: imbalances[i],
                    })
                    .collect(),
            };
            self.scores = Some(scores);
            self.trajectory.push(TrajectoryRow {
                step,
                step_size,
                prices: prices.clone(),
                imbalances: imbalances.clone(),
            });

            let worst = self.table.max_imbalance();
            debug!(step, step_size, max_imbalance = worst, "Equilibrium step");

            if worst <= self.config.tolerance {
                converged = true;
                break;
            }
            for (price, &imb) in prices.iter_mut().zip(&imbalances) {
                *price = adjust_price(*price, imb, step_size);
            }
        }

        for (&id, &price) in market.iter().zip(&prices) {
            if let Some(unit) = ctx.housing_mut().get_mut(id) {
                unit.set_market_price(tenure, price);
            }
        }

        if converged {
            info!(tenure = %tenure, steps = steps_taken, "Equilibrium reached");
        } else {
            warn!(
                tenure = %tenure,
                steps = steps_taken,
                max_imbalance = self.table.max_imbalance(),
                "Step budget exhausted before convergence"
            );
        }

        Ok(SolveOutcome {
            tenure,
            converged,
            steps_taken,
            final_prices: market
                .iter()
                .zip(&prices)
                .map(|(&archetype, &price)| ArchetypePrice { archetype, price })
                .collect(),
        })
    }
}
