//! Scoring pass: one utility per (dwelling, household) pair.
//!
//! Scoring is read-only. Affordability failures become infeasible cells;
//! numeric failures abort the pass.

use rayon::prelude::*;
use rayon::ThreadPool;
use serde::Serialize;

use crate::application::context::MarketTerms;
use crate::domain::error::{FinanceError, ModelError, NumericError};
use crate::domain::{ArchetypeId, Household, HousingUnit, Tenure};

/// A dwelling offered at a given per-area price under one tenure.
#[derive(Debug, Clone, Copy)]
pub struct Choice<'a> {
    pub unit: &'a HousingUnit,
    pub tenure: Tenure,
    pub price_per_area: f64,
}

/// Result of scoring one pair.
#[derive(Debug, Clone, PartialEq)]
pub enum Score {
    Feasible(f64),
    Infeasible(FinanceError),
}

impl Score {
    /// Utility, or `None` when the household cannot take the choice.
    #[must_use]
    pub const fn utility(&self) -> Option<f64> {
        match self {
            Self::Feasible(u) => Some(*u),
            Self::Infeasible(_) => None,
        }
    }
}

fn split(err: ModelError) -> Result<FinanceError, NumericError> {
    match err {
        ModelError::Finance(e) => Ok(e),
        ModelError::Numeric(e) => Err(e),
    }
}

/// Consumption the household sustains after moving into `choice`.
///
/// The outer `Result` carries numeric failures; the inner one carries
/// affordability failures.
///
/// # Errors
///
/// Returns a [`NumericError`] if the lifetime budget cannot be evaluated.
pub fn settle(
    household: &Household,
    choice: &Choice<'_>,
    terms: &MarketTerms,
) -> Result<Result<f64, FinanceError>, NumericError> {
    let unit = choice.unit;
    let mut finance = household.finance().clone();
    let housing_cost = match choice.tenure {
        Tenure::Own => {
            let price = choice.price_per_area * unit.area();
            if let Err(err) = finance.buy(price, &terms.bank, &terms.broker) {
                return split(err).map(Err);
            }
            unit.occupancy()
        }
        Tenure::Rent => {
            finance.sell(&terms.broker);
            (choice.price_per_area + unit.occupancy_per_area()) * unit.area()
        }
    };
    match household.consumption_with(&finance, &terms.economy, housing_cost) {
        Ok(consumption) => Ok(Ok(consumption)),
        Err(err) => split(err).map(Err),
    }
}

/// Score one (dwelling, household) pair.
///
/// # Errors
///
/// Returns a [`NumericError`] for configuration-level failures; affordability
/// failures are returned as [`Score::Infeasible`].
pub fn score_choice(
    household: &Household,
    choice: &Choice<'_>,
    terms: &MarketTerms,
) -> Result<Score, NumericError> {
    match settle(household, choice, terms)? {
        Ok(consumption) => Ok(Score::Feasible(household.utility(choice.unit, consumption)?)),
        Err(reason) => Ok(Score::Infeasible(reason)),
    }
}

/// Utilities of every (dwelling, household) pair for one step.
///
/// Rows are dwellings, columns households. `None` marks an infeasible pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreMatrix {
    housing: Vec<ArchetypeId>,
    households: Vec<ArchetypeId>,
    values: Vec<Option<f64>>,
    reservation: Option<Vec<Option<f64>>>,
}

impl ScoreMatrix {
    /// Score all pairs, on `pool` when given.
    ///
    /// `choices` are paired with `housing` by position; `reservation` is an
    /// extra row that takes part in choice but not in demand.
    ///
    /// # Errors
    ///
    /// Returns the first [`NumericError`] raised by any pair.
    pub fn compute(
        housing: &[ArchetypeId],
        choices: &[Choice<'_>],
        households: &[(ArchetypeId, &Household)],
        reservation: Option<&Choice<'_>>,
        terms: &MarketTerms,
        pool: Option<&ThreadPool>,
    ) -> Result<Self, NumericError> {
        let cols = households.len();
        let cell = |i: usize| -> Result<Option<f64>, NumericError> {
            let (_, household) = households[i % cols];
            let choice = &choices[i / cols];
            Ok(score_choice(household, choice, terms)?.utility())
        };
        let reserve = |j: usize| -> Result<Option<f64>, NumericError> {
            match reservation {
                Some(choice) => Ok(score_choice(households[j].1, choice, terms)?.utility()),
                None => Ok(None),
            }
        };
        let cells = choices.len() * cols;

        let (values, reserved) = match pool {
            Some(pool) => pool.install(|| {
                let values = (0..cells).into_par_iter().map(cell).collect::<Result<Vec<_>, _>>();
                let reserved = (0..cols).into_par_iter().map(reserve).collect::<Result<Vec<_>, _>>();
                (values, reserved)
            }),
            None => (
                (0..cells).map(cell).collect::<Result<Vec<_>, _>>(),
                (0..cols).map(reserve).collect::<Result<Vec<_>, _>>(),
            ),
        };

        Ok(Self {
            housing: housing.to_vec(),
            households: households.iter().map(|(id, _)| *id).collect(),
            values: values?,
            reservation: reservation.map(|_| reserved).transpose()?,
        })
    }

    /// Dwelling archetypes, one per row.
    #[must_use]
    pub fn housing(&self) -> &[ArchetypeId] {
        &self.housing
    }

    /// Household archetypes, one per column.
    #[must_use]
    pub fn households(&self) -> &[ArchetypeId] {
        &self.households
    }

    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.values[row * self.households.len() + col]
    }

    /// One household's options: the reservation first (when present), then each dwelling.
    #[must_use]
    pub fn column(&self, col: usize) -> Vec<Option<f64>> {
        let mut column = Vec::with_capacity(self.housing.len() + 1);
        if let Some(reserved) = &self.reservation {
            column.push(reserved[col]);
        }
        column.extend((0..self.housing.len()).map(|row| self.get(row, col)));
        column
    }

    #[must_use]
    pub const fn has_reservation(&self) -> bool {
        self.reservation.is_some()
    }
}
