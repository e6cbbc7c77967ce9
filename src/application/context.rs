//! Per-simulation context.
//!
//! [`SimulationContext`] owns everything a solve reads or writes: the market
//! parameter bundles, both archetype registries and the optional reservation
//! (outside) option. Nothing is process-global; pass the context by reference.

use tracing::debug;

use crate::domain::error::DomainError;
use crate::domain::{
    ArchetypeId, Bank, Broker, Economy, Household, HousingUnit, Registry, Tenure,
};
use crate::port::ScenarioSource;

/// Immutable market parameters consumed while scoring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketTerms {
    pub economy: Economy,
    pub bank: Bank,
    pub broker: Broker,
}

/// An outside option every household can fall back on.
///
/// Scored like any dwelling at its own fixed price, it competes for each
/// household's demand share but is never supplied, counted or repriced.
#[derive(Debug, Clone, PartialEq)]
pub struct Reservation {
    pub unit: HousingUnit,
    pub tenure: Tenure,
}

/// Owner of registries and parameters for one simulation.
#[derive(Debug, Clone)]
pub struct SimulationContext {
    terms: MarketTerms,
    households: Registry<Household>,
    housing: Registry<HousingUnit>,
    reservation: Option<Reservation>,
}

impl SimulationContext {
    #[must_use]
    pub fn new(terms: MarketTerms) -> Self {
        Self {
            terms,
            households: Registry::new(),
            housing: Registry::new(),
            reservation: None,
        }
    }

    /// Build a context from a scenario feed.
    ///
    /// # Errors
    ///
    /// Returns the first [`DomainError`] raised by the source.
    pub fn from_source(source: &dyn ScenarioSource) -> Result<Self, DomainError> {
        let economy = source.economy()?;
        let terms = MarketTerms {
            economy,
            bank: source.bank()?,
            broker: source.broker()?,
        };
        let mut ctx = Self::new(terms);
        for (household, count) in source.households(&economy)? {
            ctx.add_households(household, count)?;
        }
        for (unit, count) in source.housing()? {
            ctx.add_housing(unit, count)?;
        }
        ctx.reservation = source
            .reservation()?
            .map(|(unit, tenure)| Reservation { unit, tenure });
        debug!(
            households = ctx.households.len(),
            housing = ctx.housing.len(),
            reservation = ctx.reservation.is_some(),
            "Simulation context built"
        );
        Ok(ctx)
    }

    #[must_use]
    pub fn with_reservation(mut self, reservation: Reservation) -> Self {
        self.reservation = Some(reservation);
        self
    }

    #[must_use]
    pub const fn terms(&self) -> &MarketTerms {
        &self.terms
    }

    #[must_use]
    pub const fn reservation(&self) -> Option<&Reservation> {
        self.reservation.as_ref()
    }

    pub fn set_reservation(&mut self, reservation: Option<Reservation>) {
        self.reservation = reservation;
    }

    /// Register `count` households of one archetype.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EmptyArchetype`] when `count` is zero.
    pub fn add_households(
        &mut self,
        household: Household,
        count: u64,
    ) -> Result<ArchetypeId, DomainError> {
        self.households.intern_many(household, count)
    }

    /// Register `count` dwellings of one archetype.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EmptyArchetype`] when `count` is zero.
    pub fn add_housing(&mut self, unit: HousingUnit, count: u64) -> Result<ArchetypeId, DomainError> {
        self.housing.intern_many(unit, count)
    }

    #[must_use]
    pub const fn households(&self) -> &Registry<Household> {
        &self.households
    }

    #[must_use]
    pub const fn housing(&self) -> &Registry<HousingUnit> {
        &self.housing
    }

    pub fn housing_mut(&mut self) -> &mut Registry<HousingUnit> {
        &mut self.housing
    }

    /// Housing archetypes offered under `tenure`, in registration order.
    #[must_use]
    pub fn market(&self, tenure: Tenure) -> Vec<ArchetypeId> {
        self.housing
            .iter()
            .filter(|(_, unit, _)| unit.tenure() == tenure)
            .map(|(id, _, _)| id)
            .collect()
    }
}
