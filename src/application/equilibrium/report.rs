//! Diagnostic tables exposed for external reporting.

use serde::Serialize;

use crate::domain::ArchetypeId;

/// One step of the price path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrajectoryRow {
    pub step: usize,
    pub step_size: f64,
    /// Prices the step was scored at, one per archetype.
    pub prices: Vec<f64>,
    pub imbalances: Vec<f64>,
}

/// Price path across a solve, one row per step.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceTrajectory {
    pub archetypes: Vec<ArchetypeId>,
    pub rows: Vec<TrajectoryRow>,
}

impl PriceTrajectory {
    pub(crate) fn reset(&mut self, archetypes: &[ArchetypeId]) {
        self.archetypes = archetypes.to_vec();
        self.rows.clear();
    }

    pub(crate) fn push(&mut self, row: TrajectoryRow) {
        self.rows.push(row);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<&TrajectoryRow> {
        self.rows.last()
    }
}

/// Demand against supply for one archetype.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemandSupplyRow {
    pub archetype: ArchetypeId,
    pub price: f64,
    pub supply: f64,
    pub demand: f64,
    pub imbalance: f64,
}

/// Demand/supply state of the most recent step.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DemandSupplyTable {
    pub rows: Vec<DemandSupplyRow>,
}

impl DemandSupplyTable {
    /// Total expected demand across archetypes.
    #[must_use]
    pub fn total_demand(&self) -> f64 {
        self.rows.iter().map(|r| r.demand).sum()
    }

    /// Largest absolute imbalance, zero for an empty table.
    #[must_use]
    pub fn max_imbalance(&self) -> f64 {
        self.rows.iter().map(|r| r.imbalance.abs()).fold(0.0, f64::max)
    }

    #[must_use]
    pub fn row(&self, archetype: ArchetypeId) -> Option<&DemandSupplyRow> {
        self.rows.iter().find(|r| r.archetype == archetype)
    }
}
