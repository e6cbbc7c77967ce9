//! Named perturbations for marginal-utility evaluation.

use serde::{Deserialize, Serialize};

use super::index::IndexKind;
use crate::domain::housing::HousingUnit;

/// A single perturbation applied to the inputs of a utility evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Filtration {
    /// Shift solved consumption.
    Consumption { delta: f64 },
    /// Shift floor area.
    Area { delta: f64 },
    /// Shift one named metric of one attribute bundle.
    Metric {
        index: IndexKind,
        metric: String,
        delta: f64,
    },
}

impl Filtration {
    /// Perturbed `(housing, consumption)` inputs.
    ///
    /// A metric the bundle does not carry is left absent; the evaluation then
    /// reports it as missing.
    #[must_use]
    pub fn apply(&self, housing: &HousingUnit, consumption: f64) -> (HousingUnit, f64) {
        match self {
            Self::Consumption { delta } => (housing.clone(), consumption + delta),
            Self::Area { delta } => (housing.with_area(housing.area() + delta), consumption),
            Self::Metric {
                index: IndexKind::Consumption,
                delta,
                ..
            } => (housing.clone(), consumption + delta),
            Self::Metric {
                index,
                metric,
                delta,
            } => {
                let mut unit = housing.clone();
                if let Some(bundle) = index.bundle_mut(unit.attributes_mut()) {
                    if let Some(value) = bundle.get(metric) {
                        bundle.set(metric.clone(), value + delta);
                    }
                }
                (unit, consumption)
            }
        }
    }
}
