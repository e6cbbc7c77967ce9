//! Composite utility over index scores.

use super::filtration::Filtration;
use super::index::{UtilityIndex, CONSUMPTION_METRIC};
use crate::domain::error::{DomainError, NumericError};
use crate::domain::household::Household;
use crate::domain::housing::HousingUnit;
use crate::domain::metric::MetricBundle;
use crate::domain::registry::KeyBuilder;

/// A household's preferences over dwellings and consumption.
#[derive(Debug, Clone, PartialEq)]
pub struct UtilityModel {
    indices: Vec<UtilityIndex>,
}

impl UtilityModel {
    /// Create a model from its indices.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidParameter`] if there are no indices or any
    /// index has a non-positive exponent, a negative weight or scale, or no metrics.
    pub fn try_new(indices: Vec<UtilityIndex>) -> Result<Self, DomainError> {
        if indices.is_empty() {
            return Err(DomainError::InvalidParameter {
                field: "indices",
                reason: "utility model needs at least one index".to_string(),
            });
        }
        for index in &indices {
            index.validate()?;
        }
        Ok(Self { indices })
    }

    #[must_use]
    pub fn indices(&self) -> &[UtilityIndex] {
        &self.indices
    }

    /// Score of every index, in configuration order.
    ///
    /// # Errors
    ///
    /// Returns a [`NumericError`] when an input is outside a shape's domain or a
    /// metric is missing.
    pub fn domain_scores(
        &self,
        household: &Household,
        housing: &HousingUnit,
        consumption: f64,
    ) -> Result<Vec<f64>, NumericError> {
        let consumption_bundle = MetricBundle::new().with(CONSUMPTION_METRIC, consumption);
        let size = household.demographics().size;
        self.indices
            .iter()
            .map(|index| {
                let bundle = index
                    .kind
                    .bundle(housing.attributes())
                    .unwrap_or(&consumption_bundle);
                index.score(bundle, size)
            })
            .collect()
    }

    /// Composite utility of `housing` at `consumption` for `household`.
    ///
    /// Pure: neither argument is modified.
    ///
    /// # Errors
    ///
    /// Returns a [`NumericError`] for out-of-domain inputs (e.g. negative floor
    /// area or consumption) and if the composite is not finite.
    pub fn utility(
        &self,
        household: &Household,
        housing: &HousingUnit,
        consumption: f64,
    ) -> Result<f64, NumericError> {
        let scores = self.domain_scores(household, housing, consumption)?;
        let mut composite = 1.0;
        for (index, score) in self.indices.iter().zip(scores) {
            if score <= 0.0 {
                if index.required {
                    return Ok(0.0);
                }
                continue;
            }
            composite *= score.powf(index.exponent);
        }
        if !composite.is_finite() {
            return Err(NumericError::NonFinite {
                quantity: "utility",
                value: composite,
            });
        }
        Ok(composite)
    }

    /// Finite difference of utility under one perturbation.
    ///
    /// # Errors
    ///
    /// Same conditions as [`UtilityModel::utility`], for either evaluation.
    pub fn marginal(
        &self,
        household: &Household,
        housing: &HousingUnit,
        consumption: f64,
        filtration: &Filtration,
    ) -> Result<f64, NumericError> {
        let base = self.utility(household, housing, consumption)?;
        let (unit, shifted) = filtration.apply(housing, consumption);
        let perturbed = self.utility(household, &unit, shifted)?;
        Ok(perturbed - base)
    }

    pub(crate) fn key_into(&self, mut key: KeyBuilder) -> KeyBuilder {
        key = key.int(self.indices.len() as u64);
        for index in &self.indices {
            key = index.key_into(key);
        }
        key
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::economy::Lifecycle;
    use crate::domain::utility::{IndexKind, MetricWeight, Shape};
    use crate::domain::finance::FinancialPosition;
    use crate::domain::household::Demographics;
    use crate::domain::housing::{HousingAttributes, Tenure, AREA_METRIC};

    fn model() -> UtilityModel {
        UtilityModel::try_new(vec![
            UtilityIndex::new(
                "space",
                IndexKind::Space,
                0.5,
                vec![MetricWeight::new(AREA_METRIC, 1.0, Shape::Logarithm).scaled(1000.0)],
            ),
            UtilityIndex::new(
                "safety",
                IndexKind::Crime,
                0.25,
                vec![MetricWeight::new("violent", 1.0, Shape::Inverted)],
            ),
            UtilityIndex::new(
                "consumption",
                IndexKind::Consumption,
                1.0,
                vec![MetricWeight::new(CONSUMPTION_METRIC, 1.0, Shape::Logarithm).scaled(1000.0)],
            ),
        ])
        .unwrap()
    }

    fn household() -> Household {
        let finance = FinancialPosition::try_new(20_000.0, 5000.0, 0.003, 1.0).unwrap();
        Household::try_new(
            40,
            Demographics::default(),
            finance,
            model(),
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            &Lifecycle::default(),
        )
        .unwrap()
    }

    fn dwelling(area: f64, violent: f64) -> HousingUnit {
        let attributes = HousingAttributes {
            space: MetricBundle::new().with(AREA_METRIC, area),
            crime: MetricBundle::new().with("violent", violent),
            ..Default::default()
        };
        HousingUnit::try_new(Tenure::Rent, 150.0, 1.2, 0.1, attributes, "tract-1", 1980).unwrap()
    }

    #[test]
    fn composite_is_product_of_powered_scores() {
        let h = household();
        let u = model().utility(&h, &dwelling(1000.0, 1.0), 1000.0).unwrap();
        let expected = 2f64.ln().powf(0.5) * 0.5f64.powf(0.25) * 2f64.ln();
        assert!((u - expected).abs() < 1e-12);
    }

    #[test]
    fn zero_required_score_zeroes_utility() {
        let h = household();
        let u = model().utility(&h, &dwelling(1000.0, 1.0), 0.0).unwrap();
        assert_eq!(u, 0.0);
    }

    #[test]
    fn zero_optional_score_is_skipped() {
        let mut indices = model().indices().to_vec();
        indices[2] = indices[2].clone().optional();
        let model = UtilityModel::try_new(indices).unwrap();
        let u = model.utility(&household(), &dwelling(1000.0, 1.0), 0.0).unwrap();
        assert!(u > 0.0);
    }

    #[test]
    fn more_space_is_better_with_diminishing_returns() {
        let h = household();
        let m = model();
        let u1 = m.utility(&h, &dwelling(500.0, 1.0), 2000.0).unwrap();
        let u2 = m.utility(&h, &dwelling(1000.0, 1.0), 2000.0).unwrap();
        let u3 = m.utility(&h, &dwelling(1500.0, 1.0), 2000.0).unwrap();
        assert!(u2 > u1 && u3 > u2);
        assert!(u3 - u2 < u2 - u1);
    }

    #[test]
    fn negative_consumption_is_a_numeric_error() {
        let err = model()
            .utility(&household(), &dwelling(1000.0, 1.0), -5.0)
            .unwrap_err();
        assert!(matches!(err, NumericError::OutOfDomain { .. }));
    }

    #[test]
    fn marginal_consumption_is_positive() {
        let d = model()
            .marginal(
                &household(),
                &dwelling(1000.0, 1.0),
                2000.0,
                &Filtration::Consumption { delta: 100.0 },
            )
            .unwrap();
        assert!(d > 0.0);
    }

    #[test]
    fn marginal_crime_is_negative() {
        let d = model()
            .marginal(
                &household(),
                &dwelling(1000.0, 1.0),
                2000.0,
                &Filtration::Metric {
                    index: IndexKind::Crime,
                    metric: "violent".to_string(),
                    delta: 1.0,
                },
            )
            .unwrap();
        assert!(d < 0.0);
    }

    #[test]
    fn marginal_area_below_zero_is_rejected() {
        let err = model()
            .marginal(
                &household(),
                &dwelling(100.0, 1.0),
                2000.0,
                &Filtration::Area { delta: -200.0 },
            )
            .unwrap_err();
        assert!(matches!(err, NumericError::OutOfDomain { .. }));
    }

    #[test]
    fn empty_model_is_rejected() {
        assert!(UtilityModel::try_new(vec![]).is_err());
    }
}
