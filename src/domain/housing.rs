//! Housing units and tenure.
//!
//! - [`Tenure`] - own or rent, the two markets solved independently
//! - [`HousingAttributes`] - the attribute bundles scored by the utility model
//! - [`HousingUnit`] - an archetype dwelling with its per-area market prices

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::metric::MetricBundle;
use super::registry::{Interned, KeyBuilder, StructuralKey};

/// Metric in the space bundle holding floor area.
pub const AREA_METRIC: &str = "area";

/// Whether a dwelling is evaluated for ownership or rental.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tenure {
    Own,
    Rent,
}

impl Tenure {
    /// The per-area figure this tenure's market clears on.
    #[must_use]
    pub fn price_of(self, unit: &HousingUnit) -> f64 {
        match self {
            Self::Own => unit.price_per_area,
            Self::Rent => unit.rent_per_area,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Own => "own",
            Self::Rent => "rent",
        }
    }
}

impl fmt::Display for Tenure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attribute bundles describing a dwelling and its neighborhood.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HousingAttributes {
    pub crime: MetricBundle,
    pub school: MetricBundle,
    pub space: MetricBundle,
    pub community: MetricBundle,
    pub proximity: MetricBundle,
    pub quality: MetricBundle,
}

/// An archetype dwelling.
///
/// Price and rent are market state and move while an equilibrium is solved;
/// every other field is fixed at construction and defines the archetype.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HousingUnit {
    tenure: Tenure,
    price_per_area: f64,
    rent_per_area: f64,
    occupancy_per_area: f64,
    attributes: HousingAttributes,
    geography: String,
    vintage: u32,
}

impl HousingUnit {
    /// Create a housing unit.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::MissingMetric`] if the space bundle has no positive
    /// `area`, and [`DomainError::InvalidParameter`] for negative or non-finite prices.
    pub fn try_new(
        tenure: Tenure,
        price_per_area: f64,
        rent_per_area: f64,
        occupancy_per_area: f64,
        attributes: HousingAttributes,
        geography: impl Into<String>,
        vintage: u32,
    ) -> Result<Self, DomainError> {
        match attributes.space.get(AREA_METRIC) {
            Some(area) if area.is_finite() && area > 0.0 => {}
            _ => return Err(DomainError::MissingMetric { metric: AREA_METRIC }),
        }
        for (field, value) in [
            ("price_per_area", price_per_area),
            ("rent_per_area", rent_per_area),
            ("occupancy_per_area", occupancy_per_area),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(DomainError::InvalidParameter {
                    field,
                    reason: format!("must be finite and non-negative, got {value}"),
                });
            }
        }
        Ok(Self {
            tenure,
            price_per_area,
            rent_per_area,
            occupancy_per_area,
            attributes,
            geography: geography.into(),
            vintage,
        })
    }

    #[must_use]
    pub const fn tenure(&self) -> Tenure {
        self.tenure
    }

    #[must_use]
    pub const fn price_per_area(&self) -> f64 {
        self.price_per_area
    }

    #[must_use]
    pub const fn rent_per_area(&self) -> f64 {
        self.rent_per_area
    }

    #[must_use]
    pub const fn occupancy_per_area(&self) -> f64 {
        self.occupancy_per_area
    }

    #[must_use]
    pub const fn attributes(&self) -> &HousingAttributes {
        &self.attributes
    }

    #[must_use]
    pub fn geography(&self) -> &str {
        &self.geography
    }

    #[must_use]
    pub const fn vintage(&self) -> u32 {
        self.vintage
    }

    /// Floor area, validated positive at construction.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.attributes.space.get(AREA_METRIC).unwrap_or_default()
    }

    /// Purchase price of the whole unit.
    #[must_use]
    pub fn price(&self) -> f64 {
        self.price_per_area * self.area()
    }

    /// Periodic rent of the whole unit.
    #[must_use]
    pub fn rent(&self) -> f64 {
        self.rent_per_area * self.area()
    }

    /// Periodic occupancy cost (taxes, upkeep) of the whole unit.
    #[must_use]
    pub fn occupancy(&self) -> f64 {
        self.occupancy_per_area * self.area()
    }

    /// Set the per-area price for `tenure`'s market. Negative values clamp to zero.
    pub fn set_market_price(&mut self, tenure: Tenure, value: f64) {
        let value = value.max(0.0);
        match tenure {
            Tenure::Own => self.price_per_area = value,
            Tenure::Rent => self.rent_per_area = value,
        }
    }

    /// Copy of this unit with a different floor area.
    #[must_use]
    pub fn with_area(&self, area: f64) -> Self {
        let mut unit = self.clone();
        unit.attributes.space.set(AREA_METRIC, area);
        unit
    }

    /// Mutable access to attributes, for building perturbed copies.
    pub(crate) fn attributes_mut(&mut self) -> &mut HousingAttributes {
        &mut self.attributes
    }
}

impl Interned for HousingUnit {
    fn structural_key(&self) -> StructuralKey {
        let a = &self.attributes;
        KeyBuilder::new("housing")
            .tag(self.tenure.as_str())
            .float(self.occupancy_per_area)
            .bundle(&a.crime)
            .bundle(&a.school)
            .bundle(&a.space)
            .bundle(&a.community)
            .bundle(&a.proximity)
            .bundle(&a.quality)
            .text(self.geography.as_str())
            .int(u64::from(self.vintage))
            .finish()
    }
}
