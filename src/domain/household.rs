//! Households and their planning clock.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::economy::{Economy, Lifecycle};
use super::error::{DomainError, ModelError, NumericError};
use super::finance::FinancialPosition;
use super::housing::HousingUnit;
use super::period::months;
use super::registry::{Interned, KeyBuilder, StructuralKey};
use super::utility::UtilityModel;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Race {
    #[default]
    White,
    Black,
    Asian,
    Native,
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    #[default]
    NonHispanic,
    Hispanic,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    #[default]
    English,
    Spanish,
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Education {
    LessThanHighSchool,
    #[default]
    HighSchool,
    SomeCollege,
    Bachelor,
    Graduate,
}

/// Demographic attributes of a household.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Demographics {
    pub race: Race,
    pub origin: Origin,
    pub language: Language,
    pub education: Education,
    pub children: u32,
    /// Number of people; at least one.
    pub size: u32,
}

impl Default for Demographics {
    fn default() -> Self {
        Self {
            race: Race::default(),
            origin: Origin::default(),
            language: Language::default(),
            education: Education::default(),
            children: 0,
            size: 1,
        }
    }
}

/// A household's position on its life path, in periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Clock {
    /// Periods since adulthood.
    pub elapsed: u32,
    /// Periods until the death bound.
    pub horizon: u32,
    /// Periods until retirement; zero once retired.
    pub to_retirement: u32,
}

impl Clock {
    #[must_use]
    pub fn at_age(age: u32, lifecycle: &Lifecycle) -> Self {
        Self {
            elapsed: months(age.saturating_sub(lifecycle.adulthood_age)),
            horizon: months(lifecycle.death_age.saturating_sub(age)),
            to_retirement: months(lifecycle.retirement_age.saturating_sub(age)),
        }
    }
}

/// A household archetype.
#[derive(Debug, Clone, PartialEq)]
pub struct Household {
    age: u32,
    demographics: Demographics,
    finance: FinancialPosition,
    utility: UtilityModel,
    formation: NaiveDate,
    clock: Clock,
}

impl Household {
    /// Create a household aged `age` whole years.
    ///
    /// # Errors
    ///
    /// - [`DomainError::PrematureHousehold`] below the adulthood age
    /// - [`DomainError::DeceasedHousehold`] above the death age
    /// - [`DomainError::EmptyHousehold`] for a size of zero
    pub fn try_new(
        age: u32,
        demographics: Demographics,
        finance: FinancialPosition,
        utility: UtilityModel,
        formation: NaiveDate,
        lifecycle: &Lifecycle,
    ) -> Result<Self, DomainError> {
        if age < lifecycle.adulthood_age {
            return Err(DomainError::PrematureHousehold {
                age,
                adulthood: lifecycle.adulthood_age,
            });
        }
        if age > lifecycle.death_age {
            return Err(DomainError::DeceasedHousehold {
                age,
                death: lifecycle.death_age,
            });
        }
        if demographics.size == 0 {
            return Err(DomainError::EmptyHousehold);
        }
        Ok(Self {
            age,
            demographics,
            finance,
            utility,
            formation,
            clock: Clock::at_age(age, lifecycle),
        })
    }

    #[must_use]
    pub const fn age(&self) -> u32 {
        self.age
    }

    #[must_use]
    pub const fn demographics(&self) -> &Demographics {
        &self.demographics
    }

    #[must_use]
    pub const fn finance(&self) -> &FinancialPosition {
        &self.finance
    }

    #[must_use]
    pub const fn utility_model(&self) -> &UtilityModel {
        &self.utility
    }

    #[must_use]
    pub const fn formation(&self) -> NaiveDate {
        self.formation
    }

    #[must_use]
    pub const fn clock(&self) -> &Clock {
        &self.clock
    }

    /// Consumption sustainable from the household's current position.
    ///
    /// # Errors
    ///
    /// See [`FinancialPosition::consumption`].
    pub fn consumption(&self, economy: &Economy, housing_cost: f64) -> Result<f64, ModelError> {
        self.finance.consumption(&self.clock, economy, housing_cost)
    }

    /// Consumption sustainable from an alternative position (after a move).
    ///
    /// # Errors
    ///
    /// See [`FinancialPosition::consumption`].
    pub fn consumption_with(
        &self,
        finance: &FinancialPosition,
        economy: &Economy,
        housing_cost: f64,
    ) -> Result<f64, ModelError> {
        finance.consumption(&self.clock, economy, housing_cost)
    }

    /// Composite utility of living in `housing` at `consumption`.
    ///
    /// # Errors
    ///
    /// See [`UtilityModel::utility`].
    pub fn utility(&self, housing: &HousingUnit, consumption: f64) -> Result<f64, NumericError> {
        self.utility.utility(self, housing, consumption)
    }
}

impl Interned for Household {
    fn structural_key(&self) -> StructuralKey {
        let d = &self.demographics;
        let f = &self.finance;
        let mut key = KeyBuilder::new("household")
            .int(u64::from(self.age))
            .int(d.race as u64)
            .int(d.origin as u64)
            .int(d.language as u64)
            .int(d.education as u64)
            .int(u64::from(d.children))
            .int(u64::from(d.size))
            .float(f.wealth())
            .float(f.income())
            .float(f.property_value())
            .float(f.discount_rate())
            .float(f.risk_tolerance())
            .float(f.bequest());
        for loan in f.loans() {
            key = key
                .text(loan.label())
                .float(loan.balance())
                .float(loan.rate())
                .int(u64::from(loan.term()));
        }
        key = self.utility.key_into(key);
        key.int(u64::from(self.formation.num_days_from_ce().unsigned_abs()))
            .int(u64::from(self.clock.horizon))
            .int(u64::from(self.clock.to_retirement))
            .finish()
    }
}
