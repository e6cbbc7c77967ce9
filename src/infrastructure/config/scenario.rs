//! Scenario settings: market parameters and archetypes.
//!
//! Rates are annual and terms are in years here; they are converted to model
//! periods when the domain values are built.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::error::DomainError;
use crate::domain::period::{monthly_rate, months};
use crate::domain::{
    Bank, Broker, Demographics, Economy, FinancialPosition, Household, HousingAttributes,
    HousingUnit, Lifecycle, Loan, Tenure, UtilityIndex, UtilityModel,
};

/// Economy-wide annual rates and lifecycle ages.
#[derive(Debug, Clone, Deserialize)]
pub struct EconomySettings {
    /// Annual return on liquid wealth.
    #[serde(default = "default_wealth_rate")]
    pub wealth_rate: f64,
    /// Annual income growth.
    #[serde(default = "default_income_rate")]
    pub income_rate: f64,
    /// Annual time preference used when a household sets none.
    #[serde(default = "default_wealth_rate")]
    pub discount_rate: f64,
    #[serde(default = "default_adulthood_age")]
    pub adulthood_age: u32,
    #[serde(default = "default_retirement_age")]
    pub retirement_age: u32,
    #[serde(default = "default_death_age")]
    pub death_age: u32,
}

const fn default_wealth_rate() -> f64 {
    0.04
}

const fn default_income_rate() -> f64 {
    0.02
}

const fn default_adulthood_age() -> u32 {
    18
}

const fn default_retirement_age() -> u32 {
    65
}

const fn default_death_age() -> u32 {
    85
}

impl Default for EconomySettings {
    fn default() -> Self {
        Self {
            wealth_rate: default_wealth_rate(),
            income_rate: default_income_rate(),
            discount_rate: default_wealth_rate(),
            adulthood_age: default_adulthood_age(),
            retirement_age: default_retirement_age(),
            death_age: default_death_age(),
        }
    }
}

impl EconomySettings {
    /// # Errors
    ///
    /// Returns a [`DomainError`] for out-of-range rates or misordered ages.
    pub fn build(&self) -> Result<Economy, DomainError> {
        let lifecycle = Lifecycle::try_new(self.adulthood_age, self.retirement_age, self.death_age)?;
        Economy::try_new(
            monthly_rate(self.wealth_rate),
            monthly_rate(self.income_rate),
            monthly_rate(self.discount_rate),
            lifecycle,
        )
    }
}

/// Mortgage lender settings.
#[derive(Debug, Clone, Deserialize)]
pub struct BankSettings {
    /// Annual mortgage rate.
    #[serde(default = "default_mortgage_rate")]
    pub mortgage_rate: f64,
    #[serde(default = "default_mortgage_years")]
    pub mortgage_years: u32,
    /// Largest share of income debt service may take (e.g. 0.28).
    #[serde(default = "default_debt_to_income")]
    pub debt_to_income: f64,
    #[serde(default = "default_max_loan_to_value")]
    pub max_loan_to_value: f64,
    #[serde(default)]
    pub financing_markup: f64,
}

const fn default_mortgage_rate() -> f64 {
    0.06
}

const fn default_mortgage_years() -> u32 {
    30
}

const fn default_debt_to_income() -> f64 {
    0.28
}

const fn default_max_loan_to_value() -> f64 {
    0.8
}

impl Default for BankSettings {
    fn default() -> Self {
        Self {
            mortgage_rate: default_mortgage_rate(),
            mortgage_years: default_mortgage_years(),
            debt_to_income: default_debt_to_income(),
            max_loan_to_value: default_max_loan_to_value(),
            financing_markup: 0.0,
        }
    }
}

impl BankSettings {
    /// # Errors
    ///
    /// Returns a [`DomainError`] if a parameter is out of range.
    pub fn build(&self) -> Result<Bank, DomainError> {
        Bank::from_debt_to_income(
            monthly_rate(self.mortgage_rate),
            months(self.mortgage_years),
            self.debt_to_income,
            self.max_loan_to_value,
            self.financing_markup,
        )
    }
}

/// Broker settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BrokerSettings {
    #[serde(default)]
    pub commission: f64,
}

impl BrokerSettings {
    /// # Errors
    ///
    /// Returns a [`DomainError`] if the commission is outside `[0, 1]`.
    pub fn build(&self) -> Result<Broker, DomainError> {
        Broker::try_new(self.commission)
    }
}

/// Utility indices shared by households that do not set their own.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UtilitySettings {
    #[serde(default)]
    pub indices: Vec<UtilityIndex>,
}

/// An existing loan, in annual terms.
#[derive(Debug, Clone, Deserialize)]
pub struct LoanSettings {
    pub balance: f64,
    /// Annual rate.
    pub rate: f64,
    /// Remaining term in years.
    pub years: u32,
}

impl LoanSettings {
    fn build(&self, label: &str) -> Result<Loan, DomainError> {
        Loan::from_annual(label, self.balance, self.rate, self.years)
    }
}

/// A property the household already holds.
#[derive(Debug, Clone, Deserialize)]
pub struct PropertySettings {
    pub value: f64,
    #[serde(default)]
    pub mortgage: Option<LoanSettings>,
}

/// One household archetype.
#[derive(Debug, Clone, Deserialize)]
pub struct HouseholdSettings {
    /// Number of households this archetype stands for.
    #[serde(default = "default_count")]
    pub count: u64,
    pub age: u32,
    pub wealth: f64,
    /// Income per month.
    pub income: f64,
    /// Annual time preference; the economy's when unset.
    #[serde(default)]
    pub discount_rate: Option<f64>,
    #[serde(default = "default_risk_tolerance")]
    pub risk_tolerance: f64,
    #[serde(default)]
    pub bequest: f64,
    #[serde(default = "default_formation")]
    pub formation: NaiveDate,
    #[serde(default)]
    pub demographics: Demographics,
    #[serde(default)]
    pub property: Option<PropertySettings>,
    #[serde(default)]
    pub student_loan: Option<LoanSettings>,
    #[serde(default)]
    pub other_debt: Option<LoanSettings>,
    /// Replaces the shared `[utility]` indices for this archetype.
    #[serde(default)]
    pub utility: Option<UtilitySettings>,
}

const fn default_count() -> u64 {
    1
}

const fn default_risk_tolerance() -> f64 {
    1.0
}

fn default_formation() -> NaiveDate {
    NaiveDate::default()
}

impl HouseholdSettings {
    /// # Errors
    ///
    /// Returns a [`DomainError`] if any part of the household fails validation.
    pub fn build(&self, economy: &Economy, shared: &UtilitySettings) -> Result<Household, DomainError> {
        let discount_rate = self
            .discount_rate
            .map_or(economy.discount_rate(), monthly_rate);
        let mut finance =
            FinancialPosition::try_new(self.wealth, self.income, discount_rate, self.risk_tolerance)?
                .with_bequest(self.bequest);
        if let Some(property) = &self.property {
            let mortgage = match &property.mortgage {
                Some(loan) => loan.build("mortgage")?,
                None => Loan::none("mortgage"),
            };
            finance = finance.with_property(property.value, mortgage)?;
        }
        if let Some(loan) = &self.student_loan {
            finance = finance.with_student_loan(loan.build("student")?);
        }
        if let Some(loan) = &self.other_debt {
            finance = finance.with_other_debt(loan.build("other")?);
        }
        let indices = self.utility.as_ref().unwrap_or(shared).indices.clone();
        Household::try_new(
            self.age,
            self.demographics,
            finance,
            UtilityModel::try_new(indices)?,
            self.formation,
            economy.lifecycle(),
        )
    }
}

/// One housing archetype.
#[derive(Debug, Clone, Deserialize)]
pub struct HousingSettings {
    /// Number of units this archetype stands for.
    #[serde(default = "default_count")]
    pub count: u64,
    pub tenure: Tenure,
    #[serde(default)]
    pub price_per_area: f64,
    #[serde(default)]
    pub rent_per_area: f64,
    #[serde(default)]
    pub occupancy_per_area: f64,
    #[serde(default)]
    pub geography: String,
    #[serde(default)]
    pub vintage: u32,
    #[serde(default)]
    pub attributes: HousingAttributes,
}

impl HousingSettings {
    /// # Errors
    ///
    /// Returns a [`DomainError`] if the unit has no area or a negative price.
    pub fn build(&self) -> Result<HousingUnit, DomainError> {
        HousingUnit::try_new(
            self.tenure,
            self.price_per_area,
            self.rent_per_area,
            self.occupancy_per_area,
            self.attributes.clone(),
            self.geography.clone(),
            self.vintage,
        )
    }
}
