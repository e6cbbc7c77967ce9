//! Immutable market parameter bundles.
//!
//! - [`Economy`] - growth and return rates shared by every household
//! - [`Lifecycle`] - the ages that bound a household's planning clock
//! - [`Bank`] - mortgage pricing and underwriting limits
//! - [`Broker`] - transaction commission
//!
//! All rates held here are per period. Configuration converts annual inputs.

use serde::Serialize;

use super::error::DomainError;

fn check_rate(field: &'static str, rate: f64) -> Result<(), DomainError> {
    if !rate.is_finite() || rate <= -1.0 {
        return Err(DomainError::InvalidParameter {
            field,
            reason: format!("must be finite and above -1, got {rate}"),
        });
    }
    Ok(())
}

fn check_fraction(field: &'static str, value: f64) -> Result<(), DomainError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(DomainError::InvalidParameter {
            field,
            reason: format!("must be between 0 and 1, got {value}"),
        });
    }
    Ok(())
}

/// Ages (in whole years) that bound a household's planning clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Lifecycle {
    pub adulthood_age: u32,
    pub retirement_age: u32,
    pub death_age: u32,
}

impl Lifecycle {
    /// Create a lifecycle, requiring `adulthood <= retirement <= death`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidParameter`] when the ages are out of order.
    pub fn try_new(adulthood_age: u32, retirement_age: u32, death_age: u32) -> Result<Self, DomainError> {
        if !(adulthood_age <= retirement_age && retirement_age <= death_age) {
            return Err(DomainError::InvalidParameter {
                field: "lifecycle",
                reason: format!(
                    "ages must be ordered adulthood <= retirement <= death, got {adulthood_age}/{retirement_age}/{death_age}"
                ),
            });
        }
        Ok(Self {
            adulthood_age,
            retirement_age,
            death_age,
        })
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self {
            adulthood_age: 18,
            retirement_age: 65,
            death_age: 85,
        }
    }
}

/// Economy-wide rates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Economy {
    wealth_rate: f64,
    income_rate: f64,
    discount_rate: f64,
    lifecycle: Lifecycle,
}

impl Economy {
    /// Create an economy from per-period rates.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidParameter`] for a non-finite rate or one at or below -100%.
    pub fn try_new(
        wealth_rate: f64,
        income_rate: f64,
        discount_rate: f64,
        lifecycle: Lifecycle,
    ) -> Result<Self, DomainError> {
        check_rate("wealth_rate", wealth_rate)?;
        check_rate("income_rate", income_rate)?;
        check_rate("discount_rate", discount_rate)?;
        Ok(Self {
            wealth_rate,
            income_rate,
            discount_rate,
            lifecycle,
        })
    }

    /// Return earned on liquid wealth per period.
    #[must_use]
    pub const fn wealth_rate(&self) -> f64 {
        self.wealth_rate
    }

    /// Growth of labour income per period.
    #[must_use]
    pub const fn income_rate(&self) -> f64 {
        self.income_rate
    }

    /// Default household time preference per period.
    #[must_use]
    pub const fn discount_rate(&self) -> f64 {
        self.discount_rate
    }

    #[must_use]
    pub const fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }
}

/// Mortgage lender terms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bank {
    mortgage_rate: f64,
    mortgage_term: u32,
    required_coverage: f64,
    max_loan_to_value: f64,
    financing_markup: f64,
}

impl Bank {
    /// Create a bank from a per-period mortgage rate and a term in periods.
    ///
    /// `required_coverage` is the minimum ratio of income to total debt service.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidParameter`] if a rate is invalid, the coverage is
    /// not positive, or loan-to-value / markup are outside `[0, 1]`.
    pub fn try_new(
        mortgage_rate: f64,
        mortgage_term: u32,
        required_coverage: f64,
        max_loan_to_value: f64,
        financing_markup: f64,
    ) -> Result<Self, DomainError> {
        check_rate("mortgage_rate", mortgage_rate)?;
        if mortgage_term == 0 {
            return Err(DomainError::InvalidParameter {
                field: "mortgage_term",
                reason: "must be at least one period".to_string(),
            });
        }
        if !required_coverage.is_finite() || required_coverage <= 0.0 {
            return Err(DomainError::InvalidParameter {
                field: "required_coverage",
                reason: format!("must be positive, got {required_coverage}"),
            });
        }
        check_fraction("max_loan_to_value", max_loan_to_value)?;
        check_fraction("financing_markup", financing_markup)?;
        Ok(Self {
            mortgage_rate,
            mortgage_term,
            required_coverage,
            max_loan_to_value,
            financing_markup,
        })
    }

    /// Create a bank that caps debt service at `cap` of income (e.g. 0.28).
    ///
    /// # Errors
    ///
    /// Same conditions as [`Bank::try_new`], plus a cap outside `(0, 1]`.
    pub fn from_debt_to_income(
        mortgage_rate: f64,
        mortgage_term: u32,
        cap: f64,
        max_loan_to_value: f64,
        financing_markup: f64,
    ) -> Result<Self, DomainError> {
        if !(cap > 0.0 && cap <= 1.0) {
            return Err(DomainError::InvalidParameter {
                field: "debt_to_income",
                reason: format!("must be in (0, 1], got {cap}"),
            });
        }
        Self::try_new(
            mortgage_rate,
            mortgage_term,
            1.0 / cap,
            max_loan_to_value,
            financing_markup,
        )
    }

    #[must_use]
    pub const fn mortgage_rate(&self) -> f64 {
        self.mortgage_rate
    }

    #[must_use]
    pub const fn mortgage_term(&self) -> u32 {
        self.mortgage_term
    }

    #[must_use]
    pub const fn required_coverage(&self) -> f64 {
        self.required_coverage
    }

    #[must_use]
    pub const fn max_loan_to_value(&self) -> f64 {
        self.max_loan_to_value
    }

    #[must_use]
    pub const fn financing_markup(&self) -> f64 {
        self.financing_markup
    }
}

/// Real-estate broker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Broker {
    commission: f64,
}

impl Broker {
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidParameter`] if the commission is outside `[0, 1]`.
    pub fn try_new(commission: f64) -> Result<Self, DomainError> {
        check_fraction("commission", commission)?;
        Ok(Self { commission })
    }

    #[must_use]
    pub const fn commission(&self) -> f64 {
        self.commission
    }
}
