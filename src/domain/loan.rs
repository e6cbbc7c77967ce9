//! Amortizing debt instruments.
//!
//! A [`Loan`] is immutable: paying it down is modelled by [`Loan::project`],
//! which returns the loan as it stands after some number of periods.

use serde::Serialize;

use super::error::DomainError;
use super::period::{monthly_rate, months};

/// A single fixed-rate, fully amortizing debt.
///
/// Rate and term are always per period (monthly). Use [`Loan::from_annual`] when
/// starting from a yearly rate and a term in years.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Loan {
    balance: f64,
    rate: f64,
    term: u32,
    label: String,
}

impl Loan {
    /// Create a loan from a per-period rate and a term in periods.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NegativeBalance`] for a negative balance and
    /// [`DomainError::InvalidParameter`] for a non-finite balance or a rate at or below -100%.
    pub fn try_new(
        label: impl Into<String>,
        balance: f64,
        rate: f64,
        term: u32,
    ) -> Result<Self, DomainError> {
        let label = label.into();
        if !balance.is_finite() {
            return Err(DomainError::InvalidParameter {
                field: "balance",
                reason: format!("must be finite, got {balance}"),
            });
        }
        if balance < 0.0 {
            return Err(DomainError::NegativeBalance { label, balance });
        }
        if !rate.is_finite() || rate <= -1.0 {
            return Err(DomainError::InvalidParameter {
                field: "rate",
                reason: format!("must be finite and above -1, got {rate}"),
            });
        }
        Ok(Self {
            balance,
            rate,
            term,
            label,
        })
    }

    /// Create a loan from an annual rate and a term in whole years.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Loan::try_new`].
    pub fn from_annual(
        label: impl Into<String>,
        balance: f64,
        annual_rate: f64,
        years: u32,
    ) -> Result<Self, DomainError> {
        Self::try_new(label, balance, monthly_rate(annual_rate), months(years))
    }

    /// An inactive loan with nothing owed.
    pub fn none(label: impl Into<String>) -> Self {
        Self {
            balance: 0.0,
            rate: 0.0,
            term: 0,
            label: label.into(),
        }
    }

    /// Outstanding principal.
    #[must_use]
    pub const fn balance(&self) -> f64 {
        self.balance
    }

    /// Per-period interest rate.
    #[must_use]
    pub const fn rate(&self) -> f64 {
        self.rate
    }

    /// Remaining periods.
    #[must_use]
    pub const fn term(&self) -> u32 {
        self.term
    }

    /// Human-readable label ("mortgage", "student", ...).
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// True if anything is still owed.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.balance > 0.0
    }

    /// Level payment that retires the balance over the remaining term.
    #[must_use]
    pub fn payment(&self) -> f64 {
        if self.balance == 0.0 {
            return 0.0;
        }
        if self.term == 0 {
            return self.balance;
        }
        let n = f64::from(self.term);
        if self.rate == 0.0 {
            return self.balance / n;
        }
        self.balance * self.rate / (1.0 - (1.0 + self.rate).powf(-n))
    }

    /// Interest portion of the next payment.
    #[must_use]
    pub fn interest(&self) -> f64 {
        self.balance * self.rate
    }

    /// Principal portion of the next payment.
    #[must_use]
    pub fn principal(&self) -> f64 {
        self.payment() - self.interest()
    }

    /// Payment per unit of balance; zero for an inactive loan.
    #[must_use]
    pub fn payment_factor(&self) -> f64 {
        if self.balance == 0.0 {
            0.0
        } else {
            self.payment() / self.balance
        }
    }

    /// The loan after `periods` scheduled payments.
    ///
    /// Elapsed periods beyond the remaining term are capped at the term.
    #[must_use]
    pub fn project(&self, periods: u32) -> Self {
        let k = periods.min(self.term);
        if k == 0 {
            return self.clone();
        }
        let remaining = self.term - k;
        let balance = if remaining == 0 {
            0.0
        } else {
            let payment = self.payment();
            let kf = f64::from(k);
            if self.rate == 0.0 {
                self.balance - payment * kf
            } else {
                let growth = (1.0 + self.rate).powf(kf);
                self.balance * growth - payment * (growth - 1.0) / self.rate
            }
        };
        Self {
            balance: balance.max(0.0),
            rate: self.rate,
            term: remaining,
            label: self.label.clone(),
        }
    }

    /// The loan once every remaining payment has been made.
    #[must_use]
    pub fn payoff(&self) -> Self {
        self.project(self.term)
    }
}
