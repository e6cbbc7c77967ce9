//! Household balance sheet and lifetime budget.
//!
//! [`FinancialPosition`] holds liquid wealth, income, property and debts. Buying
//! and selling are the only transitions; both leave the position untouched when
//! they fail. Lifetime consumption is never stored: [`FinancialPosition::consumption`]
//! solves it in closed form from the current position.

use serde::Serialize;

use super::economy::{Bank, Broker, Economy};
use super::error::{DomainError, FinanceError, ModelError, NumericError};
use super::household::Clock;
use super::loan::Loan;
use super::period::{discount_factor, geometric_sum};

/// A household's balance sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialPosition {
    wealth: f64,
    income: f64,
    property_value: f64,
    mortgage: Loan,
    student: Loan,
    other: Loan,
    discount_rate: f64,
    risk_tolerance: f64,
    bequest: f64,
}

impl FinancialPosition {
    /// A debt-free position that owns no property.
    ///
    /// `discount_rate` is the household's per-period time preference.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidParameter`] for negative wealth or income,
    /// a non-positive risk tolerance, or any non-finite input.
    pub fn try_new(
        wealth: f64,
        income: f64,
        discount_rate: f64,
        risk_tolerance: f64,
    ) -> Result<Self, DomainError> {
        for (field, value) in [("wealth", wealth), ("income", income)] {
            if !value.is_finite() || value < 0.0 {
                return Err(DomainError::InvalidParameter {
                    field,
                    reason: format!("must be finite and non-negative, got {value}"),
                });
            }
        }
        if !discount_rate.is_finite() || discount_rate <= -1.0 {
            return Err(DomainError::InvalidParameter {
                field: "discount_rate",
                reason: format!("must be finite and above -1, got {discount_rate}"),
            });
        }
        if !risk_tolerance.is_finite() || risk_tolerance <= 0.0 {
            return Err(DomainError::InvalidParameter {
                field: "risk_tolerance",
                reason: format!("must be positive, got {risk_tolerance}"),
            });
        }
        Ok(Self {
            wealth,
            income,
            property_value: 0.0,
            mortgage: Loan::none("mortgage"),
            student: Loan::none("student"),
            other: Loan::none("other"),
            discount_rate,
            risk_tolerance,
            bequest: 0.0,
        })
    }

    /// Attach an existing property and the mortgage secured on it.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidParameter`] for a negative or non-finite value.
    pub fn with_property(mut self, value: f64, mortgage: Loan) -> Result<Self, DomainError> {
        if !value.is_finite() || value < 0.0 {
            return Err(DomainError::InvalidParameter {
                field: "property_value",
                reason: format!("must be finite and non-negative, got {value}"),
            });
        }
        self.property_value = value;
        self.mortgage = mortgage;
        Ok(self)
    }

    #[must_use]
    pub fn with_student_loan(mut self, loan: Loan) -> Self {
        self.student = loan;
        self
    }

    #[must_use]
    pub fn with_other_debt(mut self, loan: Loan) -> Self {
        self.other = loan;
        self
    }

    /// Wealth the household requires to hold at the end of its horizon.
    #[must_use]
    pub fn with_bequest(mut self, bequest: f64) -> Self {
        self.bequest = bequest.max(0.0);
        self
    }

    #[must_use]
    pub const fn wealth(&self) -> f64 {
        self.wealth
    }

    #[must_use]
    pub const fn income(&self) -> f64 {
        self.income
    }

    #[must_use]
    pub const fn property_value(&self) -> f64 {
        self.property_value
    }

    #[must_use]
    pub const fn mortgage(&self) -> &Loan {
        &self.mortgage
    }

    #[must_use]
    pub const fn student_loan(&self) -> &Loan {
        &self.student
    }

    #[must_use]
    pub const fn other_debt(&self) -> &Loan {
        &self.other
    }

    #[must_use]
    pub const fn discount_rate(&self) -> f64 {
        self.discount_rate
    }

    #[must_use]
    pub const fn risk_tolerance(&self) -> f64 {
        self.risk_tolerance
    }

    #[must_use]
    pub const fn bequest(&self) -> f64 {
        self.bequest
    }

    #[must_use]
    pub fn owns_property(&self) -> bool {
        self.property_value > 0.0
    }

    /// All loans, active or not.
    pub fn loans(&self) -> impl Iterator<Item = &Loan> {
        [&self.mortgage, &self.student, &self.other].into_iter()
    }

    /// Total periodic debt service.
    #[must_use]
    pub fn debt_service(&self) -> f64 {
        self.loans().map(Loan::payment).sum()
    }

    /// Income over debt service; infinite when nothing is owed.
    #[must_use]
    pub fn coverage(&self) -> f64 {
        let service = self.debt_service();
        if service > 0.0 {
            self.income / service
        } else {
            f64::INFINITY
        }
    }

    /// Mortgage balance over property value; zero when no property is held.
    #[must_use]
    pub fn loan_to_value(&self) -> f64 {
        if self.property_value > 0.0 {
            self.mortgage.balance() / self.property_value
        } else {
            0.0
        }
    }

    /// Sell the property, repay the mortgage and bank the rest.
    ///
    /// Returns the net proceeds (which may be negative for an underwater
    /// property). A position without property is left unchanged.
    pub fn sell(&mut self, broker: &Broker) -> f64 {
        if !self.owns_property() && !self.mortgage.is_active() {
            return 0.0;
        }
        let proceeds = self.property_value * (1.0 - broker.commission()) - self.mortgage.balance();
        self.wealth += proceeds;
        self.property_value = 0.0;
        self.mortgage = Loan::none(self.mortgage.label().to_string());
        proceeds
    }

    /// Buy a property at `price`, selling any property already held.
    ///
    /// Closing cost is `price·(1+commission)·(1+markup)`; the bank finances
    /// `price·max_loan_to_value` and the rest is paid from wealth.
    ///
    /// # Errors
    ///
    /// - [`FinanceError::InsufficientFunds`] if wealth would go negative
    /// - [`FinanceError::InsufficientCoverage`] if coverage would fall below the bank's minimum
    /// - [`NumericError::NonFinite`] for a negative or non-finite price
    ///
    /// The position is unchanged on error.
    pub fn buy(&mut self, price: f64, bank: &Bank, broker: &Broker) -> Result<(), ModelError> {
        if !price.is_finite() || price < 0.0 {
            return Err(NumericError::NonFinite {
                quantity: "price",
                value: price,
            }
            .into());
        }
        let mut next = self.clone();
        next.sell(broker);

        let closing = price * (1.0 + broker.commission()) * (1.0 + bank.financing_markup());
        let principal = price * bank.max_loan_to_value();
        let outlay = closing - principal;
        if next.wealth - outlay < 0.0 {
            return Err(FinanceError::InsufficientFunds {
                required: outlay,
                available: next.wealth,
            }
            .into());
        }

        next.wealth -= outlay;
        next.property_value = price;
        next.mortgage = Loan::try_new("mortgage", principal, bank.mortgage_rate(), bank.mortgage_term())
            .map_err(|_| NumericError::NonFinite {
                quantity: "mortgage principal",
                value: principal,
            })?;

        let coverage = next.coverage();
        if coverage < bank.required_coverage() {
            return Err(FinanceError::InsufficientCoverage {
                coverage,
                required: bank.required_coverage(),
            }
            .into());
        }

        *self = next;
        Ok(())
    }

    /// Initial per-period consumption sustainable over the household's horizon.
    ///
    /// With `θ = (wealth_rate − discount_rate) / risk_tolerance` consumption grows at
    /// `θ` per period, and the budget balances
    ///
    /// ```text
    /// c · Σ((1+θ)/(1+w))^t = wealth − bequest·(1+w)^−H + income · Σ((1+g)/(1+w))^t
    ///                        − housing_cost · Σ(1+w)^−t − Σ_loans factor_i · balance_i
    ///                        + (property − mortgage_H)·(1+w)^−H
    /// ```
    ///
    /// where income accrues until retirement and each loan is serviced until the
    /// earlier of its term and the horizon. The home is valued at the horizon net
    /// of the mortgage balance still owed then, `mortgage_H`. `housing_cost` is a
    /// recurring per-period cost (rent, occupancy) paid over the whole horizon.
    ///
    /// # Errors
    ///
    /// - [`FinanceError::UnsustainableLifestyle`] if the solved level is negative
    /// - [`FinanceError::ExhaustedHorizon`] for a zero horizon
    /// - [`NumericError`] for a degenerate rate
    pub fn consumption(
        &self,
        clock: &Clock,
        economy: &Economy,
        housing_cost: f64,
    ) -> Result<f64, ModelError> {
        let horizon = clock.horizon;
        if horizon == 0 {
            return Err(FinanceError::ExhaustedHorizon.into());
        }
        let w = economy.wealth_rate();
        let g = economy.income_rate();
        let theta = (w - self.discount_rate) / self.risk_tolerance;
        let discount = 1.0 / (1.0 + w);

        let consumption_integral = geometric_sum("consumption", (1.0 + theta) * discount, horizon)?;
        if !consumption_integral.is_finite() || consumption_integral <= 0.0 {
            return Err(NumericError::DegenerateIntegral {
                value: consumption_integral,
            }
            .into());
        }
        let income_integral = geometric_sum(
            "income",
            (1.0 + g) * discount,
            horizon.min(clock.to_retirement),
        )?;
        let housing_integral = geometric_sum("housing", discount, horizon)?;
        let terminal = discount_factor(w, horizon)?;

        let mut debt = 0.0;
        for loan in self.loans().filter(|l| l.is_active()) {
            let loan_integral = loan.payment_factor()
                * geometric_sum("loan", discount, horizon.min(loan.term()))?;
            debt += loan_integral * loan.balance();
        }

        let equity = self.property_value - self.mortgage.project(horizon).balance();
        let budget = self.wealth - self.bequest * terminal + income_integral * self.income
            - housing_integral * housing_cost
            - debt
            + equity * terminal;
        let consumption = budget / consumption_integral;

        if !consumption.is_finite() {
            return Err(NumericError::NonFinite {
                quantity: "consumption",
                value: consumption,
            }
            .into());
        }
        if consumption < 0.0 {
            return Err(FinanceError::UnsustainableLifestyle { consumption }.into());
        }
        Ok(consumption)
    }
}
