//! Domain errors for the housing market model.
//!
//! Errors fall into three families that callers treat very differently:
//!
//! - [`DomainError`] - an invariant was violated while constructing a value
//!   (a household below adulthood, a negative loan balance). Fatal for that value.
//! - [`FinanceError`] - a financial transition is not affordable. Expected during
//!   scoring; the equilibrium solver records it as an infeasible choice.
//! - [`NumericError`] - a computation left its valid domain. This points at a
//!   configuration bug and is propagated out of a solve.
//!
//! [`ModelError`] joins the last two for operations that can fail either way.
//!
//! # Examples
//!
//! ```
//! use abode::domain::error::{FinanceError, ModelError};
//!
//! let err = ModelError::from(FinanceError::UnsustainableLifestyle { consumption: -12.5 });
//! assert!(err.is_infeasible());
//! ```

use thiserror::Error;

/// Errors that occur when domain invariants are violated at construction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Household is younger than the adulthood threshold.
    #[error("household age {age} is below adulthood ({adulthood})")]
    PrematureHousehold {
        /// The age that was provided.
        age: u32,
        /// The configured adulthood age.
        adulthood: u32,
    },

    /// Household is older than the death bound.
    #[error("household age {age} is beyond the death bound ({death})")]
    DeceasedHousehold {
        /// The age that was provided.
        age: u32,
        /// The configured death age.
        death: u32,
    },

    /// A household must contain at least one person.
    #[error("household size must be at least 1")]
    EmptyHousehold,

    /// An archetype must stand for at least one instance.
    #[error("archetype count must be at least 1")]
    EmptyArchetype,

    /// Loan balances cannot be negative.
    #[error("loan '{label}' balance must be non-negative, got {balance}")]
    NegativeBalance {
        /// Label of the offending loan.
        label: String,
        /// The invalid balance.
        balance: f64,
    },

    /// A numeric parameter is outside its accepted range.
    #[error("invalid {field}: {reason}")]
    InvalidParameter {
        /// Name of the parameter.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },

    /// A housing unit is missing a metric every unit must carry.
    #[error("housing unit is missing required metric '{metric}'")]
    MissingMetric {
        /// The metric that was expected.
        metric: &'static str,
    },
}

/// A financial transition or lifestyle the household cannot afford.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FinanceError {
    /// Liquid wealth would go negative after paying for the transaction.
    #[error("insufficient funds: transaction requires {required:.2}, {available:.2} available")]
    InsufficientFunds {
        /// Cash the transaction needs.
        required: f64,
        /// Liquid wealth on hand.
        available: f64,
    },

    /// Income would not cover debt service by the bank's required margin.
    #[error("insufficient coverage: {coverage:.3} below required {required:.3}")]
    InsufficientCoverage {
        /// Coverage ratio after the transaction.
        coverage: f64,
        /// Minimum coverage the bank accepts.
        required: f64,
    },

    /// The lifetime budget only balances with negative consumption.
    #[error("unsustainable lifestyle: solved consumption {consumption:.2} is negative")]
    UnsustainableLifestyle {
        /// The negative consumption level that was solved.
        consumption: f64,
    },

    /// The household has no remaining periods to consume over.
    #[error("household has no remaining horizon")]
    ExhaustedHorizon,
}

/// A computation left its valid numeric domain.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NumericError {
    /// A discounting ratio is non-positive or non-finite.
    #[error("degenerate rate in {term}: ratio {ratio}")]
    DegenerateRate {
        /// Which series the ratio belongs to.
        term: &'static str,
        /// The offending ratio.
        ratio: f64,
    },

    /// The consumption annuity factor collapsed.
    #[error("consumption integral is not positive: {value}")]
    DegenerateIntegral {
        /// The computed integral.
        value: f64,
    },

    /// A utility input is outside the shaping function's domain.
    #[error("index '{index}' metric '{metric}' out of domain: {value}")]
    OutOfDomain {
        /// Name of the utility index.
        index: String,
        /// Name of the metric.
        metric: String,
        /// The offending value.
        value: f64,
    },

    /// A utility index refers to a metric the bundle does not carry.
    #[error("index '{index}' requires metric '{metric}'")]
    MissingMetric {
        /// Name of the utility index.
        index: String,
        /// Name of the missing metric.
        metric: String,
    },

    /// A computed quantity is NaN or infinite.
    #[error("non-finite {quantity}: {value}")]
    NonFinite {
        /// What was being computed.
        quantity: &'static str,
        /// The computed value.
        value: f64,
    },
}

/// Failure of an operation that can be either unaffordable or numerically broken.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error(transparent)]
    Finance(#[from] FinanceError),

    #[error(transparent)]
    Numeric(#[from] NumericError),
}

impl ModelError {
    /// True when the failure is an affordability condition rather than a bug.
    #[must_use]
    pub const fn is_infeasible(&self) -> bool {
        matches!(self, Self::Finance(_))
    }
}
