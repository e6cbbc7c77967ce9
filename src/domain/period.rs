//! Period-unit normalization.
//!
//! The model runs on a monthly clock. Rates and terms arrive in years from the
//! parameter feed and are converted here exactly once.

use super::error::NumericError;

/// Number of model periods in one year.
pub const PERIODS_PER_YEAR: u32 = 12;

/// Tolerance under which a series ratio is treated as exactly one.
const UNIT_RATIO_EPSILON: f64 = 1e-12;

/// Convert an annual rate to its compound-equivalent per-period rate.
#[must_use]
pub fn monthly_rate(annual: f64) -> f64 {
    (1.0 + annual).powf(1.0 / f64::from(PERIODS_PER_YEAR)) - 1.0
}

/// Convert whole years to periods.
#[must_use]
pub const fn months(years: u32) -> u32 {
    years * PERIODS_PER_YEAR
}

/// Sum of `ratio^t` for `t` in `0..periods`.
///
/// Uses the closed form away from `ratio == 1` and the limit `periods` near it,
/// so equal growth and discount rates never divide by zero.
///
/// # Errors
///
/// Returns [`NumericError::DegenerateRate`] if the ratio is non-positive or not finite.
pub fn geometric_sum(term: &'static str, ratio: f64, periods: u32) -> Result<f64, NumericError> {
    if !ratio.is_finite() || ratio <= 0.0 {
        return Err(NumericError::DegenerateRate { term, ratio });
    }
    if periods == 0 {
        return Ok(0.0);
    }
    let n = f64::from(periods);
    if (1.0 - ratio).abs() < UNIT_RATIO_EPSILON {
        return Ok(n);
    }
    Ok((1.0 - ratio.powf(n)) / (1.0 - ratio))
}

/// Present-value factor `(1 + rate)^(-periods)`.
///
/// # Errors
///
/// Returns [`NumericError::DegenerateRate`] if `1 + rate` is non-positive or not finite.
pub fn discount_factor(rate: f64, periods: u32) -> Result<f64, NumericError> {
    let base = 1.0 + rate;
    if !base.is_finite() || base <= 0.0 {
        return Err(NumericError::DegenerateRate {
            term: "discount",
            ratio: base,
        });
    }
    Ok(base.powf(-f64::from(periods)))
}
