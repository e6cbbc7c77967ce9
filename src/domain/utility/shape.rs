//! Monotone shaping functions applied to raw sub-metrics.

use std::f64::consts::FRAC_2_PI;

use serde::{Deserialize, Serialize};

/// How a raw metric maps to a desirability score.
///
/// All shapes take non-negative input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    /// Higher is worse: `1 / (1 + x)`, from 1 at zero towards 0.
    Inverted,
    /// Bounded diminishing returns: `(2/π)·atan(x)`, from 0 towards 1.
    Tangent,
    /// Unbounded diminishing returns: `ln(1 + x)`.
    Logarithm,
}

impl Shape {
    #[must_use]
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Self::Inverted => 1.0 / (1.0 + x),
            Self::Tangent => FRAC_2_PI * x.atan(),
            Self::Logarithm => x.ln_1p(),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inverted => "inverted",
            Self::Tangent => "tangent",
            Self::Logarithm => "logarithm",
        }
    }
}
