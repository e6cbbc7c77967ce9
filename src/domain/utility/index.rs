//! Per-domain utility indices.

use serde::{Deserialize, Serialize};

use super::shape::Shape;
use crate::domain::error::{DomainError, NumericError};
use crate::domain::housing::HousingAttributes;
use crate::domain::metric::MetricBundle;
use crate::domain::registry::KeyBuilder;

/// Metric name under which solved consumption is scored.
pub const CONSUMPTION_METRIC: &str = "consumption";

/// The attribute domain an index scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexKind {
    Crime,
    School,
    Space,
    Community,
    Proximity,
    Quality,
    /// Economic consumption; fed from the lifetime budget rather than the dwelling.
    Consumption,
}

impl IndexKind {
    /// The dwelling bundle this index reads, or `None` for consumption.
    #[must_use]
    pub const fn bundle(self, attributes: &HousingAttributes) -> Option<&MetricBundle> {
        match self {
            Self::Crime => Some(&attributes.crime),
            Self::School => Some(&attributes.school),
            Self::Space => Some(&attributes.space),
            Self::Community => Some(&attributes.community),
            Self::Proximity => Some(&attributes.proximity),
            Self::Quality => Some(&attributes.quality),
            Self::Consumption => None,
        }
    }

    pub(crate) fn bundle_mut(self, attributes: &mut HousingAttributes) -> Option<&mut MetricBundle> {
        match self {
            Self::Crime => Some(&mut attributes.crime),
            Self::School => Some(&mut attributes.school),
            Self::Space => Some(&mut attributes.space),
            Self::Community => Some(&mut attributes.community),
            Self::Proximity => Some(&mut attributes.proximity),
            Self::Quality => Some(&mut attributes.quality),
            Self::Consumption => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Crime => "crime",
            Self::School => "school",
            Self::Space => "space",
            Self::Community => "community",
            Self::Proximity => "proximity",
            Self::Quality => "quality",
            Self::Consumption => "consumption",
        }
    }
}

const fn default_weight() -> f64 {
    1.0
}

const fn default_scale() -> f64 {
    1.0
}

const fn default_exponent() -> f64 {
    1.0
}

const fn default_required() -> bool {
    true
}

/// One weighted sub-metric of an index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricWeight {
    pub metric: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
    pub shape: Shape,
    /// Raw values are divided by this before shaping.
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// Divide the raw value by household size (e.g. bedrooms per person).
    #[serde(default)]
    pub per_person: bool,
}

impl MetricWeight {
    pub fn new(metric: impl Into<String>, weight: f64, shape: Shape) -> Self {
        Self {
            metric: metric.into(),
            weight,
            shape,
            scale: 1.0,
            per_person: false,
        }
    }

    #[must_use]
    pub fn scaled(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    #[must_use]
    pub fn per_person(mut self) -> Self {
        self.per_person = true;
        self
    }
}

/// A named, weighted, shaped combination of sub-metrics scoring one domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UtilityIndex {
    pub name: String,
    pub kind: IndexKind,
    /// Exponent of this index in the composite aggregator.
    #[serde(default = "default_exponent")]
    pub exponent: f64,
    /// A zero score on a required index zeroes the composite.
    #[serde(default = "default_required")]
    pub required: bool,
    pub metrics: Vec<MetricWeight>,
}

impl UtilityIndex {
    pub fn new(name: impl Into<String>, kind: IndexKind, exponent: f64, metrics: Vec<MetricWeight>) -> Self {
        Self {
            name: name.into(),
            kind,
            exponent,
            required: true,
            metrics,
        }
    }

    #[must_use]
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), DomainError> {
        if !self.exponent.is_finite() || self.exponent <= 0.0 {
            return Err(DomainError::InvalidParameter {
                field: "exponent",
                reason: format!("index '{}' exponent must be positive, got {}", self.name, self.exponent),
            });
        }
        if self.metrics.is_empty() {
            return Err(DomainError::InvalidParameter {
                field: "metrics",
                reason: format!("index '{}' has no metrics", self.name),
            });
        }
        for m in &self.metrics {
            if !m.weight.is_finite() || m.weight < 0.0 {
                return Err(DomainError::InvalidParameter {
                    field: "weight",
                    reason: format!("index '{}' metric '{}' weight must be non-negative", self.name, m.metric),
                });
            }
            if !m.scale.is_finite() || m.scale <= 0.0 {
                return Err(DomainError::InvalidParameter {
                    field: "scale",
                    reason: format!("index '{}' metric '{}' scale must be positive", self.name, m.metric),
                });
            }
        }
        Ok(())
    }

    /// Shaped value of every sub-metric, in configuration order.
    ///
    /// # Errors
    ///
    /// [`NumericError::MissingMetric`] when the bundle lacks a metric and
    /// [`NumericError::OutOfDomain`] for a negative or non-finite raw value.
    pub fn sub_scores(&self, bundle: &MetricBundle, household_size: u32) -> Result<Vec<f64>, NumericError> {
        self.metrics
            .iter()
            .map(|m| {
                let raw = bundle.get(&m.metric).ok_or_else(|| NumericError::MissingMetric {
                    index: self.name.clone(),
                    metric: m.metric.clone(),
                })?;
                if !raw.is_finite() || raw < 0.0 {
                    return Err(NumericError::OutOfDomain {
                        index: self.name.clone(),
                        metric: m.metric.clone(),
                        value: raw,
                    });
                }
                let mut x = raw / m.scale;
                if m.per_person {
                    x /= f64::from(household_size.max(1));
                }
                Ok(m.shape.apply(x))
            })
            .collect()
    }

    /// Weighted domain score.
    ///
    /// # Errors
    ///
    /// Same conditions as [`UtilityIndex::sub_scores`].
    pub fn score(&self, bundle: &MetricBundle, household_size: u32) -> Result<f64, NumericError> {
        let subs = self.sub_scores(bundle, household_size)?;
        Ok(self.metrics.iter().zip(subs).map(|(m, s)| m.weight * s).sum())
    }

    pub(crate) fn key_into(&self, mut key: KeyBuilder) -> KeyBuilder {
        key = key
            .text(self.name.as_str())
            .tag(self.kind.as_str())
            .float(self.exponent)
            .int(u64::from(self.required));
        for m in &self.metrics {
            key = key
                .text(m.metric.as_str())
                .float(m.weight)
                .tag(m.shape.as_str())
                .float(m.scale)
                .int(u64::from(m.per_person));
        }
        key
    }
}
