//! Multi-attribute household utility.
//!
//! Each [`UtilityIndex`] scores one domain (crime, school, space, ...) from a
//! dwelling's attribute bundle. [`UtilityModel`] combines the domain scores and
//! the consumption score with a multiplicative aggregator:
//!
//! ```text
//! U = Π_k score_k ^ exponent_k
//! ```
//!
//! so the composite responds less than proportionally to any one domain and is
//! zero whenever a required domain scores zero.

mod filtration;
mod index;
mod model;
mod shape;

pub use filtration::Filtration;
pub use index::{IndexKind, MetricWeight, UtilityIndex, CONSUMPTION_METRIC};
pub use model::UtilityModel;
pub use shape::Shape;
