//! Housing market domain model, free of I/O.
//!
//! Leaves first: [`period`] and [`loan`] arithmetic, the [`economy`] parameter
//! bundles, the household [`finance`] model, [`housing`] and [`household`]
//! archetypes, the [`utility`] model, and the archetype [`registry`].

pub mod economy;
pub mod error;
pub mod finance;
pub mod household;
pub mod housing;
pub mod loan;
pub mod metric;
pub mod period;
pub mod registry;
pub mod utility;

pub use economy::{Bank, Broker, Economy, Lifecycle};
pub use finance::FinancialPosition;
pub use household::{Clock, Demographics, Education, Household, Language, Origin, Race};
pub use housing::{HousingAttributes, HousingUnit, Tenure, AREA_METRIC};
pub use loan::Loan;
pub use metric::MetricBundle;
pub use registry::{ArchetypeId, Interned, Registry};
pub use utility::{Filtration, IndexKind, MetricWeight, Shape, UtilityIndex, UtilityModel};
