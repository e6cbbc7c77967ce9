//! Infrastructure configuration modules.

pub mod logging;
pub mod scenario;
pub mod settings;
pub mod solver;

pub use settings::Config;
