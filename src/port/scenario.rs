//! Scenario feed port.

use crate::domain::error::DomainError;
use crate::domain::{Bank, Broker, Economy, Household, HousingUnit, Tenure};

/// Supplies the parameters and archetypes of one simulation.
///
/// Implementations convert whatever they read (configuration files, survey
/// extracts) into validated domain values. Every rate and term handed out is
/// already in model periods.
///
/// # Implementation Notes
///
/// - Each archetype is paired with the number of entities it stands for
/// - Duplicate archetypes are allowed; the registry merges their counts
pub trait ScenarioSource {
    /// Economy-wide rates and the lifecycle bounds.
    ///
    /// # Errors
    ///
    /// Returns a [`DomainError`] if a parameter is out of range.
    fn economy(&self) -> Result<Economy, DomainError>;

    /// Mortgage lender terms.
    ///
    /// # Errors
    ///
    /// Returns a [`DomainError`] if a parameter is out of range.
    fn bank(&self) -> Result<Bank, DomainError>;

    /// Real-estate broker terms.
    ///
    /// # Errors
    ///
    /// Returns a [`DomainError`] if a parameter is out of range.
    fn broker(&self) -> Result<Broker, DomainError>;

    /// Household archetypes with their counts.
    ///
    /// # Errors
    ///
    /// Returns a [`DomainError`] if any household fails validation.
    fn households(&self, economy: &Economy) -> Result<Vec<(Household, u64)>, DomainError>;

    /// Housing archetypes with their supply.
    ///
    /// # Errors
    ///
    /// Returns a [`DomainError`] if any unit fails validation.
    fn housing(&self) -> Result<Vec<(HousingUnit, u64)>, DomainError>;

    /// Outside option every household can fall back on, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`DomainError`] if the unit fails validation.
    fn reservation(&self) -> Result<Option<(HousingUnit, Tenure)>, DomainError> {
        Ok(None)
    }
}
