//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all settings of one
//! simulation. Configuration is loaded from a TOML file.
//!
//! # Example
//!
//! ```no_run
//! use abode::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("scenario.toml")?;
//!     config.init_logging();
//!     let ctx = config.build_context()?;
//!     println!("{} household archetypes", ctx.households().len());
//!     Ok(())
//! }
//! ```

use std::path::Path;

use serde::Deserialize;

use super::logging::LoggingConfig;
use super::scenario::{
    BankSettings, BrokerSettings, EconomySettings, HouseholdSettings, HousingSettings,
    UtilitySettings,
};
use super::solver::SolverSettings;
use crate::application::{SimulationContext, SolverConfig};
use crate::domain::error::DomainError;
use crate::domain::{Bank, Broker, Economy, Household, HousingUnit, Tenure};
use crate::error::{ConfigError, Result};
use crate::port::ScenarioSource;

/// Main application configuration.
///
/// Load from a TOML file using [`Config::load`] or parse directly with
/// [`Config::parse_toml`]. Both validate the whole scenario before returning.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub economy: EconomySettings,

    #[serde(default)]
    pub bank: BankSettings,

    #[serde(default)]
    pub broker: BrokerSettings,

    /// Equilibrium solver parameters.
    #[serde(default)]
    pub solver: SolverSettings,

    /// Utility indices shared by every household that does not set its own.
    #[serde(default)]
    pub utility: UtilitySettings,

    #[serde(default)]
    pub households: Vec<HouseholdSettings>,

    #[serde(default)]
    pub housing: Vec<HousingSettings>,

    /// Outside option; its `count` is ignored.
    #[serde(default)]
    pub reservation: Option<HousingSettings>,
}

fn invalid(field: &'static str, err: &DomainError) -> ConfigError {
    ConfigError::InvalidValue {
        field,
        reason: err.to_string(),
    }
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The TOML content is malformed
    /// - Validation fails (e.g., no housing, a household below adulthood)
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Validate configuration values.
    ///
    /// Builds every domain value once so range errors surface here, named by
    /// the section they came from.
    fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.households.is_empty() {
            return Err(ConfigError::MissingField { field: "households" });
        }
        if self.housing.is_empty() {
            return Err(ConfigError::MissingField { field: "housing" });
        }
        if self.households.iter().any(|h| h.count == 0) {
            return Err(ConfigError::InvalidValue {
                field: "households.count",
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.housing.iter().any(|h| h.count == 0) {
            return Err(ConfigError::InvalidValue {
                field: "housing.count",
                reason: "must be greater than 0".to_string(),
            });
        }

        let economy = self.economy.build().map_err(|e| invalid("economy", &e))?;
        self.bank.build().map_err(|e| invalid("bank", &e))?;
        self.broker.build().map_err(|e| invalid("broker", &e))?;
        self.solver_config()
            .validate()
            .map_err(|e| invalid("solver", &e))?;
        for household in &self.households {
            household
                .build(&economy, &self.utility)
                .map_err(|e| invalid("households", &e))?;
        }
        for unit in &self.housing {
            unit.build().map_err(|e| invalid("housing", &e))?;
        }
        if let Some(reservation) = &self.reservation {
            reservation.build().map_err(|e| invalid("reservation", &e))?;
        }
        Ok(())
    }

    /// Solver configuration with CPU-count defaults resolved.
    #[must_use]
    pub fn solver_config(&self) -> SolverConfig {
        self.solver.clone().into()
    }

    /// Build the simulation context this configuration describes.
    ///
    /// # Errors
    ///
    /// Returns an error if a domain value fails validation.
    pub fn build_context(&self) -> Result<SimulationContext> {
        Ok(SimulationContext::from_source(self)?)
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

impl ScenarioSource for Config {
    fn economy(&self) -> std::result::Result<Economy, DomainError> {
        self.economy.build()
    }

    fn bank(&self) -> std::result::Result<Bank, DomainError> {
        self.bank.build()
    }

    fn broker(&self) -> std::result::Result<Broker, DomainError> {
        self.broker.build()
    }

    fn households(
        &self,
        economy: &Economy,
    ) -> std::result::Result<Vec<(Household, u64)>, DomainError> {
        self.households
            .iter()
            .map(|h| Ok((h.build(economy, &self.utility)?, h.count)))
            .collect()
    }

    fn housing(&self) -> std::result::Result<Vec<(HousingUnit, u64)>, DomainError> {
        self.housing
            .iter()
            .map(|h| Ok((h.build()?, h.count)))
            .collect()
    }

    fn reservation(&self) -> std::result::Result<Option<(HousingUnit, Tenure)>, DomainError> {
        self.reservation
            .as_ref()
            .map(|r| Ok((r.build()?, r.tenure)))
            .transpose()
    }
}
