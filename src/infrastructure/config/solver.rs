//! Equilibrium solver settings.

use serde::Deserialize;

use crate::application::SolverConfig;

/// Solver settings as written in the `[solver]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct SolverSettings {
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
    #[serde(default = "default_initial_step_size")]
    pub initial_step_size: f64,
    #[serde(default = "default_relax_interval")]
    pub relax_interval: usize,
    #[serde(default = "default_relax_rate")]
    pub relax_rate: f64,
    #[serde(default = "default_choice_sensitivity")]
    pub choice_sensitivity: f64,
    /// Scoring threads. `0` uses one per CPU.
    #[serde(default = "default_workers")]
    pub workers: usize,
}

const fn default_tolerance() -> f64 {
    1e-4
}

const fn default_max_steps() -> usize {
    250
}

const fn default_initial_step_size() -> f64 {
    0.5
}

const fn default_relax_interval() -> usize {
    25
}

const fn default_relax_rate() -> f64 {
    0.9
}

const fn default_choice_sensitivity() -> f64 {
    20.0
}

const fn default_workers() -> usize {
    1
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            max_steps: default_max_steps(),
            initial_step_size: default_initial_step_size(),
            relax_interval: default_relax_interval(),
            relax_rate: default_relax_rate(),
            choice_sensitivity: default_choice_sensitivity(),
            workers: default_workers(),
        }
    }
}

impl From<SolverSettings> for SolverConfig {
    fn from(settings: SolverSettings) -> Self {
        let workers = match settings.workers {
            0 => num_cpus::get(),
            n => n,
        };
        Self {
            tolerance: settings.tolerance,
            max_steps: settings.max_steps,
            initial_step_size: settings.initial_step_size,
            relax_interval: settings.relax_interval,
            relax_rate: settings.relax_rate,
            choice_sensitivity: settings.choice_sensitivity,
            workers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_solver_defaults() {
        assert_eq!(SolverConfig::from(SolverSettings::default()), SolverConfig::default());
    }

    #[test]
    fn zero_workers_means_one_per_cpu() {
        let settings = SolverSettings {
            workers: 0,
            ..Default::default()
        };
        assert_eq!(SolverConfig::from(settings).workers, num_cpus::get());
    }
}
