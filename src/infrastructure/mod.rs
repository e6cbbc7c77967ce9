//! Infrastructure layer.
//!
//! Provides technical concerns that support the application without containing
//! model logic.
//!
//! # Submodules
//!
//! - [`config`] - Scenario loading, validation and logging setup

pub mod config;
