//! ChoreoKit Settings Crate
//!
//! Application configuration loaded from JSON or TOML.

pub mod config;
pub mod error;

pub use config::{Config, HistorySettings, LoggingSettings, PlannerSettings, ProjectSettings};
pub use error::{SettingsError, SettingsResult};
