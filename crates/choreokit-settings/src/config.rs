//! Application configuration.
//!
//! Sections mirror the concerns of the editor core: where trajectories are
//! exported inside a project, how new paths are planned, how much undo
//! history is kept, and the default log level.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{SettingsError, SettingsResult};

/// Project layout and file naming
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectSettings {
    /// Trajectory directory relative to the document when a `build.gradle`
    /// sits next to it
    pub gradle_trajectory_dir: String,
    /// Trajectory directory relative to the document otherwise
    pub standalone_trajectory_dir: String,
    pub trajectory_extension: String,
    pub document_extension: String,
    /// Save after every undo, redo, or edit once the document has a location
    pub autosave: bool,
    pub default_path_name: String,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            gradle_trajectory_dir: "src/main/deploy/choreo".to_string(),
            standalone_trajectory_dir: "deploy/choreo".to_string(),
            trajectory_extension: "traj".to_string(),
            document_extension: "chor".to_string(),
            autosave: true,
            default_path_name: "NewPath".to_string(),
        }
    }
}

impl ProjectSettings {
    /// Trajectory directory for the given project type.
    pub fn trajectory_dir(&self, is_gradle_project: bool) -> &str {
        if is_gradle_project {
            &self.gradle_trajectory_dir
        } else {
            &self.standalone_trajectory_dir
        }
    }
}

/// Planner defaults applied to new paths
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerSettings {
    pub default_control_interval_count: u32,
    pub uses_control_interval_guessing: bool,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            default_control_interval_count: 40,
            uses_control_interval_guessing: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    /// Recorded edits kept before the oldest is folded into the baseline
    pub max_depth: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self { max_depth: 200 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default `tracing` directive when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub project: ProjectSettings,
    pub planner: PlannerSettings,
    pub history: HistorySettings,
    pub logging: LoggingSettings,
}

enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> SettingsResult<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(SettingsError::UnsupportedFormat(
            other.unwrap_or("<none>").to_string(),
        )),
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// `<config dir>/choreokit/config.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("choreokit").join("config.toml"))
            .ok_or(SettingsError::NoConfigDirectory)
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path).map_err(SettingsError::read(path))?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!("Loaded settings from {}", path.display());
        Ok(config)
    }

    /// Load from the default location, falling back to defaults when absent.
    pub fn load_or_default() -> SettingsResult<Self> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(SettingsError::write(parent))?;
        }
        std::fs::write(path, content)
            .map_err(SettingsError::write(path))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        let project = &self.project;
        for (key, value) in [
            ("project.gradle_trajectory_dir", &project.gradle_trajectory_dir),
            (
                "project.standalone_trajectory_dir",
                &project.standalone_trajectory_dir,
            ),
            ("project.trajectory_extension", &project.trajectory_extension),
            ("project.document_extension", &project.document_extension),
            ("project.default_path_name", &project.default_path_name),
        ] {
            if value.trim().is_empty() {
                return Err(SettingsError::invalid(key, "must not be empty"));
            }
        }

        if self.planner.default_control_interval_count == 0 {
            return Err(SettingsError::invalid(
                "planner.default_control_interval_count",
                "must be > 0",
            ));
        }

        if self.history.max_depth == 0 {
            return Err(SettingsError::invalid("history.max_depth", "must be > 0"));
        }

        if self.logging.level.trim().is_empty() {
            return Err(SettingsError::invalid("logging.level", "must not be empty"));
        }

        Ok(())
    }
}
