//! Saved document and trajectory file formats.
//!
//! Saved scopes are positional: every entry is resolved to an index at save
//! time. Loading turns indices back into waypoint identities and keeps any
//! `"first"`/`"last"` anchors symbolic.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::document::DocumentState;
use crate::error::{DocumentError, DocumentResult};
use crate::model::{
    Constraint, ConstraintKind, PathList, RobotConfig, RobotPath, TrajectorySample, Waypoint,
    DEFAULT_CONTROL_INTERVAL_COUNT,
};
use crate::scope::{self, SavedWaypointRef};

/// Version written by this build.
pub const CURRENT_VERSION: &str = "v0.1";

/// Versions this build can load.
pub const RECOGNIZED_VERSIONS: [&str; 3] = ["v0.0.0", "v0.0.1", "v0.1"];

/// Top-level saved document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedDocument {
    pub version: String,
    pub robot_configuration: RobotConfig,
    #[serde(default)]
    pub paths: Vec<SavedPath>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedPath {
    pub name: String,
    pub waypoints: Vec<SavedWaypoint>,
    #[serde(default)]
    pub constraints: Vec<SavedConstraint>,
    #[serde(default)]
    pub trajectory: Option<Vec<TrajectorySample>>,
    #[serde(default = "default_true")]
    pub uses_control_interval_guessing: bool,
    #[serde(default = "default_control_interval_count")]
    pub default_control_interval_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedWaypoint {
    pub x: f64,
    pub y: f64,
    pub heading: f64,
    #[serde(default)]
    pub is_initial_guess: bool,
    #[serde(default = "default_true")]
    pub translation_constrained: bool,
    #[serde(default = "default_true")]
    pub heading_constrained: bool,
    #[serde(default = "default_control_interval_count")]
    pub control_interval_count: u32,
}

/// A constraint with positional scope and its numeric properties inline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedConstraint {
    #[serde(rename = "type")]
    pub constraint_type: String,
    pub scope: Vec<SavedWaypointRef>,
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

/// Contents of an exported `.traj` file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryFile {
    pub samples: Vec<TrajectorySample>,
}

fn default_true() -> bool {
    true
}

fn default_control_interval_count() -> u32 {
    DEFAULT_CONTROL_INTERVAL_COUNT
}

impl SavedWaypoint {
    pub fn from_waypoint(waypoint: &Waypoint) -> Self {
        Self {
            x: waypoint.x,
            y: waypoint.y,
            heading: waypoint.heading,
            is_initial_guess: waypoint.is_initial_guess,
            translation_constrained: waypoint.translation_constrained,
            heading_constrained: waypoint.heading_constrained,
            control_interval_count: waypoint.control_interval_count,
        }
    }

    pub fn to_waypoint(&self) -> Waypoint {
        let mut waypoint = Waypoint::at(self.x, self.y, self.heading);
        waypoint.is_initial_guess = self.is_initial_guess;
        waypoint.translation_constrained = self.translation_constrained;
        waypoint.heading_constrained = self.heading_constrained;
        waypoint.control_interval_count = self.control_interval_count;
        waypoint
    }
}

impl SavedConstraint {
    /// Positional form of a live constraint, `None` if any scope entry dangles.
    pub fn from_constraint(constraint: &Constraint, waypoints: &[Waypoint]) -> Option<Self> {
        let indices = scope::resolve_scope(constraint.scope(), waypoints)?;
        let properties = constraint
            .properties()
            .into_iter()
            .filter_map(|(key, value)| {
                serde_json::Number::from_f64(value).map(|n| (key.to_string(), Value::Number(n)))
            })
            .collect();
        Some(Self {
            constraint_type: constraint.kind.type_name().to_string(),
            scope: indices.into_iter().map(SavedWaypointRef::Index).collect(),
            properties,
        })
    }

    /// Rebuild a live constraint against already-loaded waypoints.
    ///
    /// Returns `Ok(None)` for constraint types this build does not know.
    /// Saved keys outside the type's schema, or with non-numeric values, are
    /// ignored.
    pub fn to_constraint(&self, waypoints: &[Waypoint]) -> DocumentResult<Option<Constraint>> {
        let Some(kind) = ConstraintKind::from_type_name(&self.constraint_type) else {
            debug!(constraint_type = %self.constraint_type, "Skipping unknown constraint type");
            return Ok(None);
        };

        let scope = self
            .scope
            .iter()
            .map(|saved| {
                scope::from_saved(saved, waypoints).ok_or_else(|| {
                    DocumentError::InvalidFormat(format!(
                        "{} scope entry {:?} does not match any of {} waypoints",
                        self.constraint_type,
                        saved,
                        waypoints.len()
                    ))
                })
            })
            .collect::<DocumentResult<Vec<_>>>()?;

        let mut constraint = Constraint::new(kind, scope)?;
        for property in constraint.definition().properties {
            if let Some(value) = self.properties.get(property.key).and_then(Value::as_f64) {
                constraint.set_property(property.key, value)?;
            }
        }
        Ok(Some(constraint))
    }
}

impl RobotPath {
    /// Saved form of this path.
    ///
    /// Constraints whose scope no longer resolves are left out.
    pub fn as_saved_path(&self) -> SavedPath {
        let constraints = self
            .constraints()
            .iter()
            .filter_map(|constraint| {
                let saved = SavedConstraint::from_constraint(constraint, self.waypoints());
                if saved.is_none() {
                    warn!(
                        path = %self.name,
                        constraint = %constraint.id(),
                        "Dropping constraint with unresolvable scope from saved path"
                    );
                }
                saved
            })
            .collect();

        SavedPath {
            name: self.name.clone(),
            waypoints: self
                .waypoints()
                .iter()
                .map(SavedWaypoint::from_waypoint)
                .collect(),
            constraints,
            trajectory: self.saved_trajectory().map(<[TrajectorySample]>::to_vec),
            uses_control_interval_guessing: self.uses_control_interval_guessing,
            default_control_interval_count: self.default_control_interval_count,
        }
    }

    /// Saved form handed to the solver: scopes as sorted indices, no cache.
    pub fn as_solver_path(&self) -> SavedPath {
        let mut saved = self.as_saved_path();
        saved.trajectory = None;
        for constraint in &mut saved.constraints {
            constraint.scope.sort_by_key(|entry| match entry {
                SavedWaypointRef::Index(i) => *i,
                SavedWaypointRef::Anchor(_) => usize::MAX,
            });
        }
        saved
    }

    /// Build a path from its saved form.
    pub fn from_saved_path(saved: &SavedPath) -> DocumentResult<RobotPath> {
        if saved.default_control_interval_count == 0 {
            return Err(DocumentError::InvalidFormat(format!(
                "path '{}' has a default control interval count of 0",
                saved.name
            )));
        }
        if let Some(index) = saved
            .waypoints
            .iter()
            .position(|w| w.control_interval_count == 0)
        {
            return Err(DocumentError::InvalidFormat(format!(
                "waypoint {} of path '{}' has a control interval count of 0",
                index, saved.name
            )));
        }

        let mut path = RobotPath::new(saved.name.clone());
        for waypoint in &saved.waypoints {
            path.push_waypoint(waypoint.to_waypoint());
        }
        for saved_constraint in &saved.constraints {
            if let Some(constraint) = saved_constraint.to_constraint(path.waypoints())? {
                path.add_constraint(constraint);
            }
        }
        if let Some(trajectory) = &saved.trajectory {
            path.set_trajectory(trajectory.clone());
        }
        path.uses_control_interval_guessing = saved.uses_control_interval_guessing;
        path.default_control_interval_count = saved.default_control_interval_count;
        Ok(path)
    }
}

impl SavedDocument {
    pub fn from_state(state: &DocumentState) -> Self {
        Self {
            version: CURRENT_VERSION.to_string(),
            robot_configuration: state.robot_config.clone(),
            paths: state.path_list.iter().map(RobotPath::as_saved_path).collect(),
        }
    }

    /// Parse saved JSON, rejecting unknown versions before the body.
    pub fn parse(contents: &str) -> DocumentResult<Self> {
        let value: Value = serde_json::from_str(contents)?;
        let version = value
            .get("version")
            .and_then(Value::as_str)
            .ok_or_else(|| DocumentError::InvalidFormat("missing version tag".to_string()))?;
        if !RECOGNIZED_VERSIONS.contains(&version) {
            return Err(DocumentError::UnsupportedVersion(version.to_string()));
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_json(&self) -> DocumentResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Build a complete document state, or fail without side effects.
    pub fn to_state(&self) -> DocumentResult<DocumentState> {
        if !RECOGNIZED_VERSIONS.contains(&self.version.as_str()) {
            return Err(DocumentError::UnsupportedVersion(self.version.clone()));
        }
        let paths = self
            .paths
            .iter()
            .map(RobotPath::from_saved_path)
            .collect::<DocumentResult<Vec<_>>>()?;
        Ok(DocumentState {
            robot_config: self.robot_configuration.clone(),
            path_list: PathList::from_paths(paths).unwrap_or_default(),
        })
    }

    /// Save to a file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = self.to_json().context("Failed to serialize document")?;
        std::fs::write(path.as_ref(), json).context("Failed to write document file")?;
        Ok(())
    }

    /// Load from a file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read document file")?;
        let document = Self::parse(&content).context("Failed to parse document file")?;
        Ok(document)
    }
}

impl TrajectoryFile {
    pub fn new(samples: &[TrajectorySample]) -> Self {
        Self {
            samples: samples.to_vec(),
        }
    }

    pub fn parse(contents: &str) -> DocumentResult<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    pub fn to_json(&self) -> DocumentResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
