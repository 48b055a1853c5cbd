//! # ChoreoKit Document
//!
//! The editable document behind a path-planning session:
//! - Robot configuration, paths, waypoints, and typed constraints
//! - Scope references that survive waypoint reordering
//! - Snapshot-based undo/redo with history-exempt solver updates
//! - Control-interval planning for the solver
//! - Versioned saved-document and trajectory file formats

pub mod document;
pub mod error;
pub mod history;
pub mod model;
pub mod planner;
pub mod scope;
pub mod serialization;

pub use document::{Document, DocumentState, PathDefaults, SolverRequest};
pub use error::{DocumentError, DocumentResult, PlannerError, PlannerResult};
pub use history::{CommandHistory, HistoryEntry};
pub use model::{
    Constraint, ConstraintDefinition, ConstraintKind, PathList, PropertyDefinition, RobotConfig,
    RobotPath, ScopeKind, TrajectorySample, Waypoint, WaypointType, CONSTRAINT_DEFINITIONS,
    DEFAULT_CONTROL_INTERVAL_COUNT, DEFAULT_PATH_NAME,
};
pub use scope::{Anchor, SavedWaypointRef, WaypointRef};
pub use serialization::{
    SavedConstraint, SavedDocument, SavedPath, SavedWaypoint, TrajectoryFile, CURRENT_VERSION,
    RECOGNIZED_VERSIONS,
};
