//! Error types for the document crate.
//!
//! Document errors cover lookups, edits rejected by model invariants, and
//! malformed saved documents. Planner errors are validation failures of the
//! robot configuration that make control-interval estimation impossible.

use choreokit_core::{ConstraintId, PathId, WaypointId};
use thiserror::Error;

/// Errors that can occur while editing, loading, or saving a document.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// No path with this identity exists.
    #[error("Path not found: {0}")]
    PathNotFound(PathId),

    /// No waypoint with this identity exists in the path.
    #[error("Waypoint not found: {0}")]
    WaypointNotFound(WaypointId),

    /// No constraint with this identity exists in the path.
    #[error("Constraint not found: {0}")]
    ConstraintNotFound(ConstraintId),

    /// A positional index is outside the waypoint sequence.
    #[error("Index {index} out of range for {len} waypoints")]
    IndexOutOfRange { index: usize, len: usize },

    /// Another path already uses this name.
    #[error("A path named '{0}' already exists")]
    DuplicatePathName(String),

    /// The constraint kind has no property with this key.
    #[error("Constraint {kind} has no property '{key}'")]
    UnknownProperty { kind: String, key: String },

    /// A constraint scope must reference one or two waypoints.
    #[error("Constraint scope must contain 1 or 2 waypoints, got {0}")]
    InvalidScopeLength(usize),

    /// The scope shape is not one the constraint kind accepts.
    #[error("Constraint {kind} does not accept a scope of {len} waypoint(s)")]
    ScopeNotAllowed { kind: String, len: usize },

    /// The saved document uses a version this build does not recognize.
    #[error("Unsupported document version: {0}")]
    UnsupportedVersion(String),

    /// The saved document does not match the expected structure.
    #[error("Invalid document: {0}")]
    InvalidFormat(String),

    /// The planner rejected the robot configuration.
    #[error(transparent)]
    Planner(#[from] PlannerError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Validation errors raised by the control-interval planner.
///
/// Each variant names a robot parameter that would cause a division by zero.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlannerError {
    #[error("Wheel max torque may not be 0")]
    ZeroWheelMaxTorque,

    #[error("Wheel max velocity may not be 0")]
    ZeroWheelMaxVelocity,

    #[error("Robot mass may not be 0")]
    ZeroMass,

    #[error("Wheel radius may not be 0")]
    ZeroWheelRadius,
}

/// Result type alias for document operations.
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Result type alias for planner operations.
pub type PlannerResult<T> = Result<T, PlannerError>;
