//! Document entities: robot configuration, waypoints, constraints and paths.

mod constraint;
mod path;
mod path_list;
mod robot_config;
mod sample;
mod waypoint;

pub use constraint::{
    Constraint, ConstraintDefinition, ConstraintKind, PropertyDefinition, ScopeKind,
    CONSTRAINT_DEFINITIONS,
};
pub use path::RobotPath;
pub use path_list::{PathList, DEFAULT_PATH_NAME};
pub use robot_config::RobotConfig;
pub use sample::TrajectorySample;
pub use waypoint::{Waypoint, WaypointType, DEFAULT_CONTROL_INTERVAL_COUNT};
