//! Time-parameterized trajectory samples returned by the solver.

use serde::{Deserialize, Serialize};

/// One state of the generated trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrajectorySample {
    /// Seconds since the start of the trajectory
    pub timestamp: f64,
    pub x: f64,
    pub y: f64,
    pub heading: f64,
    #[serde(default)]
    pub velocity_x: f64,
    #[serde(default)]
    pub velocity_y: f64,
    #[serde(default)]
    pub angular_velocity: f64,
}

impl TrajectorySample {
    pub fn new(timestamp: f64, x: f64, y: f64, heading: f64) -> Self {
        Self {
            timestamp,
            x,
            y,
            heading,
            ..Default::default()
        }
    }
}
