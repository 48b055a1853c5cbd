//! Robot configuration.

use serde::{Deserialize, Serialize};

/// Kinematic and physical parameters of the robot.
///
/// Treated as a value object: the planner reads the wheel and mass figures,
/// everything is passed through to the solver unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RobotConfig {
    /// Robot mass (kg)
    pub mass: f64,
    /// Moment of inertia about the vertical axis (kg·m²)
    pub rotational_inertia: f64,
    /// Maximum wheel angular velocity (rad/s)
    pub wheel_max_velocity: f64,
    /// Maximum wheel torque (N·m)
    pub wheel_max_torque: f64,
    /// Wheel radius (m)
    pub wheel_radius: f64,
    /// Bumper width (m)
    pub bumper_width: f64,
    /// Bumper length (m)
    pub bumper_length: f64,
    /// Distance between front and back wheels (m)
    pub wheelbase: f64,
    /// Distance between left and right wheels (m)
    pub track_width: f64,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            mass: 74.088,
            rotational_inertia: 6.0,
            wheel_max_velocity: 70.0,
            wheel_max_torque: 5.0,
            wheel_radius: 0.0508,
            bumper_width: 0.876,
            bumper_length: 0.876,
            wheelbase: 0.578,
            track_width: 0.578,
        }
    }
}

impl RobotConfig {
    /// Peak linear acceleration with all four modules at max torque.
    pub fn max_acceleration(&self) -> f64 {
        let max_force = self.wheel_max_torque / self.wheel_radius;
        max_force * 4.0 / self.mass
    }

    /// Peak linear velocity at max wheel speed.
    pub fn max_velocity(&self) -> f64 {
        self.wheel_max_velocity * self.wheel_radius
    }
}
