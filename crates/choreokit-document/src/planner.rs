//! Control-interval planning.
//!
//! The solver discretizes each segment into a number of control intervals.
//! Too few and the trajectory is coarse, too many and solving is slow, so the
//! heuristic mode sizes each segment from the time a motion profile at the
//! robot's limits would need to cover it.

use choreokit_core::WaypointId;
use tracing::debug;

use crate::error::{PlannerError, PlannerResult};
use crate::model::{RobotConfig, RobotPath};

/// Nominal time step per control interval (s).
pub const NOMINAL_STEP_SECONDS: f64 = 0.1;

/// Shape of the velocity profile over a segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionProfile {
    /// Accelerate then decelerate without reaching cruise velocity
    Triangle,
    /// Accelerate, cruise, decelerate
    Trapezoid,
}

/// Reject configurations that would divide by zero.
pub fn validate(config: &RobotConfig) -> PlannerResult<()> {
    if config.wheel_max_torque == 0.0 {
        Err(PlannerError::ZeroWheelMaxTorque)
    } else if config.wheel_max_velocity == 0.0 {
        Err(PlannerError::ZeroWheelMaxVelocity)
    } else if config.mass == 0.0 {
        Err(PlannerError::ZeroMass)
    } else if config.wheel_radius == 0.0 {
        Err(PlannerError::ZeroWheelRadius)
    } else {
        Ok(())
    }
}

/// Profile and duration of a straight segment of length `distance`.
pub fn segment_time(
    distance: f64,
    max_velocity: f64,
    max_acceleration: f64,
) -> (MotionProfile, f64) {
    let distance_at_cruise = distance - max_velocity * max_velocity / max_acceleration;
    if distance_at_cruise < 0.0 {
        (
            MotionProfile::Triangle,
            2.0 * (distance / max_acceleration).sqrt(),
        )
    } else {
        (
            MotionProfile::Trapezoid,
            distance / max_velocity + max_velocity / max_acceleration,
        )
    }
}

/// Interval count for a segment, never less than one.
pub fn interval_count(distance: f64, max_velocity: f64, max_acceleration: f64) -> u32 {
    let (_, time) = segment_time(distance, max_velocity, max_acceleration);
    ((time / NOMINAL_STEP_SECONDS).ceil() as u32).max(1)
}

/// Compute interval counts for the path's real waypoints without applying them.
pub fn plan(path: &RobotPath, config: &RobotConfig) -> PlannerResult<Vec<(WaypointId, u32)>> {
    let real: Vec<_> = path.non_guess_or_empty_points().collect();
    let default_count = path.default_control_interval_count;

    if !path.uses_control_interval_guessing {
        return Ok(real.iter().map(|w| (w.id(), default_count)).collect());
    }

    validate(config)?;
    let max_acceleration = config.max_acceleration();
    let max_velocity = config.max_velocity();

    let mut counts: Vec<(WaypointId, u32)> = real
        .windows(2)
        .map(|pair| {
            let distance = pair[0].distance_to(pair[1]);
            (
                pair[0].id(),
                interval_count(distance, max_velocity, max_acceleration),
            )
        })
        .collect();
    if let Some(last) = real.last() {
        counts.push((last.id(), default_count));
    }
    Ok(counts)
}

/// Stamp interval counts onto the path's waypoints.
pub fn apply(path: &mut RobotPath, config: &RobotConfig) -> PlannerResult<()> {
    let counts = plan(path, config)?;
    for (id, count) in counts {
        if let Ok(waypoint) = path.waypoint_mut(id) {
            waypoint.control_interval_count = count;
        }
    }
    debug!(path = %path.name, "Control interval counts updated");
    Ok(())
}
