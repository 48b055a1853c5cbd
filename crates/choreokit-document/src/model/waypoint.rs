//! Waypoint entity.

use choreokit_core::WaypointId;
use serde::{Deserialize, Serialize};

/// Default solver discretization for a fresh waypoint.
pub const DEFAULT_CONTROL_INTERVAL_COUNT: u32 = 40;

/// How much of the pose a waypoint pins down.
///
/// Derived from the waypoint flags rather than stored, so the flags and the
/// type can never disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WaypointType {
    /// Position and heading are both constrained
    Full,
    /// Only the position is constrained
    Translation,
    /// Neither position nor heading is constrained
    Empty,
    /// A hint for the solver's initial guess, not a constraint
    InitialGuess,
}

impl WaypointType {
    /// Index used by keyboard shortcuts and older tooling
    pub fn index(self) -> usize {
        match self {
            WaypointType::Full => 0,
            WaypointType::Translation => 1,
            WaypointType::Empty => 2,
            WaypointType::InitialGuess => 3,
        }
    }

    /// Inverse of [`WaypointType::index`]
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(WaypointType::Full),
            1 => Some(WaypointType::Translation),
            2 => Some(WaypointType::Empty),
            3 => Some(WaypointType::InitialGuess),
            _ => None,
        }
    }
}

impl std::fmt::Display for WaypointType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Full => write!(f, "Full"),
            Self::Translation => write!(f, "Translation"),
            Self::Empty => write!(f, "Empty"),
            Self::InitialGuess => write!(f, "Initial Guess"),
        }
    }
}

/// A pose plus planning flags belonging to a path.
#[derive(Debug, Clone, PartialEq)]
pub struct Waypoint {
    id: WaypointId,
    pub x: f64,
    pub y: f64,
    /// Heading in radians
    pub heading: f64,
    pub heading_constrained: bool,
    pub translation_constrained: bool,
    pub is_initial_guess: bool,
    /// Solver discretization for the segment starting at this waypoint
    pub control_interval_count: u32,
    /// Transient UI selection
    pub selected: bool,
}

impl Waypoint {
    /// Create a fully constrained waypoint at the origin.
    pub fn new() -> Self {
        Self::with_id(WaypointId::new())
    }

    pub(crate) fn with_id(id: WaypointId) -> Self {
        Self {
            id,
            x: 0.0,
            y: 0.0,
            heading: 0.0,
            heading_constrained: true,
            translation_constrained: true,
            is_initial_guess: false,
            control_interval_count: DEFAULT_CONTROL_INTERVAL_COUNT,
            selected: false,
        }
    }

    /// Create a fully constrained waypoint at a pose.
    pub fn at(x: f64, y: f64, heading: f64) -> Self {
        Self {
            x,
            y,
            heading,
            ..Self::new()
        }
    }

    pub fn id(&self) -> WaypointId {
        self.id
    }

    pub fn waypoint_type(&self) -> WaypointType {
        if self.is_initial_guess {
            WaypointType::InitialGuess
        } else if self.translation_constrained && self.heading_constrained {
            WaypointType::Full
        } else if self.translation_constrained {
            WaypointType::Translation
        } else {
            WaypointType::Empty
        }
    }

    /// Assign the flags that make up a waypoint type.
    pub fn set_type(&mut self, waypoint_type: WaypointType) {
        match waypoint_type {
            WaypointType::Full => {
                self.is_initial_guess = false;
                self.translation_constrained = true;
                self.heading_constrained = true;
            }
            WaypointType::Translation => {
                self.is_initial_guess = false;
                self.translation_constrained = true;
                self.heading_constrained = false;
            }
            WaypointType::Empty => {
                self.is_initial_guess = false;
                self.translation_constrained = false;
                self.heading_constrained = false;
            }
            WaypointType::InitialGuess => {
                self.is_initial_guess = true;
                self.translation_constrained = true;
                self.heading_constrained = true;
            }
        }
    }

    /// True for waypoints the planner sizes segments between.
    pub fn is_real(&self) -> bool {
        !self.is_initial_guess && self.waypoint_type() != WaypointType::Empty
    }

    /// Straight-line distance to another waypoint.
    pub fn distance_to(&self, other: &Waypoint) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    pub(crate) fn regenerate_id(&mut self) {
        self.id = WaypointId::new();
    }
}

impl Default for Waypoint {
    fn default() -> Self {
        Self::new()
    }
}
