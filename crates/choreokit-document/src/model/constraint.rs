//! Constraints and their parameter schema.
//!
//! Each constraint kind declares which scope shapes it accepts and a table of
//! numeric properties with typed accessors. Loading a saved constraint walks
//! that table instead of building setter names from the saved keys.

use choreokit_core::ConstraintId;

use crate::error::{DocumentError, DocumentResult};
use crate::scope::WaypointRef;

/// Scope shapes a constraint kind accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// A single waypoint
    Waypoint,
    /// A span between two waypoints
    Segment,
    /// Either of the above
    Both,
}

impl ScopeKind {
    pub fn allows_waypoint(self) -> bool {
        matches!(self, ScopeKind::Waypoint | ScopeKind::Both)
    }

    pub fn allows_segment(self) -> bool {
        matches!(self, ScopeKind::Segment | ScopeKind::Both)
    }
}

/// Typed constraint parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstraintKind {
    WptVelocityDirection { direction: f64 },
    WptZeroVelocity,
    StopPoint,
    MaxVelocity { velocity: f64 },
    ZeroAngularVelocity,
    StraightLine,
    PointAt { x: f64, y: f64, tolerance: f64 },
    HeadingAt { heading: f64 },
}

/// A numeric property in a constraint kind's schema.
#[derive(Debug)]
pub struct PropertyDefinition {
    pub key: &'static str,
    pub description: &'static str,
    pub units: &'static str,
    pub default: f64,
    get: fn(&ConstraintKind) -> Option<f64>,
    set: fn(&mut ConstraintKind, f64) -> bool,
}

impl PropertyDefinition {
    pub fn get(&self, kind: &ConstraintKind) -> Option<f64> {
        (self.get)(kind)
    }

    /// Returns false if `kind` is not the kind this property belongs to.
    pub fn set(&self, kind: &mut ConstraintKind, value: f64) -> bool {
        (self.set)(kind, value)
    }
}

/// Schema entry for one constraint kind.
#[derive(Debug)]
pub struct ConstraintDefinition {
    /// Tag used in saved documents
    pub type_name: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub scope: ScopeKind,
    pub properties: &'static [PropertyDefinition],
}

fn get_direction(kind: &ConstraintKind) -> Option<f64> {
    match kind {
        ConstraintKind::WptVelocityDirection { direction } => Some(*direction),
        _ => None,
    }
}

fn set_direction(kind: &mut ConstraintKind, value: f64) -> bool {
    match kind {
        ConstraintKind::WptVelocityDirection { direction } => {
            *direction = value;
            true
        }
        _ => false,
    }
}

fn get_velocity(kind: &ConstraintKind) -> Option<f64> {
    match kind {
        ConstraintKind::MaxVelocity { velocity } => Some(*velocity),
        _ => None,
    }
}

fn set_velocity(kind: &mut ConstraintKind, value: f64) -> bool {
    match kind {
        ConstraintKind::MaxVelocity { velocity } => {
            *velocity = value;
            true
        }
        _ => false,
    }
}

fn get_point_x(kind: &ConstraintKind) -> Option<f64> {
    match kind {
        ConstraintKind::PointAt { x, .. } => Some(*x),
        _ => None,
    }
}

fn set_point_x(kind: &mut ConstraintKind, value: f64) -> bool {
    match kind {
        ConstraintKind::PointAt { x, .. } => {
            *x = value;
            true
        }
        _ => false,
    }
}

fn get_point_y(kind: &ConstraintKind) -> Option<f64> {
    match kind {
        ConstraintKind::PointAt { y, .. } => Some(*y),
        _ => None,
    }
}

fn set_point_y(kind: &mut ConstraintKind, value: f64) -> bool {
    match kind {
        ConstraintKind::PointAt { y, .. } => {
            *y = value;
            true
        }
        _ => false,
    }
}

fn get_tolerance(kind: &ConstraintKind) -> Option<f64> {
    match kind {
        ConstraintKind::PointAt { tolerance, .. } => Some(*tolerance),
        _ => None,
    }
}

fn set_tolerance(kind: &mut ConstraintKind, value: f64) -> bool {
    match kind {
        ConstraintKind::PointAt { tolerance, .. } => {
            *tolerance = value;
            true
        }
        _ => false,
    }
}

fn get_heading(kind: &ConstraintKind) -> Option<f64> {
    match kind {
        ConstraintKind::HeadingAt { heading } => Some(*heading),
        _ => None,
    }
}

fn set_heading(kind: &mut ConstraintKind, value: f64) -> bool {
    match kind {
        ConstraintKind::HeadingAt { heading } => {
            *heading = value;
            true
        }
        _ => false,
    }
}

static DIRECTION_PROPERTIES: [PropertyDefinition; 1] = [PropertyDefinition {
    key: "direction",
    description: "Direction of robot velocity",
    units: "rad",
    default: 0.0,
    get: get_direction,
    set: set_direction,
}];

static MAX_VELOCITY_PROPERTIES: [PropertyDefinition; 1] = [PropertyDefinition {
    key: "velocity",
    description: "Maximum Velocity of robot chassis",
    units: "m/s",
    default: 0.0,
    get: get_velocity,
    set: set_velocity,
}];

static POINT_AT_PROPERTIES: [PropertyDefinition; 3] = [
    PropertyDefinition {
        key: "x",
        description: "X of point",
        units: "m",
        default: 0.0,
        get: get_point_x,
        set: set_point_x,
    },
    PropertyDefinition {
        key: "y",
        description: "Y of point",
        units: "m",
        default: 0.0,
        get: get_point_y,
        set: set_point_y,
    },
    PropertyDefinition {
        key: "tolerance",
        description: "Allowed heading error while pointing",
        units: "rad",
        default: 0.0,
        get: get_tolerance,
        set: set_tolerance,
    },
];

static HEADING_PROPERTIES: [PropertyDefinition; 1] = [PropertyDefinition {
    key: "heading",
    description: "Robot heading at the waypoint",
    units: "rad",
    default: 0.0,
    get: get_heading,
    set: set_heading,
}];

/// Every constraint kind, in display order.
pub static CONSTRAINT_DEFINITIONS: [ConstraintDefinition; 8] = [
    ConstraintDefinition {
        type_name: "WptVelocityDirection",
        name: "Waypoint Velocity Direction",
        description: "Direction of travel through waypoint",
        scope: ScopeKind::Waypoint,
        properties: &DIRECTION_PROPERTIES,
    },
    ConstraintDefinition {
        type_name: "WptZeroVelocity",
        name: "Waypoint Zero Velocity",
        description: "Zero velocity at waypoint",
        scope: ScopeKind::Waypoint,
        properties: &[],
    },
    ConstraintDefinition {
        type_name: "StopPoint",
        name: "Stop Point",
        description: "Zero linear and angular velocity at waypoint",
        scope: ScopeKind::Waypoint,
        properties: &[],
    },
    ConstraintDefinition {
        type_name: "MaxVelocity",
        name: "Max Velocity",
        description: "Maximum Velocity",
        scope: ScopeKind::Both,
        properties: &MAX_VELOCITY_PROPERTIES,
    },
    ConstraintDefinition {
        type_name: "ZeroAngularVelocity",
        name: "Zero Angular Velocity",
        description: "Zero angular velocity throughout scope",
        scope: ScopeKind::Both,
        properties: &[],
    },
    ConstraintDefinition {
        type_name: "StraightLine",
        name: "Straight Line",
        description: "Follow straight lines between waypoints",
        scope: ScopeKind::Segment,
        properties: &[],
    },
    ConstraintDefinition {
        type_name: "PointAt",
        name: "Point At",
        description: "Face a field point throughout scope",
        scope: ScopeKind::Both,
        properties: &POINT_AT_PROPERTIES,
    },
    ConstraintDefinition {
        type_name: "HeadingAt",
        name: "Heading At",
        description: "Hold a fixed heading at waypoint",
        scope: ScopeKind::Waypoint,
        properties: &HEADING_PROPERTIES,
    },
];

impl ConstraintKind {
    /// The schema entry for this kind.
    pub fn definition(&self) -> &'static ConstraintDefinition {
        let index = match self {
            ConstraintKind::WptVelocityDirection { .. } => 0,
            ConstraintKind::WptZeroVelocity => 1,
            ConstraintKind::StopPoint => 2,
            ConstraintKind::MaxVelocity { .. } => 3,
            ConstraintKind::ZeroAngularVelocity => 4,
            ConstraintKind::StraightLine => 5,
            ConstraintKind::PointAt { .. } => 6,
            ConstraintKind::HeadingAt { .. } => 7,
        };
        &CONSTRAINT_DEFINITIONS[index]
    }

    pub fn type_name(&self) -> &'static str {
        self.definition().type_name
    }

    /// A kind with every property at its schema default, by saved tag.
    pub fn from_type_name(type_name: &str) -> Option<Self> {
        let mut kind = match type_name {
            "WptVelocityDirection" => ConstraintKind::WptVelocityDirection { direction: 0.0 },
            "WptZeroVelocity" => ConstraintKind::WptZeroVelocity,
            "StopPoint" => ConstraintKind::StopPoint,
            "MaxVelocity" => ConstraintKind::MaxVelocity { velocity: 0.0 },
            "ZeroAngularVelocity" => ConstraintKind::ZeroAngularVelocity,
            "StraightLine" => ConstraintKind::StraightLine,
            "PointAt" => ConstraintKind::PointAt {
                x: 0.0,
                y: 0.0,
                tolerance: 0.0,
            },
            "HeadingAt" => ConstraintKind::HeadingAt { heading: 0.0 },
            _ => return None,
        };
        for property in kind.definition().properties {
            property.set(&mut kind, property.default);
        }
        Some(kind)
    }

    /// Scope a fresh constraint of this kind gets when none is given.
    pub fn default_scope(&self) -> Vec<WaypointRef> {
        if self.definition().scope.allows_segment() {
            vec![WaypointRef::First, WaypointRef::Last]
        } else {
            vec![WaypointRef::First]
        }
    }
}

/// A typed restriction over one or two waypoints.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    id: ConstraintId,
    pub kind: ConstraintKind,
    scope: Vec<WaypointRef>,
    /// Transient UI selection
    pub selected: bool,
}

impl Constraint {
    /// Create a constraint over an explicit scope.
    pub fn new(kind: ConstraintKind, scope: Vec<WaypointRef>) -> DocumentResult<Self> {
        Self::with_id(ConstraintId::new(), kind, scope)
    }

    pub(crate) fn with_id(
        id: ConstraintId,
        kind: ConstraintKind,
        scope: Vec<WaypointRef>,
    ) -> DocumentResult<Self> {
        validate_scope(&kind, scope.len())?;
        Ok(Self {
            id,
            kind,
            scope,
            selected: false,
        })
    }

    /// Create a constraint with the kind's default scope.
    pub fn with_default_scope(kind: ConstraintKind) -> Self {
        let scope = kind.default_scope();
        Self {
            id: ConstraintId::new(),
            kind,
            scope,
            selected: false,
        }
    }

    pub fn id(&self) -> ConstraintId {
        self.id
    }

    pub fn scope(&self) -> &[WaypointRef] {
        &self.scope
    }

    pub fn set_scope(&mut self, scope: Vec<WaypointRef>) -> DocumentResult<()> {
        validate_scope(&self.kind, scope.len())?;
        self.scope = scope;
        Ok(())
    }

    pub fn definition(&self) -> &'static ConstraintDefinition {
        self.kind.definition()
    }

    pub fn property(&self, key: &str) -> Option<f64> {
        self.definition()
            .properties
            .iter()
            .find(|p| p.key == key)
            .and_then(|p| p.get(&self.kind))
    }

    pub fn set_property(&mut self, key: &str, value: f64) -> DocumentResult<()> {
        let definition = self.definition();
        let property = definition
            .properties
            .iter()
            .find(|p| p.key == key)
            .ok_or_else(|| DocumentError::UnknownProperty {
                kind: definition.type_name.to_string(),
                key: key.to_string(),
            })?;
        property.set(&mut self.kind, value);
        Ok(())
    }

    /// All schema properties with their current values.
    pub fn properties(&self) -> Vec<(&'static str, f64)> {
        self.definition()
            .properties
            .iter()
            .filter_map(|p| p.get(&self.kind).map(|v| (p.key, v)))
            .collect()
    }

    pub(crate) fn regenerate_id(&mut self) {
        self.id = ConstraintId::new();
    }

    pub(crate) fn scope_mut(&mut self) -> &mut Vec<WaypointRef> {
        &mut self.scope
    }
}

fn validate_scope(kind: &ConstraintKind, len: usize) -> DocumentResult<()> {
    let scope = kind.definition().scope;
    let allowed = match len {
        1 => scope.allows_waypoint(),
        2 => scope.allows_segment(),
        _ => return Err(DocumentError::InvalidScopeLength(len)),
    };
    if allowed {
        Ok(())
    } else {
        Err(DocumentError::ScopeNotAllowed {
            kind: kind.type_name().to_string(),
            len,
        })
    }
}
