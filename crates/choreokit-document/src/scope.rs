//! Identity & scope resolution.
//!
//! Constraints refer to waypoints by identity or by the symbolic anchors
//! `first` / `last`. Positions are only computed at the points where a
//! positional form is needed (saving, solver hand-off); live constraints
//! never store indices because indices drift under reordering.

use choreokit_core::WaypointId;
use serde::{Deserialize, Serialize};

use crate::model::Waypoint;

/// Reference from a constraint scope to a waypoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WaypointRef {
    /// A specific waypoint
    Waypoint(WaypointId),
    /// Whichever waypoint is at position 0
    First,
    /// Whichever waypoint is at position N-1
    Last,
}

/// Symbolic anchor as written in saved documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    First,
    Last,
}

/// Positional scope entry as written in saved documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SavedWaypointRef {
    Index(usize),
    Anchor(Anchor),
}

/// Resolve a reference to a position in `waypoints`.
pub fn resolve(reference: &WaypointRef, waypoints: &[Waypoint]) -> Option<usize> {
    match reference {
        WaypointRef::Waypoint(id) => waypoints.iter().position(|w| w.id() == *id),
        WaypointRef::First if !waypoints.is_empty() => Some(0),
        WaypointRef::Last if !waypoints.is_empty() => Some(waypoints.len() - 1),
        _ => None,
    }
}

/// Concrete reference to the waypoint at `index`.
pub fn to_ref(index: usize, waypoints: &[Waypoint]) -> Option<WaypointRef> {
    waypoints.get(index).map(|w| WaypointRef::Waypoint(w.id()))
}

/// Resolve every entry of a scope, or `None` if any entry does not resolve.
pub fn resolve_scope(scope: &[WaypointRef], waypoints: &[Waypoint]) -> Option<Vec<usize>> {
    scope.iter().map(|r| resolve(r, waypoints)).collect()
}

/// Translate a saved scope entry back into a live reference.
///
/// Anchors stay symbolic; indices become the identity currently at that
/// position.
pub fn from_saved(saved: &SavedWaypointRef, waypoints: &[Waypoint]) -> Option<WaypointRef> {
    match saved {
        SavedWaypointRef::Anchor(Anchor::First) => Some(WaypointRef::First),
        SavedWaypointRef::Anchor(Anchor::Last) => Some(WaypointRef::Last),
        SavedWaypointRef::Index(index) => to_ref(*index, waypoints),
    }
}
