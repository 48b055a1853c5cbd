//! Path entity: ordered waypoints, constraints, and the cached trajectory.

use std::collections::HashMap;

use choreokit_core::{ConstraintId, PathId, WaypointId};

use super::constraint::Constraint;
use super::sample::TrajectorySample;
use super::waypoint::{Waypoint, DEFAULT_CONTROL_INTERVAL_COUNT};
use crate::error::{DocumentError, DocumentResult};
use crate::scope::WaypointRef;

/// Tolerance for matching a trajectory sample to a waypoint pose.
const WAYPOINT_MATCH_EPSILON: f64 = 1e-9;

/// A named waypoint/constraint collection plus cached generation results.
///
/// The cached trajectory is not invalidated by edits to waypoints or
/// constraints; callers decide when it is stale.
#[derive(Debug, Clone, PartialEq)]
pub struct RobotPath {
    id: PathId,
    pub name: String,
    pub(crate) waypoints: Vec<Waypoint>,
    pub(crate) constraints: Vec<Constraint>,
    pub(crate) generated: Vec<TrajectorySample>,
    pub(crate) generating: bool,
    pub uses_control_interval_guessing: bool,
    pub default_control_interval_count: u32,
}

impl RobotPath {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(PathId::new(), name)
    }

    pub(crate) fn with_id(id: PathId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            waypoints: Vec::new(),
            constraints: Vec::new(),
            generated: Vec::new(),
            generating: false,
            uses_control_interval_guessing: true,
            default_control_interval_count: DEFAULT_CONTROL_INTERVAL_COUNT,
        }
    }

    pub fn id(&self) -> PathId {
        self.id
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn generated(&self) -> &[TrajectorySample] {
        &self.generated
    }

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    pub fn find_waypoint_index(&self, id: WaypointId) -> Option<usize> {
        self.waypoints.iter().position(|w| w.id() == id)
    }

    pub fn waypoint(&self, id: WaypointId) -> Option<&Waypoint> {
        self.waypoints.iter().find(|w| w.id() == id)
    }

    pub fn waypoint_mut(&mut self, id: WaypointId) -> DocumentResult<&mut Waypoint> {
        self.waypoints
            .iter_mut()
            .find(|w| w.id() == id)
            .ok_or(DocumentError::WaypointNotFound(id))
    }

    pub fn constraint(&self, id: ConstraintId) -> Option<&Constraint> {
        self.constraints.iter().find(|c| c.id() == id)
    }

    pub fn constraint_mut(&mut self, id: ConstraintId) -> DocumentResult<&mut Constraint> {
        self.constraints
            .iter_mut()
            .find(|c| c.id() == id)
            .ok_or(DocumentError::ConstraintNotFound(id))
    }

    /// Look up a waypoint by identity or anchor.
    pub fn waypoint_by_ref(&self, reference: &WaypointRef) -> Option<&Waypoint> {
        crate::scope::resolve(reference, &self.waypoints).map(|i| &self.waypoints[i])
    }

    /// Waypoints that are not initial guesses.
    pub fn non_guess_points(&self) -> impl Iterator<Item = &Waypoint> {
        self.waypoints.iter().filter(|w| !w.is_initial_guess)
    }

    /// Waypoints that are neither initial guesses nor empty.
    pub fn non_guess_or_empty_points(&self) -> impl Iterator<Item = &Waypoint> {
        self.waypoints.iter().filter(|w| w.is_real())
    }

    pub fn can_generate(&self) -> bool {
        self.waypoints.len() >= 2 && !self.generating
    }

    pub fn can_export(&self) -> bool {
        self.generated.len() >= 2
    }

    /// Timestamp of the last cached sample, 0 when nothing is cached.
    pub fn total_time_seconds(&self) -> f64 {
        self.generated.last().map_or(0.0, |s| s.timestamp)
    }

    /// The cached trajectory if it is long enough to export.
    pub fn saved_trajectory(&self) -> Option<&[TrajectorySample]> {
        self.can_export().then_some(self.generated.as_slice())
    }

    /// Timestamps of cached samples that land on a waypoint pose.
    pub fn waypoint_timestamps(&self) -> Vec<f64> {
        self.generated
            .iter()
            .filter(|sample| {
                self.waypoints.iter().any(|w| {
                    (w.x - sample.x).abs() < WAYPOINT_MATCH_EPSILON
                        && (w.y - sample.y).abs() < WAYPOINT_MATCH_EPSILON
                        && ((w.heading - sample.heading).abs() < WAYPOINT_MATCH_EPSILON
                            || !w.heading_constrained)
                })
            })
            .map(|sample| sample.timestamp)
            .collect()
    }

    pub fn lowest_selected_waypoint(&self) -> Option<&Waypoint> {
        self.waypoints.iter().find(|w| w.selected)
    }

    /// Append a new waypoint at the origin.
    pub fn add_waypoint(&mut self) -> &mut Waypoint {
        self.push_waypoint(Waypoint::new())
    }

    pub fn push_waypoint(&mut self, waypoint: Waypoint) -> &mut Waypoint {
        self.waypoints.push(waypoint);
        let last = self.waypoints.len() - 1;
        &mut self.waypoints[last]
    }

    /// Remove a waypoint, moving selection to a neighbour.
    ///
    /// Removing the only waypoint clears the cached trajectory. Otherwise the
    /// preceding waypoint is selected, or the following one if there is
    /// none. Returns the newly selected waypoint.
    pub fn delete_waypoint(&mut self, id: WaypointId) -> DocumentResult<Option<WaypointId>> {
        let index = self
            .find_waypoint_index(id)
            .ok_or(DocumentError::WaypointNotFound(id))?;
        self.clear_selection();

        let neighbour = if self.waypoints.len() == 1 {
            self.generated.clear();
            None
        } else if index > 0 {
            Some(index - 1)
        } else {
            Some(index + 1)
        };

        let selected = neighbour.map(|i| {
            self.waypoints[i].selected = true;
            self.waypoints[i].id()
        });
        self.waypoints.remove(index);
        Ok(selected)
    }

    /// Move a waypoint, keeping every other relative order.
    pub fn reorder_waypoints(&mut self, from: usize, to: usize) -> DocumentResult<()> {
        move_item(&mut self.waypoints, from, to)
    }

    pub fn add_constraint(&mut self, constraint: Constraint) -> ConstraintId {
        let id = constraint.id();
        self.constraints.push(constraint);
        id
    }

    /// Remove a constraint with the same neighbour-selection rule as waypoints.
    pub fn delete_constraint(&mut self, id: ConstraintId) -> DocumentResult<Option<ConstraintId>> {
        let index = self
            .constraints
            .iter()
            .position(|c| c.id() == id)
            .ok_or(DocumentError::ConstraintNotFound(id))?;
        self.clear_selection();

        let neighbour = if self.constraints.len() == 1 {
            None
        } else if index > 0 {
            Some(index - 1)
        } else {
            Some(index + 1)
        };

        let selected = neighbour.map(|i| {
            self.constraints[i].selected = true;
            self.constraints[i].id()
        });
        self.constraints.remove(index);
        Ok(selected)
    }

    /// Replace the cached trajectory and leave the generating state.
    pub fn set_trajectory(&mut self, samples: Vec<TrajectorySample>) {
        self.generated = samples;
        self.generating = false;
    }

    pub fn set_generating(&mut self, generating: bool) {
        self.generating = generating;
    }

    pub fn clear_selection(&mut self) {
        for waypoint in &mut self.waypoints {
            waypoint.selected = false;
        }
        for constraint in &mut self.constraints {
            constraint.selected = false;
        }
    }

    pub fn has_selection(&self) -> bool {
        self.waypoints.iter().any(|w| w.selected) || self.constraints.iter().any(|c| c.selected)
    }

    /// Deep copy with fresh identities for the path and everything in it.
    ///
    /// Constraint scopes are remapped onto the copied waypoints; the cached
    /// trajectory is carried over.
    pub fn duplicate(&self, name: impl Into<String>) -> RobotPath {
        let mut copy = self.clone();
        copy.id = PathId::new();
        copy.name = name.into();
        copy.generating = false;

        let mut remap: HashMap<WaypointId, WaypointId> = HashMap::new();
        for waypoint in &mut copy.waypoints {
            let old = waypoint.id();
            waypoint.regenerate_id();
            waypoint.selected = false;
            remap.insert(old, waypoint.id());
        }
        for constraint in &mut copy.constraints {
            constraint.regenerate_id();
            constraint.selected = false;
            for reference in constraint.scope_mut().iter_mut() {
                if let WaypointRef::Waypoint(id) = reference {
                    if let Some(new_id) = remap.get(id) {
                        *id = *new_id;
                    }
                }
            }
        }
        copy
    }

    /// Copy without the history-exempt state (cache, generating, selection).
    pub(crate) fn snapshot(&self) -> RobotPath {
        let mut copy = RobotPath {
            generated: Vec::new(),
            generating: false,
            ..self.clone()
        };
        copy.clear_selection();
        copy
    }

    /// Carry history-exempt state over from the live path being replaced.
    pub(crate) fn adopt_exempt_state(&mut self, live: &RobotPath) {
        self.generated = live.generated.clone();
        self.generating = live.generating;
        for waypoint in &mut self.waypoints {
            waypoint.selected = live.waypoint(waypoint.id()).is_some_and(|w| w.selected);
        }
        for constraint in &mut self.constraints {
            constraint.selected = live
                .constraint(constraint.id())
                .is_some_and(|c| c.selected);
        }
    }
}

pub(crate) fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> DocumentResult<()> {
    let len = items.len();
    for index in [from, to] {
        if index >= len {
            return Err(DocumentError::IndexOutOfRange { index, len });
        }
    }
    let item = items.remove(from);
    items.insert(to, item);
    Ok(())
}
