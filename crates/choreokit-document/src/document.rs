//! The document: robot configuration, paths, and their edit history.
//!
//! Every user edit goes through [`Document::edit`], which records a snapshot
//! in the command history and publishes events. Solver-driven and
//! planner-driven changes (generation results, the `generating` flag,
//! interval counts) and selection changes are applied without recording.
//!
//! A path removed by an edit, undo, or redo keeps its unrecorded state in a
//! side table, so restoring it brings back its cached trajectory and any
//! in-flight generation guard.

use std::collections::HashMap;
use std::sync::Arc;

use choreokit_core::{
    AppEvent, ConstraintId, DocumentEvent, EventBus, HistoryEvent, PathEvent, PathId, WaypointId,
};
use tracing::{debug, info};

use crate::error::{DocumentError, DocumentResult};
use crate::history::{CommandHistory, DEFAULT_MAX_DEPTH};
use crate::model::{
    Constraint, PathList, RobotConfig, RobotPath, TrajectorySample, Waypoint,
    DEFAULT_CONTROL_INTERVAL_COUNT, DEFAULT_PATH_NAME,
};
use crate::planner;
use crate::serialization::{SavedDocument, SavedPath};

/// Everything the command history tracks.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DocumentState {
    pub robot_config: RobotConfig,
    pub path_list: PathList,
}

impl DocumentState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy without history-exempt data.
    pub(crate) fn snapshot(&self) -> DocumentState {
        DocumentState {
            robot_config: self.robot_config.clone(),
            path_list: PathList {
                paths: self.path_list.iter().map(RobotPath::snapshot).collect(),
                active: self.path_list.active,
            },
        }
    }

    /// Build the state to install when replaying `snapshot` over `self`.
    ///
    /// Exempt data comes from the live path, or from `detached` for a path
    /// that is not live. The active path is kept when it still exists.
    fn replay(
        &self,
        snapshot: &DocumentState,
        detached: &HashMap<PathId, RobotPath>,
    ) -> DocumentState {
        let mut next = snapshot.clone();
        for path in next.path_list.iter_mut() {
            let id = path.id();
            if let Some(source) = self.path_list.get(id).or_else(|| detached.get(&id)) {
                path.adopt_exempt_state(source);
            }
        }
        let live_active = self.path_list.active;
        next.path_list.active = if next.path_list.get(live_active).is_some() {
            live_active
        } else {
            next.path_list.paths[0].id()
        };
        next
    }
}

/// Path description captured for one solver call.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverRequest {
    pub path_id: PathId,
    pub path: SavedPath,
    pub robot_config: RobotConfig,
}

/// Name and planner settings given to newly created paths.
#[derive(Debug, Clone, PartialEq)]
pub struct PathDefaults {
    pub name: String,
    pub uses_control_interval_guessing: bool,
    pub default_control_interval_count: u32,
}

impl Default for PathDefaults {
    fn default() -> Self {
        Self {
            name: DEFAULT_PATH_NAME.to_string(),
            uses_control_interval_guessing: true,
            default_control_interval_count: DEFAULT_CONTROL_INTERVAL_COUNT,
        }
    }
}

impl PathDefaults {
    fn apply(&self, path: &mut RobotPath) {
        path.uses_control_interval_guessing = self.uses_control_interval_guessing;
        path.default_control_interval_count = self.default_control_interval_count;
    }
}

/// Live document with undo/redo.
pub struct Document {
    state: DocumentState,
    history: CommandHistory<DocumentState>,
    bus: Arc<EventBus>,
    path_defaults: PathDefaults,
    /// Removed paths whose exempt state undo or redo may need again.
    detached: HashMap<PathId, RobotPath>,
}

impl Document {
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self::with_history_depth(bus, DEFAULT_MAX_DEPTH)
    }

    pub fn with_history_depth(bus: Arc<EventBus>, max_depth: usize) -> Self {
        let state = DocumentState::new();
        let history = CommandHistory::with_max_depth(state.snapshot(), max_depth);
        Self {
            state,
            history,
            bus,
            path_defaults: PathDefaults::default(),
            detached: HashMap::new(),
        }
    }

    /// Settings for paths created from now on, including the initial path
    /// of the next fresh document.
    pub fn set_path_defaults(&mut self, defaults: PathDefaults) {
        self.path_defaults = defaults;
    }

    pub fn path_defaults(&self) -> &PathDefaults {
        &self.path_defaults
    }

    pub fn state(&self) -> &DocumentState {
        &self.state
    }

    pub fn robot_config(&self) -> &RobotConfig {
        &self.state.robot_config
    }

    pub fn path_list(&self) -> &PathList {
        &self.state.path_list
    }

    pub fn path(&self, id: PathId) -> Option<&RobotPath> {
        self.state.path_list.get(id)
    }

    pub fn active_path(&self) -> &RobotPath {
        self.state.path_list.active()
    }

    pub fn history(&self) -> &CommandHistory<DocumentState> {
        &self.history
    }

    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Apply a user edit and record it.
    ///
    /// If `f` fails the state is rolled back and nothing is recorded.
    pub fn edit<R>(
        &mut self,
        description: &str,
        f: impl FnOnce(&mut DocumentState) -> DocumentResult<R>,
    ) -> DocumentResult<R> {
        let before = self.state.clone();
        match f(&mut self.state) {
            Ok(result) => {
                self.detach_removed(before);
                if self.history.record(description, self.state.snapshot()) {
                    debug!(description, undo_idx = self.history.undo_idx(), "Edit recorded");
                    self.bus.emit(AppEvent::History(HistoryEvent::Recorded {
                        undo_idx: self.history.undo_idx(),
                    }));
                }
                Ok(result)
            }
            Err(err) => {
                self.state = before;
                Err(err)
            }
        }
    }

    /// Run `f` with history recording disabled; nested edits are applied but
    /// not recorded.
    pub fn without_undo<R>(&mut self, f: impl FnOnce(&mut Document) -> R) -> R {
        self.history.suppress();
        let result = f(self);
        self.history.resume();
        result
    }

    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo() else {
            return false;
        };
        let next = self.state.replay(snapshot, &self.detached);
        let previous = std::mem::replace(&mut self.state, next);
        self.detach_removed(previous);
        self.bus.emit(AppEvent::History(HistoryEvent::Undone {
            undo_idx: self.history.undo_idx(),
        }));
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo() else {
            return false;
        };
        let next = self.state.replay(snapshot, &self.detached);
        let previous = std::mem::replace(&mut self.state, next);
        self.detach_removed(previous);
        self.bus.emit(AppEvent::History(HistoryEvent::Redone {
            undo_idx: self.history.undo_idx(),
        }));
        true
    }

    /// Replace the whole document with a fresh one.
    pub fn new_document(&mut self) {
        let mut state = DocumentState::new();
        let first = state.path_list.active_mut();
        first.name = self.path_defaults.name.clone();
        self.path_defaults.apply(first);
        self.replace(state);
        info!("New document");
        self.bus.emit(AppEvent::Document(DocumentEvent::Created));
    }

    /// Replace the whole document from a saved form.
    ///
    /// Fails without touching the current document if `saved` is invalid.
    pub fn load_saved(&mut self, saved: &SavedDocument) -> DocumentResult<()> {
        let state = saved.to_state()?;
        self.replace(state);
        info!(paths = self.state.path_list.len(), "Document opened");
        self.bus.emit(AppEvent::Document(DocumentEvent::Opened));
        Ok(())
    }

    /// Parse saved JSON and replace the document with it.
    pub fn load_json(&mut self, contents: &str) -> DocumentResult<()> {
        let saved = SavedDocument::parse(contents)?;
        self.load_saved(&saved)
    }

    pub fn to_saved(&self) -> SavedDocument {
        SavedDocument::from_state(&self.state)
    }

    /// Remember exempt state of paths in `previous` that are no longer live,
    /// and forget entries for paths that are live again.
    fn detach_removed(&mut self, previous: DocumentState) {
        for path in previous.path_list.paths {
            if self.state.path_list.get(path.id()).is_none()
                && (path.is_generating() || !path.generated().is_empty())
            {
                self.detached.insert(path.id(), path);
            }
        }
        let live = &self.state.path_list;
        self.detached.retain(|id, _| live.get(*id).is_none());
    }

    fn replace(&mut self, state: DocumentState) {
        self.history.clear(state.snapshot());
        self.detached.clear();
        self.state = state;
        self.bus.emit(AppEvent::History(HistoryEvent::Cleared));
    }

    pub fn set_robot_config(&mut self, config: RobotConfig) -> DocumentResult<()> {
        self.edit("Update robot configuration", |state| {
            state.robot_config = config;
            Ok(())
        })
    }

    pub fn add_path(&mut self, name: Option<&str>, select: bool) -> DocumentResult<PathId> {
        let defaults = self.path_defaults.clone();
        let name = name.unwrap_or(defaults.name.as_str());
        let id = self.edit("Add path", |state| {
            let id = state.path_list.add_path(name, select);
            defaults.apply(state.path_list.require_mut(id)?);
            Ok(id)
        })?;
        self.bus.emit(AppEvent::Path(PathEvent::Added { path: id }));
        if select {
            self.bus
                .emit(AppEvent::Path(PathEvent::ActiveChanged { path: id }));
        }
        Ok(id)
    }

    pub fn delete_path(&mut self, id: PathId) -> DocumentResult<()> {
        let was_active = self.state.path_list.active_id() == id;
        self.edit("Delete path", |state| state.path_list.delete_path(id).map(|_| ()))?;
        self.bus.emit(AppEvent::Path(PathEvent::Removed { path: id }));
        if was_active {
            self.bus.emit(AppEvent::Path(PathEvent::ActiveChanged {
                path: self.state.path_list.active_id(),
            }));
        }
        Ok(())
    }

    pub fn rename_path(&mut self, id: PathId, name: &str) -> DocumentResult<()> {
        self.edit("Rename path", |state| state.path_list.rename_path(id, name))?;
        self.bus.emit(AppEvent::Path(PathEvent::Renamed {
            path: id,
            name: name.to_string(),
        }));
        Ok(())
    }

    pub fn duplicate_path(&mut self, id: PathId) -> DocumentResult<PathId> {
        let copy = self.edit("Duplicate path", |state| state.path_list.duplicate_path(id))?;
        self.bus.emit(AppEvent::Path(PathEvent::Added { path: copy }));
        Ok(copy)
    }

    pub fn reorder_paths(&mut self, from: usize, to: usize) -> DocumentResult<()> {
        self.edit("Reorder paths", |state| state.path_list.reorder_paths(from, to))
    }

    /// Change the active path; not an undoable edit.
    pub fn set_active_path(&mut self, id: PathId) -> DocumentResult<()> {
        self.state.path_list.set_active(id)?;
        self.bus
            .emit(AppEvent::Path(PathEvent::ActiveChanged { path: id }));
        Ok(())
    }

    /// Apply an edit to one path and publish `PathEvent::Changed`.
    pub fn edit_path<R>(
        &mut self,
        id: PathId,
        description: &str,
        f: impl FnOnce(&mut RobotPath) -> DocumentResult<R>,
    ) -> DocumentResult<R> {
        let result = self.edit(description, |state| f(state.path_list.require_mut(id)?))?;
        self.bus.emit(AppEvent::Path(PathEvent::Changed { path: id }));
        Ok(result)
    }

    /// Append a waypoint; the first waypoint of a path becomes selected.
    pub fn add_waypoint(&mut self, path: PathId) -> DocumentResult<WaypointId> {
        self.insert_waypoint(path, Waypoint::new())
    }

    pub fn insert_waypoint(
        &mut self,
        path: PathId,
        waypoint: Waypoint,
    ) -> DocumentResult<WaypointId> {
        let id = self.edit_path(path, "Add waypoint", |p| Ok(p.push_waypoint(waypoint).id()))?;
        if self.path(path).is_some_and(|p| p.waypoints().len() == 1) {
            self.select_waypoint(path, id)?;
        }
        Ok(id)
    }

    pub fn update_waypoint(
        &mut self,
        path: PathId,
        id: WaypointId,
        f: impl FnOnce(&mut Waypoint),
    ) -> DocumentResult<()> {
        self.edit_path(path, "Edit waypoint", |p| {
            f(p.waypoint_mut(id)?);
            Ok(())
        })
    }

    /// Delete a waypoint; selection moves to a neighbour in the same path.
    pub fn delete_waypoint(
        &mut self,
        path: PathId,
        id: WaypointId,
    ) -> DocumentResult<Option<WaypointId>> {
        self.state
            .path_list
            .require(path)?
            .waypoint(id)
            .ok_or(DocumentError::WaypointNotFound(id))?;
        self.clear_selection();
        self.edit_path(path, "Delete waypoint", |p| p.delete_waypoint(id))
    }

    pub fn reorder_waypoints(
        &mut self,
        path: PathId,
        from: usize,
        to: usize,
    ) -> DocumentResult<()> {
        self.edit_path(path, "Reorder waypoints", |p| p.reorder_waypoints(from, to))
    }

    pub fn add_constraint(
        &mut self,
        path: PathId,
        constraint: Constraint,
    ) -> DocumentResult<ConstraintId> {
        self.edit_path(path, "Add constraint", |p| Ok(p.add_constraint(constraint)))
    }

    pub fn update_constraint(
        &mut self,
        path: PathId,
        id: ConstraintId,
        f: impl FnOnce(&mut Constraint) -> DocumentResult<()>,
    ) -> DocumentResult<()> {
        self.edit_path(path, "Edit constraint", |p| f(p.constraint_mut(id)?))
    }

    pub fn delete_constraint(
        &mut self,
        path: PathId,
        id: ConstraintId,
    ) -> DocumentResult<Option<ConstraintId>> {
        self.state
            .path_list
            .require(path)?
            .constraint(id)
            .ok_or(DocumentError::ConstraintNotFound(id))?;
        self.clear_selection();
        self.edit_path(path, "Delete constraint", |p| p.delete_constraint(id))
    }

    pub fn set_planner_settings(
        &mut self,
        path: PathId,
        uses_control_interval_guessing: bool,
        default_control_interval_count: u32,
    ) -> DocumentResult<()> {
        if default_control_interval_count == 0 {
            return Err(DocumentError::InvalidFormat(
                "default control interval count must be positive".to_string(),
            ));
        }
        self.edit_path(path, "Change planner settings", |p| {
            p.uses_control_interval_guessing = uses_control_interval_guessing;
            p.default_control_interval_count = default_control_interval_count;
            Ok(())
        })
    }

    pub fn select_waypoint(&mut self, path: PathId, id: WaypointId) -> DocumentResult<()> {
        self.state
            .path_list
            .require(path)?
            .waypoint(id)
            .ok_or(DocumentError::WaypointNotFound(id))?;
        self.clear_selection();
        self.state.path_list.require_mut(path)?.waypoint_mut(id)?.selected = true;
        Ok(())
    }

    pub fn select_constraint(&mut self, path: PathId, id: ConstraintId) -> DocumentResult<()> {
        self.state
            .path_list
            .require(path)?
            .constraint(id)
            .ok_or(DocumentError::ConstraintNotFound(id))?;
        self.clear_selection();
        self.state.path_list.require_mut(path)?.constraint_mut(id)?.selected = true;
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        for path in self.state.path_list.iter_mut() {
            path.clear_selection();
        }
    }

    /// Toggle the generation guard of a path. Returns `false` if the path is
    /// not live; a removed path still has the flag updated for a later undo.
    pub fn set_generating(&mut self, path: PathId, generating: bool) -> bool {
        if let Some(p) = self.state.path_list.get_mut(path) {
            p.set_generating(generating);
            return true;
        }
        if let Some(p) = self.detached.get_mut(&path) {
            p.set_generating(generating);
        }
        false
    }

    /// Store solver output on a path. Returns `false` if the path is not
    /// live; a removed path keeps the result for a later undo.
    pub fn set_trajectory(&mut self, path: PathId, samples: Vec<TrajectorySample>) -> bool {
        if let Some(p) = self.state.path_list.get_mut(path) {
            p.set_trajectory(samples);
            return true;
        }
        if let Some(p) = self.detached.get_mut(&path) {
            p.set_trajectory(samples);
        }
        false
    }

    /// Stamp control-interval counts onto a path's waypoints.
    pub fn plan_control_intervals(&mut self, path: PathId) -> DocumentResult<()> {
        let config = self.state.robot_config.clone();
        self.without_undo(|doc| {
            let target = doc.state.path_list.require_mut(path)?;
            planner::apply(target, &config)?;
            Ok(())
        })
    }

    /// Capture what the solver needs for `path` at this moment.
    pub fn solver_request(&self, path: PathId) -> DocumentResult<SolverRequest> {
        let target = self.state.path_list.require(path)?;
        Ok(SolverRequest {
            path_id: path,
            path: target.as_solver_path(),
            robot_config: self.state.robot_config.clone(),
        })
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("paths", &self.state.path_list.len())
            .field("undo_idx", &self.history.undo_idx())
            .finish()
    }
}
