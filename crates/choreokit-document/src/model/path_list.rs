//! Ordered collection of paths with an active selection.

use choreokit_core::PathId;

use super::path::{move_item, RobotPath};
use crate::error::{DocumentError, DocumentResult};

pub const DEFAULT_PATH_NAME: &str = "NewPath";

/// Paths in display order plus the active path.
///
/// Always holds at least one path, and `active` always names a member.
#[derive(Debug, Clone, PartialEq)]
pub struct PathList {
    pub(crate) paths: Vec<RobotPath>,
    pub(crate) active: PathId,
}

impl PathList {
    /// A list holding a single default path, which is active.
    pub fn new() -> Self {
        let path = RobotPath::new(DEFAULT_PATH_NAME);
        let active = path.id();
        Self {
            paths: vec![path],
            active,
        }
    }

    /// Build from already-constructed paths; `None` when `paths` is empty.
    pub fn from_paths(paths: Vec<RobotPath>) -> Option<Self> {
        let active = paths.first()?.id();
        Some(Self { paths, active })
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RobotPath> {
        self.paths.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut RobotPath> {
        self.paths.iter_mut()
    }

    pub fn get(&self, id: PathId) -> Option<&RobotPath> {
        self.paths.iter().find(|p| p.id() == id)
    }

    pub fn get_mut(&mut self, id: PathId) -> Option<&mut RobotPath> {
        self.paths.iter_mut().find(|p| p.id() == id)
    }

    pub fn require(&self, id: PathId) -> DocumentResult<&RobotPath> {
        self.get(id).ok_or(DocumentError::PathNotFound(id))
    }

    pub fn require_mut(&mut self, id: PathId) -> DocumentResult<&mut RobotPath> {
        self.get_mut(id).ok_or(DocumentError::PathNotFound(id))
    }

    pub fn find_by_name(&self, name: &str) -> Option<&RobotPath> {
        self.paths.iter().find(|p| p.name == name)
    }

    pub fn path_names(&self) -> Vec<String> {
        self.paths.iter().map(|p| p.name.clone()).collect()
    }

    pub fn path_ids(&self) -> Vec<PathId> {
        self.paths.iter().map(|p| p.id()).collect()
    }

    pub fn active_id(&self) -> PathId {
        self.active
    }

    pub fn active(&self) -> &RobotPath {
        // `active` always names a member; fall back to the first path anyway.
        self.get(self.active).unwrap_or(&self.paths[0])
    }

    pub fn active_mut(&mut self) -> &mut RobotPath {
        let index = self
            .paths
            .iter()
            .position(|p| p.id() == self.active)
            .unwrap_or(0);
        &mut self.paths[index]
    }

    pub fn set_active(&mut self, id: PathId) -> DocumentResult<()> {
        self.require(id)?;
        self.active = id;
        Ok(())
    }

    /// `base` if free, otherwise `base` with the smallest free integer suffix.
    pub fn unique_name(&self, base: &str) -> String {
        if self.find_by_name(base).is_none() {
            return base.to_string();
        }
        (1..)
            .map(|n| format!("{base}{n}"))
            .find(|candidate| self.find_by_name(candidate).is_none())
            .unwrap_or_else(|| base.to_string())
    }

    /// Append a path (name made unique), optionally making it active.
    pub fn add_path(&mut self, name: &str, select: bool) -> PathId {
        let path = RobotPath::new(self.unique_name(name));
        self.insert(path, select)
    }

    pub(crate) fn insert(&mut self, path: RobotPath, select: bool) -> PathId {
        let id = path.id();
        self.paths.push(path);
        if select {
            self.active = id;
        }
        id
    }

    /// Remove a path, keeping at least one path and a valid active path.
    pub fn delete_path(&mut self, id: PathId) -> DocumentResult<RobotPath> {
        let index = self
            .paths
            .iter()
            .position(|p| p.id() == id)
            .ok_or(DocumentError::PathNotFound(id))?;

        if self.paths.len() == 1 {
            let name = self.unique_name(DEFAULT_PATH_NAME);
            self.insert(RobotPath::new(name), false);
        }
        let removed = self.paths.remove(index);
        if self.active == id {
            self.active = self.paths[0].id();
        }
        Ok(removed)
    }

    pub fn rename_path(&mut self, id: PathId, name: &str) -> DocumentResult<()> {
        if self.paths.iter().any(|p| p.id() != id && p.name == name) {
            return Err(DocumentError::DuplicatePathName(name.to_string()));
        }
        self.require_mut(id)?.name = name.to_string();
        Ok(())
    }

    /// Insert a deep copy right after the original; returns the new id.
    pub fn duplicate_path(&mut self, id: PathId) -> DocumentResult<PathId> {
        let index = self
            .paths
            .iter()
            .position(|p| p.id() == id)
            .ok_or(DocumentError::PathNotFound(id))?;
        let name = self.unique_name(&self.paths[index].name);
        let copy = self.paths[index].duplicate(name);
        let new_id = copy.id();
        self.paths.insert(index + 1, copy);
        Ok(new_id)
    }

    pub fn reorder_paths(&mut self, from: usize, to: usize) -> DocumentResult<()> {
        move_item(&mut self.paths, from, to)
    }
}

impl Default for PathList {
    fn default() -> Self {
        Self::new()
    }
}
