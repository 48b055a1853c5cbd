//! External collaborators of the orchestrator.
//!
//! The solver, the file system, and user dialogs are the only places the
//! orchestrator suspends. Each is a trait object so hosts (and tests) can
//! supply their own.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use choreokit_core::{FileSystemError, SolverError};
use choreokit_document::{SolverRequest, TrajectorySample};

/// Numeric trajectory optimizer.
#[async_trait]
pub trait SolverService: Send + Sync {
    /// Solve one path. No timeout is applied by the caller.
    async fn generate(&self, request: SolverRequest) -> Result<Vec<TrajectorySample>, SolverError>;
}

/// File access used for documents and trajectory files.
#[async_trait]
pub trait FileSystem: Send + Sync {
    async fn write_file(&self, dir: &Path, name: &str, contents: &str)
        -> Result<(), FileSystemError>;

    async fn read_file(&self, path: &Path) -> Result<String, FileSystemError>;

    async fn exists(&self, path: &Path) -> bool;

    async fn create_dir(&self, dir: &Path) -> Result<(), FileSystemError>;
}

/// File type offered by a save dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFilter {
    pub name: String,
    pub extensions: Vec<String>,
}

impl FileFilter {
    pub fn new(name: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extensions: vec![extension.into()],
        }
    }
}

/// User prompts.
#[async_trait]
pub trait DialogService: Send + Sync {
    async fn ask_yes_no(&self, prompt: &str) -> bool;

    /// `None` when the user cancels.
    async fn choose_save_location(
        &self,
        title: &str,
        default_path: Option<PathBuf>,
        filters: &[FileFilter],
    ) -> Option<PathBuf>;
}

/// Dialogs for non-interactive hosts: never confirms, always cancels.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadlessDialogs;

#[async_trait]
impl DialogService for HeadlessDialogs {
    async fn ask_yes_no(&self, _prompt: &str) -> bool {
        false
    }

    async fn choose_save_location(
        &self,
        _title: &str,
        _default_path: Option<PathBuf>,
        _filters: &[FileFilter],
    ) -> Option<PathBuf> {
        None
    }
}

/// Solver for hosts without an optimizer attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableSolver;

#[async_trait]
impl SolverService for UnavailableSolver {
    async fn generate(
        &self,
        _request: SolverRequest,
    ) -> Result<Vec<TrajectorySample>, SolverError> {
        Err(SolverError::Unavailable {
            reason: "no solver is attached".to_string(),
        })
    }
}
