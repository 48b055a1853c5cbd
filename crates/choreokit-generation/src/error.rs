//! Error types for orchestration operations.
//!
//! `Display` of every variant is the message shown to the user; no
//! orchestration operation fails in any other way.

use choreokit_core::{FileSystemError, PathId};
use choreokit_document::DocumentError;
use thiserror::Error;

/// Failure to generate a trajectory.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Path not found: {0}")]
    PathNotFound(PathId),

    /// Fewer than two waypoints.
    #[error("Path '{name}' needs at least 2 waypoints to generate")]
    NotEnoughWaypoints { name: String },

    /// Planner validation or another document-level rejection.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// The solver reported a failure.
    #[error("{0}")]
    Solver(String),

    /// Generation succeeded but the follow-up export did not.
    #[error("Couldn't export trajectory: {0}")]
    Export(#[from] ExportError),
}

/// Failure to export a trajectory file.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Path not found: {0}")]
    PathNotFound(PathId),

    #[error("Project has not been saved yet")]
    NotSaved,

    #[error("Failed to serialize trajectory: {0}")]
    Serialize(String),

    #[error(transparent)]
    FileSystem(#[from] FileSystemError),

    /// Some exports of a batch failed; each entry is `(path name, reason)`.
    #[error("Failed to export {}", describe_failures(.failures))]
    Batch { failures: Vec<(String, String)> },
}

/// Failure to save or open a document.
#[derive(Error, Debug)]
pub enum SaveError {
    #[error("Project has not been saved yet")]
    NotSaved,

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    FileSystem(#[from] FileSystemError),

    #[error("'{0}' is not a valid document location")]
    InvalidLocation(String),
}

fn describe_failures(failures: &[(String, String)]) -> String {
    failures
        .iter()
        .map(|(name, reason)| format!("{name}: {reason}"))
        .collect::<Vec<_>>()
        .join("; ")
}

pub type GenerationResult<T> = Result<T, GenerationError>;
pub type ExportResult<T> = Result<T, ExportError>;
pub type SaveResult<T> = Result<T, SaveError>;
