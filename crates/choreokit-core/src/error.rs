//! Error handling for ChoreoKit
//!
//! Provides error types for the external collaborators the document core
//! talks to:
//! - File system errors (trajectory export, document save/open)
//! - Solver errors (trajectory generation)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// File system bridge error type
///
/// Represents failures reported by the file system bridge when reading or
/// writing documents and trajectory files.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FileSystemError {
    /// The file or directory does not exist
    #[error("File not found: {path}")]
    NotFound {
        /// The path that was not found.
        path: String,
    },

    /// Writing a file failed
    #[error("Failed to write {path}: {reason}")]
    WriteFailed {
        /// The path that could not be written.
        path: String,
        /// The reason the write failed.
        reason: String,
    },

    /// Reading a file failed
    #[error("Failed to read {path}: {reason}")]
    ReadFailed {
        /// The path that could not be read.
        path: String,
        /// The reason the read failed.
        reason: String,
    },

    /// Creating a directory failed
    #[error("Failed to create directory {path}: {reason}")]
    CreateDirFailed {
        /// The directory that could not be created.
        path: String,
        /// The reason the directory could not be created.
        reason: String,
    },

    /// The file name contains characters the bridge cannot represent
    #[error("Invalid file path: {reason}")]
    InvalidPath {
        /// The reason the path is invalid.
        reason: String,
    },
}

/// Solver error type
///
/// The solver is an opaque service; it reports failures as a reason string.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    /// The solver could not find a trajectory
    #[error("{reason}")]
    Failed {
        /// The reason reported by the solver.
        reason: String,
    },

    /// The solver service is not reachable
    #[error("Solver unavailable: {reason}")]
    Unavailable {
        /// Why the solver could not be reached.
        reason: String,
    },
}

impl SolverError {
    /// Create a failure from the solver's reason string
    pub fn failed(reason: impl Into<String>) -> Self {
        SolverError::Failed {
            reason: reason.into(),
        }
    }
}
