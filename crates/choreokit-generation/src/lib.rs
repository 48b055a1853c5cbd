//! # ChoreoKit Generation
//!
//! Drives trajectory generation and export for a [`choreokit_document::Document`]:
//! - [`DocumentManager`] runs the generate / export / save protocol
//! - [`SolverService`], [`FileSystem`] and [`DialogService`] are the
//!   external collaborators it suspends on
//! - [`StdFileSystem`] is the local-disk file system

pub mod error;
pub mod fs;
pub mod manager;
pub mod services;

pub use error::{
    ExportError, ExportResult, GenerationError, GenerationResult, SaveError, SaveResult,
};
pub use fs::StdFileSystem;
pub use manager::{
    BatchExportReport, DocumentManager, GenerateOutcome, ProjectLocation, WriteOutcome,
};
pub use services::{
    DialogService, FileFilter, FileSystem, HeadlessDialogs, SolverService, UnavailableSolver,
};
