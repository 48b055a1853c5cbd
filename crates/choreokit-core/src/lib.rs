//! # ChoreoKit Core
//!
//! Core types shared by every ChoreoKit crate:
//! - Stable identities for paths, waypoints, and constraints
//! - Error types for the external bridges (file system, solver)
//! - The document event bus used to notify observers of mutations

pub mod error;
pub mod event_bus;
pub mod ids;

pub use error::{FileSystemError, SolverError};

pub use event_bus::{
    AppEvent, DocumentEvent, EventBus, EventCategory, EventFilter, ExportEvent, GenerationEvent,
    HistoryEvent, PathEvent, SubscriptionId,
};

pub use ids::{ConstraintId, PathId, WaypointId};
