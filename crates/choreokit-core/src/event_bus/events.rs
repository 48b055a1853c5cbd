//! Event types carried by the event bus.

use crate::ids::PathId;

/// Category used for filtering subscriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventCategory {
    /// Whole-document lifecycle (new, open, save)
    Document,
    /// Path collection and per-path edits
    Path,
    /// Command history cursor movement
    History,
    /// Trajectory generation
    Generation,
    /// Trajectory export
    Export,
}

/// Whole-document lifecycle events
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentEvent {
    /// A fresh document replaced the current one
    Created,
    /// A saved document replaced the current one
    Opened,
    /// The document was written to disk
    Saved {
        /// Directory the document was written to.
        dir: String,
        /// File name of the document.
        name: String,
    },
}

/// Path collection events
#[derive(Debug, Clone, PartialEq)]
pub enum PathEvent {
    /// A path was added
    Added { path: PathId },
    /// A path was removed
    Removed { path: PathId },
    /// Waypoints, constraints, or settings of a path changed
    Changed { path: PathId },
    /// A path was renamed
    Renamed { path: PathId, name: String },
    /// The active path changed
    ActiveChanged { path: PathId },
}

/// Command history events; each carries the cursor after the change
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryEvent {
    /// A user edit was recorded
    Recorded { undo_idx: usize },
    /// The cursor moved back
    Undone { undo_idx: usize },
    /// The cursor moved forward
    Redone { undo_idx: usize },
    /// The log was reset to a single baseline
    Cleared,
}

/// Trajectory generation events
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationEvent {
    /// The solver was invoked for a path
    Started { path: PathId },
    /// The solver returned samples
    Finished { path: PathId, samples: usize },
    /// Planning or solving failed
    Failed { path: PathId, reason: String },
}

/// Trajectory export events
#[derive(Debug, Clone, PartialEq)]
pub enum ExportEvent {
    /// A trajectory file was written
    Written { path: PathId, file: String },
    /// A trajectory file could not be written
    Failed { path: PathId, reason: String },
}

/// Top-level event published on the bus
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    Document(DocumentEvent),
    Path(PathEvent),
    History(HistoryEvent),
    Generation(GenerationEvent),
    Export(ExportEvent),
}

impl AppEvent {
    /// Category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            AppEvent::Document(_) => EventCategory::Document,
            AppEvent::Path(_) => EventCategory::Path,
            AppEvent::History(_) => EventCategory::History,
            AppEvent::Generation(_) => EventCategory::Generation,
            AppEvent::Export(_) => EventCategory::Export,
        }
    }
}

impl std::fmt::Display for AppEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppEvent::Document(DocumentEvent::Created) => write!(f, "Document created"),
            AppEvent::Document(DocumentEvent::Opened) => write!(f, "Document opened"),
            AppEvent::Document(DocumentEvent::Saved { dir, name }) => {
                write!(f, "Document saved to {}/{}", dir, name)
            }
            AppEvent::Path(event) => write!(f, "Path: {:?}", event),
            AppEvent::History(event) => write!(f, "History: {:?}", event),
            AppEvent::Generation(GenerationEvent::Started { path }) => {
                write!(f, "Generating {}", path)
            }
            AppEvent::Generation(GenerationEvent::Finished { path, samples }) => {
                write!(f, "Generated {} ({} samples)", path, samples)
            }
            AppEvent::Generation(GenerationEvent::Failed { path, reason }) => {
                write!(f, "Generation of {} failed: {}", path, reason)
            }
            AppEvent::Export(ExportEvent::Written { file, .. }) => write!(f, "Exported {}", file),
            AppEvent::Export(ExportEvent::Failed { path, reason }) => {
                write!(f, "Export of {} failed: {}", path, reason)
            }
        }
    }
}
