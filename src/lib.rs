//! # ChoreoKit
//!
//! Path planning documents for holonomic robots:
//! - Paths of waypoints and scoped constraints with undo/redo
//! - Control-interval planning ahead of trajectory optimization
//! - Trajectory generation, export, and versioned save files
//!
//! ## Architecture
//!
//! ChoreoKit is organized as a workspace with multiple crates:
//!
//! 1. **choreokit-core** - Identities, bridge errors, document events
//! 2. **choreokit-document** - Document model, history, planner, file format
//! 3. **choreokit-settings** - Application configuration
//! 4. **choreokit-generation** - Generation, export, and save orchestration
//! 5. **choreokit** - Headless command-line front end

pub use choreokit_core::{AppEvent, EventBus, PathId, WaypointId};
pub use choreokit_document::{Document, DocumentError, RobotConfig, RobotPath};
pub use choreokit_generation::{
    BatchExportReport, DocumentManager, GenerateOutcome, StdFileSystem, WriteOutcome,
};
pub use choreokit_settings::Config;

/// Crate version, for `--version` output.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize tracing with `level` as the default directive.
///
/// `RUST_LOG`, when set, takes precedence.
pub fn init_logging(level: &str) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
