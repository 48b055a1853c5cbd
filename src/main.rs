//! Headless ChoreoKit front end.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use choreokit::{init_logging, Config, DocumentManager, StdFileSystem, VERSION};
use choreokit_generation::{HeadlessDialogs, UnavailableSolver};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "choreokit")]
#[command(about = "Inspect, plan, and export robot path documents")]
#[command(version = VERSION)]
struct Cli {
    /// Configuration file (JSON or TOML); defaults to the user config dir
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level, overridden by RUST_LOG
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the paths of a document
    Info {
        /// Document file (.chor)
        file: PathBuf,
    },

    /// Assign control intervals to every path and save the document
    Plan {
        /// Document file (.chor)
        file: PathBuf,
    },

    /// Write every cached trajectory to the project trajectory directory
    Export {
        /// Document file (.chor)
        file: PathBuf,
    },
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(Config::load_or_default()?),
    }
}

async fn open(config: Config, file: &Path) -> anyhow::Result<DocumentManager> {
    let manager = DocumentManager::new(
        config,
        Arc::new(UnavailableSolver),
        Arc::new(StdFileSystem),
        Arc::new(HeadlessDialogs),
    );
    manager
        .open_file(file)
        .await
        .with_context(|| format!("Failed to open {}", file.display()))?;
    Ok(manager)
}

fn print_info(manager: &DocumentManager) {
    let doc = manager.document().read();
    for path in doc.path_list().iter() {
        println!(
            "{}: {} waypoints, {} constraints, {}",
            path.name,
            path.waypoints().len(),
            path.constraints().len(),
            if path.can_export() {
                format!("{:.2} s", path.total_time_seconds())
            } else {
                "not generated".to_string()
            }
        );
    }
}

async fn plan(manager: &DocumentManager) -> anyhow::Result<()> {
    let ids: Vec<_> = manager
        .document()
        .read()
        .path_list()
        .iter()
        .map(|p| p.id())
        .collect();
    {
        let mut doc = manager.document().write();
        for id in ids {
            if let Err(err) = doc.plan_control_intervals(id) {
                let name = doc.path(id).map(|p| p.name.clone()).unwrap_or_default();
                warn!(path = %name, "Planning failed: {}", err);
            }
        }
    }
    if !manager.save_file().await? {
        bail!("Document was not saved");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    init_logging(&level)?;

    match cli.command {
        Commands::Info { file } => {
            let manager = open(config, &file).await?;
            print_info(&manager);
        }
        Commands::Plan { file } => {
            let manager = open(config, &file).await?;
            plan(&manager).await?;
            info!(file = %file.display(), "Planned control intervals");
        }
        Commands::Export { file } => {
            let manager = open(config, &file).await?;
            let exported = manager.export_all_trajectories().await.into_result()?;
            info!(count = exported.len(), "Exported trajectories");
        }
    }

    Ok(())
}
