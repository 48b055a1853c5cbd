//! Document manager: generation, export, and project persistence.
//!
//! The manager owns the live document behind a lock that is never held
//! across an `.await`. Each generation captures the solver request while
//! holding the lock, releases it for the solver call, and looks the path up
//! again by identity to store the result. Paths deleted in the meantime are
//! simply not updated.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use choreokit_core::{AppEvent, DocumentEvent, EventBus, ExportEvent, GenerationEvent, PathId};
use choreokit_document::{
    Document, DocumentResult, PathDefaults, TrajectoryFile, TrajectorySample,
};
use choreokit_settings::Config;
use futures::future::join_all;
use parking_lot::RwLock;
use tracing::{debug, error, info, warn};

use crate::error::{
    ExportError, ExportResult, GenerationError, GenerationResult, SaveError, SaveResult,
};
use crate::services::{DialogService, FileFilter, FileSystem, SolverService};

const BUILD_GRADLE: &str = "build.gradle";

/// Where the document was last saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLocation {
    pub dir: PathBuf,
    pub name: String,
}

impl ProjectLocation {
    pub fn new(dir: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            name: name.into(),
        }
    }

    /// Split a full file path into directory and file name.
    pub fn from_file(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?.to_string();
        let dir = path.parent()?.to_path_buf();
        Some(Self { dir, name })
    }

    pub fn file_path(&self) -> PathBuf {
        self.dir.join(&self.name)
    }
}

#[derive(Debug, Default)]
struct ProjectState {
    location: Option<ProjectLocation>,
    is_gradle_project: bool,
}

/// Result of a generation request that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerateOutcome {
    /// Samples were stored on the path.
    Generated { samples: usize },
    /// The path was already generating; nothing was started.
    AlreadyGenerating,
    /// The solver finished after the path was deleted.
    PathRemoved,
}

/// Result of a single trajectory write that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Written(PathBuf),
    /// Fewer than two cached samples.
    NothingToExport,
    /// The user dismissed the save dialog.
    Cancelled,
}

/// Per-path results of exporting every trajectory.
#[derive(Debug, Default)]
pub struct BatchExportReport {
    pub exported: Vec<String>,
    pub skipped: Vec<String>,
    pub failed: Vec<(String, ExportError)>,
}

impl BatchExportReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Collapse failures into one error naming each failing path.
    pub fn into_result(self) -> ExportResult<Vec<String>> {
        if self.failed.is_empty() {
            Ok(self.exported)
        } else {
            Err(ExportError::Batch {
                failures: self
                    .failed
                    .into_iter()
                    .map(|(name, err)| (name, err.to_string()))
                    .collect(),
            })
        }
    }
}

/// Orchestrates the document against the solver, the file system, and the user.
pub struct DocumentManager {
    document: Arc<RwLock<Document>>,
    bus: Arc<EventBus>,
    config: Config,
    solver: Arc<dyn SolverService>,
    fs: Arc<dyn FileSystem>,
    dialogs: Arc<dyn DialogService>,
    project: RwLock<ProjectState>,
}

impl DocumentManager {
    pub fn new(
        config: Config,
        solver: Arc<dyn SolverService>,
        fs: Arc<dyn FileSystem>,
        dialogs: Arc<dyn DialogService>,
    ) -> Self {
        let bus = Arc::new(EventBus::new());
        let mut document = Document::with_history_depth(bus.clone(), config.history.max_depth);
        document.set_path_defaults(PathDefaults {
            name: config.project.default_path_name.clone(),
            uses_control_interval_guessing: config.planner.uses_control_interval_guessing,
            default_control_interval_count: config.planner.default_control_interval_count,
        });
        document.new_document();

        Self {
            document: Arc::new(RwLock::new(document)),
            bus,
            config,
            solver,
            fs,
            dialogs,
            project: RwLock::new(ProjectState::default()),
        }
    }

    pub fn document(&self) -> &Arc<RwLock<Document>> {
        &self.document
    }

    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn save_location(&self) -> Option<ProjectLocation> {
        self.project.read().location.clone()
    }

    pub fn is_gradle_project(&self) -> bool {
        self.project.read().is_gradle_project
    }

    /// Replace the document with a fresh one and forget the save location.
    pub fn new_file(&self) {
        self.document.write().new_document();
        *self.project.write() = ProjectState::default();
    }

    /// Replace the document from saved JSON, keeping it on failure.
    pub fn open_from_contents(&self, contents: &str) -> SaveResult<()> {
        self.document.write().load_json(contents)?;
        Ok(())
    }

    /// Open a document file and adopt its location as the project location.
    pub async fn open_file(&self, path: &Path) -> SaveResult<()> {
        let location = ProjectLocation::from_file(path)
            .ok_or_else(|| SaveError::InvalidLocation(path.display().to_string()))?;
        let contents = self.fs.read_file(path).await?;
        self.open_from_contents(&contents)?;

        let is_gradle_project = self.fs.exists(&location.dir.join(BUILD_GRADLE)).await;
        info!(file = %path.display(), is_gradle_project, "Opened document");
        let mut project = self.project.write();
        project.location = Some(location);
        project.is_gradle_project = is_gradle_project;
        Ok(())
    }

    /// Plan and solve one path.
    ///
    /// Planner validation failures abort before the solver is called and
    /// leave the path untouched. Solver failures clear the generating flag
    /// and keep the previous cached trajectory.
    pub async fn generate(&self, path_id: PathId) -> GenerationResult<GenerateOutcome> {
        let request = {
            let mut doc = self.document.write();
            let path = doc
                .path(path_id)
                .ok_or(GenerationError::PathNotFound(path_id))?;
            if path.is_generating() {
                debug!(path = %path.name, "Generation already in progress");
                return Ok(GenerateOutcome::AlreadyGenerating);
            }
            if path.waypoints().len() < 2 {
                return Err(GenerationError::NotEnoughWaypoints {
                    name: path.name.clone(),
                });
            }

            if let Err(err) = doc.plan_control_intervals(path_id) {
                drop(doc);
                self.bus.emit(AppEvent::Generation(GenerationEvent::Failed {
                    path: path_id,
                    reason: err.to_string(),
                }));
                return Err(err.into());
            }
            doc.set_generating(path_id, true);
            doc.solver_request(path_id)?
        };

        info!(path = %request.path.name, "Generating trajectory");
        self.bus
            .emit(AppEvent::Generation(GenerationEvent::Started { path: path_id }));

        let result = self.solver.generate(request).await;

        match result {
            Ok(samples) => {
                let count = samples.len();
                let stored = self.document.write().set_trajectory(path_id, samples);
                if !stored {
                    debug!(path = %path_id, "Path removed during generation; result held for undo");
                    return Ok(GenerateOutcome::PathRemoved);
                }
                info!(path = %path_id, samples = count, "Generation finished");
                self.bus.emit(AppEvent::Generation(GenerationEvent::Finished {
                    path: path_id,
                    samples: count,
                }));
                Ok(GenerateOutcome::Generated { samples: count })
            }
            Err(err) => {
                self.document.write().set_generating(path_id, false);
                error!(path = %path_id, "Generation failed: {}", err);
                self.bus.emit(AppEvent::Generation(GenerationEvent::Failed {
                    path: path_id,
                    reason: err.to_string(),
                }));
                Err(GenerationError::Solver(err.to_string()))
            }
        }
    }

    /// Generate, then write the result to the project trajectory file.
    ///
    /// An export failure is reported but the generated trajectory stays.
    pub async fn generate_and_export(&self, path_id: PathId) -> GenerationResult<GenerateOutcome> {
        let outcome = self.generate(path_id).await?;
        if let GenerateOutcome::Generated { .. } = outcome {
            self.export_to_project(path_id).await?;
        }
        Ok(outcome)
    }

    /// Project trajectory file for a path as `(dir, file name)`.
    pub fn trajectory_file_path(&self, path_id: PathId) -> ExportResult<(PathBuf, String)> {
        let name = self
            .document
            .read()
            .path(path_id)
            .map(|p| p.name.clone())
            .ok_or(ExportError::PathNotFound(path_id))?;
        let project = self.project.read();
        let location = project.location.as_ref().ok_or(ExportError::NotSaved)?;
        let dir = location
            .dir
            .join(self.config.project.trajectory_dir(project.is_gradle_project));
        Ok((
            dir,
            format!("{}.{}", name, self.config.project.trajectory_extension),
        ))
    }

    /// Serialized trajectory of a path, `None` if it is not exportable.
    fn trajectory_contents(&self, path_id: PathId) -> ExportResult<Option<String>> {
        let samples: Option<Vec<TrajectorySample>> = self
            .document
            .read()
            .path(path_id)
            .ok_or(ExportError::PathNotFound(path_id))?
            .saved_trajectory()
            .map(<[TrajectorySample]>::to_vec);
        samples
            .map(|samples| {
                TrajectoryFile { samples }
                    .to_json()
                    .map_err(|e| ExportError::Serialize(e.to_string()))
            })
            .transpose()
    }

    /// Write a path's cached trajectory to `dir/name`, creating `dir` if needed.
    pub async fn write_trajectory(
        &self,
        path_id: PathId,
        dir: &Path,
        name: &str,
    ) -> ExportResult<WriteOutcome> {
        let Some(contents) = self.trajectory_contents(path_id)? else {
            return Ok(WriteOutcome::NothingToExport);
        };
        self.write_contents(path_id, dir, name, &contents).await
    }

    async fn write_contents(
        &self,
        path_id: PathId,
        dir: &Path,
        name: &str,
        contents: &str,
    ) -> ExportResult<WriteOutcome> {
        let result = async {
            if !self.fs.exists(dir).await {
                self.fs.create_dir(dir).await?;
            }
            self.fs.write_file(dir, name, contents).await
        }
        .await;

        match result {
            Ok(()) => {
                let file = dir.join(name);
                debug!(file = %file.display(), "Trajectory written");
                self.bus.emit(AppEvent::Export(ExportEvent::Written {
                    path: path_id,
                    file: file.display().to_string(),
                }));
                Ok(WriteOutcome::Written(file))
            }
            Err(err) => {
                self.bus.emit(AppEvent::Export(ExportEvent::Failed {
                    path: path_id,
                    reason: err.to_string(),
                }));
                Err(err.into())
            }
        }
    }

    /// Write a path's trajectory to its project trajectory file.
    pub async fn export_to_project(&self, path_id: PathId) -> ExportResult<WriteOutcome> {
        let Some(contents) = self.trajectory_contents(path_id)? else {
            return Ok(WriteOutcome::NothingToExport);
        };
        let (dir, name) = self.trajectory_file_path(path_id)?;
        self.write_contents(path_id, &dir, &name, &contents).await
    }

    /// Ask the user where to export a path's trajectory.
    ///
    /// The project trajectory file is offered as the default when the
    /// document has been saved. Cancelling is not an error.
    pub async fn export_trajectory(&self, path_id: PathId) -> ExportResult<WriteOutcome> {
        let Some(contents) = self.trajectory_contents(path_id)? else {
            return Ok(WriteOutcome::NothingToExport);
        };
        let default_path = self
            .trajectory_file_path(path_id)
            .ok()
            .map(|(dir, name)| dir.join(name));
        let filters = [FileFilter::new(
            "Trajopt Trajectory",
            self.config.project.trajectory_extension.clone(),
        )];

        let Some(chosen) = self
            .dialogs
            .choose_save_location("Export Trajectory", default_path, &filters)
            .await
        else {
            debug!("Trajectory export cancelled");
            return Ok(WriteOutcome::Cancelled);
        };
        let location = ProjectLocation::from_file(&chosen).ok_or_else(|| {
            ExportError::FileSystem(choreokit_core::FileSystemError::InvalidPath {
                reason: chosen.display().to_string(),
            })
        })?;
        self.write_contents(path_id, &location.dir, &location.name, &contents)
            .await
    }

    pub async fn export_active_trajectory(&self) -> ExportResult<WriteOutcome> {
        let active = self.document.read().active_path().id();
        self.export_trajectory(active).await
    }

    /// Export every path to the project trajectory directory.
    ///
    /// All exports run concurrently and every one is attempted; failures are
    /// reported per path name.
    pub async fn export_all_trajectories(&self) -> BatchExportReport {
        let targets: Vec<(PathId, String)> = self
            .document
            .read()
            .path_list()
            .iter()
            .map(|p| (p.id(), p.name.clone()))
            .collect();

        let results = join_all(targets.iter().map(|(id, _)| self.export_to_project(*id))).await;

        let mut report = BatchExportReport::default();
        for ((_, name), result) in targets.into_iter().zip(results) {
            match result {
                Ok(WriteOutcome::Written(_)) => report.exported.push(name),
                Ok(_) => report.skipped.push(name),
                Err(err) => {
                    warn!(path = %name, "Trajectory export failed: {}", err);
                    report.failed.push((name, err));
                }
            }
        }
        info!(
            exported = report.exported.len(),
            failed = report.failed.len(),
            "Exported all trajectories"
        );
        report
    }

    /// Read a path's project trajectory file back into its cache.
    ///
    /// Returns `false` when the file exists but does not parse.
    pub async fn load_trajectory(&self, path_id: PathId) -> ExportResult<bool> {
        let (dir, name) = self.trajectory_file_path(path_id)?;
        let contents = self.fs.read_file(&dir.join(&name)).await?;
        match TrajectoryFile::parse(&contents) {
            Ok(file) => Ok(self.document.write().set_trajectory(path_id, file.samples)),
            Err(err) => {
                warn!(file = %name, "Ignoring unreadable trajectory file: {}", err);
                Ok(false)
            }
        }
    }

    /// Save to the known location, or ask for one.
    ///
    /// Returns `false` if the user cancelled the dialog.
    pub async fn save_file(&self) -> SaveResult<bool> {
        match self.save_location() {
            Some(location) => {
                self.save_file_as(&location.dir, &location.name).await?;
                Ok(true)
            }
            None => self.save_file_dialog().await,
        }
    }

    pub async fn save_file_dialog(&self) -> SaveResult<bool> {
        let filters = [FileFilter::new(
            "Choreo Document",
            self.config.project.document_extension.clone(),
        )];
        let Some(chosen) = self
            .dialogs
            .choose_save_location("Save Document", None, &filters)
            .await
        else {
            return Ok(false);
        };
        let location = ProjectLocation::from_file(&chosen)
            .ok_or_else(|| SaveError::InvalidLocation(chosen.display().to_string()))?;
        self.save_file_as(&location.dir, &location.name).await?;
        Ok(true)
    }

    /// Write the document to `dir/name` and make that the project location.
    ///
    /// When the presence of `dir/build.gradle` differs from the current
    /// project type, the type is switched and every trajectory re-exported.
    pub async fn save_file_as(&self, dir: &Path, name: &str) -> SaveResult<()> {
        let contents = self.document.read().to_saved().to_json()?;
        self.fs.write_file(dir, name, &contents).await?;
        info!(file = %dir.join(name).display(), "Saved document");

        let is_gradle_project = self.fs.exists(&dir.join(BUILD_GRADLE)).await;
        let changed = {
            let mut project = self.project.write();
            project.location = Some(ProjectLocation::new(dir, name));
            let changed = project.is_gradle_project != is_gradle_project;
            project.is_gradle_project = is_gradle_project;
            changed
        };
        self.bus.emit(AppEvent::Document(DocumentEvent::Saved {
            dir: dir.display().to_string(),
            name: name.to_string(),
        }));

        if changed {
            info!(is_gradle_project, "Project type changed; re-exporting trajectories");
            self.export_all_trajectories().await;
        }
        Ok(())
    }

    /// Save when autosave is on and the document has a location.
    pub async fn autosave(&self) -> SaveResult<bool> {
        if !self.config.project.autosave || self.save_location().is_none() {
            return Ok(false);
        }
        self.save_file().await
    }

    async fn autosave_logged(&self) {
        if let Err(err) = self.autosave().await {
            error!("Autosave failed: {}", err);
        }
    }

    /// Apply document changes through `f`; autosaves if the history moved.
    pub async fn update<R>(
        &self,
        f: impl FnOnce(&mut Document) -> DocumentResult<R>,
    ) -> DocumentResult<R> {
        let (result, moved) = {
            let mut doc = self.document.write();
            let before = doc.history().revision();
            let result = f(&mut *doc);
            (result, doc.history().revision() != before)
        };
        if moved {
            self.autosave_logged().await;
        }
        result
    }

    pub async fn undo(&self) -> bool {
        let moved = self.document.write().undo();
        if moved {
            self.autosave_logged().await;
        }
        moved
    }

    pub async fn redo(&self) -> bool {
        let moved = self.document.write().redo();
        if moved {
            self.autosave_logged().await;
        }
        moved
    }

    /// Offer to save a never-saved document before the window closes.
    pub async fn on_close_requested(&self) -> SaveResult<()> {
        if self.save_location().is_some() {
            return Ok(());
        }
        if self.dialogs.ask_yes_no("Save project?").await {
            self.save_file().await?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for DocumentManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentManager")
            .field("location", &self.save_location())
            .field("is_gradle_project", &self.is_gradle_project())
            .finish()
    }
}
