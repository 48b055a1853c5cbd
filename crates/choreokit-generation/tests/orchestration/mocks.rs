use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use choreokit_core::{FileSystemError, PathId, SolverError};
use choreokit_document::{SolverRequest, TrajectorySample, Waypoint};
use choreokit_generation::{DialogService, DocumentManager, FileFilter, FileSystem, SolverService};
use choreokit_settings::Config;
use parking_lot::Mutex;
use tokio::sync::Notify;

pub fn samples(n: usize) -> Vec<TrajectorySample> {
    (0..n)
        .map(|i| TrajectorySample::new(i as f64 * 0.1, i as f64, 0.0, 0.0))
        .collect()
}

/// Solver that replays queued responses and can pause mid-call.
#[derive(Default)]
pub struct MockSolver {
    pub requests: Mutex<Vec<SolverRequest>>,
    responses: Mutex<VecDeque<Result<Vec<TrajectorySample>, SolverError>>>,
    gate: Mutex<Option<(Arc<Notify>, Arc<Notify>)>>,
}

impl MockSolver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, response: Result<Vec<TrajectorySample>, SolverError>) {
        self.responses.lock().push_back(response);
    }

    /// Pause the next call: `started` fires on entry, the call resumes on `release`.
    pub fn pause_next(&self) -> (Arc<Notify>, Arc<Notify>) {
        let started = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        *self.gate.lock() = Some((started.clone(), release.clone()));
        (started, release)
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl SolverService for MockSolver {
    async fn generate(&self, request: SolverRequest) -> Result<Vec<TrajectorySample>, SolverError> {
        self.requests.lock().push(request);
        let gate = self.gate.lock().take();
        if let Some((started, release)) = gate {
            started.notify_one();
            release.notified().await;
        }
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(samples(3)))
    }
}

/// In-memory file system; writes fail when the directory is missing.
#[derive(Default)]
pub struct MemoryFileSystem {
    pub files: Mutex<HashMap<PathBuf, String>>,
    pub dirs: Mutex<HashSet<PathBuf>>,
    pub failing_names: Mutex<HashSet<String>>,
}

impl MemoryFileSystem {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add_dir(&self, dir: impl Into<PathBuf>) {
        self.dirs.lock().insert(dir.into());
    }

    pub fn add_file(&self, path: impl Into<PathBuf>, contents: &str) {
        self.files.lock().insert(path.into(), contents.to_string());
    }

    pub fn fail_writes_to(&self, name: &str) {
        self.failing_names.lock().insert(name.to_string());
    }

    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files.lock().get(path.as_ref()).cloned()
    }
}

#[async_trait]
impl FileSystem for MemoryFileSystem {
    async fn write_file(
        &self,
        dir: &Path,
        name: &str,
        contents: &str,
    ) -> Result<(), FileSystemError> {
        let path = dir.join(name);
        if self.failing_names.lock().contains(name) || !self.dirs.lock().contains(dir) {
            return Err(FileSystemError::WriteFailed {
                path: path.display().to_string(),
                reason: "denied".to_string(),
            });
        }
        self.files.lock().insert(path, contents.to_string());
        Ok(())
    }

    async fn read_file(&self, path: &Path) -> Result<String, FileSystemError> {
        self.contents(path).ok_or_else(|| FileSystemError::NotFound {
            path: path.display().to_string(),
        })
    }

    async fn exists(&self, path: &Path) -> bool {
        self.files.lock().contains_key(path) || self.dirs.lock().contains(path)
    }

    async fn create_dir(&self, dir: &Path) -> Result<(), FileSystemError> {
        self.dirs.lock().insert(dir.to_path_buf());
        Ok(())
    }
}

/// Scripted dialogs that remember what they were asked.
#[derive(Default)]
pub struct MockDialogs {
    pub answer: Mutex<bool>,
    pub location: Mutex<Option<PathBuf>>,
    pub prompts: Mutex<Vec<String>>,
    pub offered_defaults: Mutex<Vec<Option<PathBuf>>>,
}

impl MockDialogs {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn choose(&self, location: Option<&str>) {
        *self.location.lock() = location.map(PathBuf::from);
    }
}

#[async_trait]
impl DialogService for MockDialogs {
    async fn ask_yes_no(&self, prompt: &str) -> bool {
        self.prompts.lock().push(prompt.to_string());
        *self.answer.lock()
    }

    async fn choose_save_location(
        &self,
        title: &str,
        default_path: Option<PathBuf>,
        _filters: &[FileFilter],
    ) -> Option<PathBuf> {
        self.prompts.lock().push(title.to_string());
        self.offered_defaults.lock().push(default_path);
        self.location.lock().clone()
    }
}

pub struct Harness {
    pub manager: DocumentManager,
    pub solver: Arc<MockSolver>,
    pub fs: Arc<MemoryFileSystem>,
    pub dialogs: Arc<MockDialogs>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let solver = MockSolver::new();
        let fs = MemoryFileSystem::new();
        let dialogs = MockDialogs::new();
        let manager = DocumentManager::new(config, solver.clone(), fs.clone(), dialogs.clone());
        Self {
            manager,
            solver,
            fs,
            dialogs,
        }
    }

    pub fn active_path(&self) -> PathId {
        self.manager.document().read().active_path().id()
    }

    /// Add a path with `n` waypoints one metre apart.
    pub fn add_path(&self, name: &str, n: usize) -> PathId {
        let mut doc = self.manager.document().write();
        let id = doc.add_path(Some(name), false).unwrap();
        for i in 0..n {
            doc.insert_waypoint(id, Waypoint::at(i as f64, 0.0, 0.0))
                .unwrap();
        }
        id
    }

    pub fn fill_active(&self, n: usize) -> PathId {
        let id = self.active_path();
        let mut doc = self.manager.document().write();
        for i in 0..n {
            doc.insert_waypoint(id, Waypoint::at(i as f64, 0.0, 0.0))
                .unwrap();
        }
        id
    }

    pub fn cache(&self, path: PathId, n: usize) {
        self.manager
            .document()
            .write()
            .set_trajectory(path, samples(n));
    }

    pub async fn save_to(&self, dir: &str) {
        self.fs.add_dir(dir);
        self.manager
            .save_file_as(Path::new(dir), "robot.chor")
            .await
            .unwrap();
    }
}
