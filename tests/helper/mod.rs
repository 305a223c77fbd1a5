//! Shared fakes and fixtures for the activation tests.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use tempfile::TempDir;

use pyright_launcher::config::StorageRoot;
use pyright_launcher::provision::error::ProvisionError;
use pyright_launcher::provision::executor::{CommandExecutor, ExecError};
use pyright_launcher::provision::progress::ProgressReporter;
use pyright_launcher::provision::runtime::RuntimeAcquirer;

/// Runtime acquirer with a fixed executable; counts setup calls.
pub struct FakeRuntime {
    exe: PathBuf,
    setups: AtomicUsize,
}

impl FakeRuntime {
    pub fn new(exe: impl Into<PathBuf>) -> Self {
        Self {
            exe: exe.into(),
            setups: AtomicUsize::new(0),
        }
    }

    pub fn setup_count(&self) -> usize {
        self.setups.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl RuntimeAcquirer for FakeRuntime {
    async fn setup(&self) -> Result<(), ProvisionError> {
        self.setups.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn executable(&self) -> Result<PathBuf, ProvisionError> {
        Ok(self.exe.clone())
    }
}

/// Records every run and creates the install artifact like the real
/// dependency install would.
pub struct RecordingExecutor {
    calls: Mutex<Vec<(PathBuf, Vec<String>, PathBuf)>>,
    artifact: Option<PathBuf>,
    fail: bool,
}

impl RecordingExecutor {
    pub fn producing(artifact: PathBuf) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            artifact: Some(artifact),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            artifact: None,
            fail: true,
        }
    }

    pub fn calls(&self) -> Vec<(PathBuf, Vec<String>, PathBuf)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl CommandExecutor for RecordingExecutor {
    async fn run(&self, program: &Path, args: &[String], cwd: &Path) -> Result<(), ExecError> {
        self.calls.lock().unwrap().push((
            program.to_path_buf(),
            args.to_vec(),
            cwd.to_path_buf(),
        ));
        if self.fail {
            return Err(ExecError::Io(std::io::Error::other("install failed")));
        }
        if let Some(artifact) = &self.artifact {
            std::fs::create_dir_all(artifact.parent().unwrap()).unwrap();
            std::fs::write(artifact, "entry").unwrap();
        }
        Ok(())
    }
}

/// Progress reporter asserting balanced acquire/release.
#[derive(Default)]
pub struct CountingProgress {
    started: AtomicUsize,
    finished: AtomicUsize,
}

impl CountingProgress {
    pub fn started_count(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub fn finished_count(&self) -> usize {
        self.finished.load(Ordering::SeqCst)
    }
}

impl ProgressReporter for CountingProgress {
    fn started(&self, _label: &str) {
        self.started.fetch_add(1, Ordering::SeqCst);
    }

    fn finished(&self, _label: &str) {
        self.finished.fetch_add(1, Ordering::SeqCst);
    }
}

/// A fresh storage root plus a minimal resource tree, both under one
/// temporary directory kept alive by the caller.
pub fn activation_fixture() -> (TempDir, StorageRoot, PathBuf) {
    let temp = TempDir::new().unwrap();
    let storage = StorageRoot::new(temp.path().join("storage"), "0.0.1");
    let resources = temp.path().join("resources");
    std::fs::create_dir_all(&resources).unwrap();
    std::fs::write(
        resources.join("package.json"),
        r#"{"dependencies":{"basedpyright":"^1.13.0"}}"#,
    )
    .unwrap();
    (temp, storage, resources)
}
