//! Activation sequencing: provision, reconcile, launch.

use std::path::PathBuf;

use thiserror::Error;
use tracing::info;

use crate::config::StorageRoot;
use crate::launch::launcher::{
    LaunchDescriptor, StdioTransport, default_initialization_options, start,
};
use crate::paths::rewriter::PathRewriter;
use crate::provision::error::ProvisionError;
use crate::provision::executor::CommandExecutor;
use crate::provision::installer::ensure_ready;
use crate::provision::progress::ProgressReporter;
use crate::provision::runtime::RuntimeAcquirer;
use crate::settings::reconciler::reconcile;
use crate::settings::types::ServerSettings;

#[derive(Debug, Error)]
pub enum ActivateError {
    #[error(transparent)]
    Provision(#[from] ProvisionError),

    #[error("Failed to spawn language server: {0}")]
    Spawn(#[from] std::io::Error),
}

/// One activation per editing session: provisions the server, reconciles
/// settings, launches the backend. All inputs are explicit; nothing is read
/// from process-wide state.
pub struct Activator {
    storage: StorageRoot,
    resources: PathBuf,
    search_paths: Vec<String>,
    rewriter: PathRewriter,
}

impl Activator {
    pub fn new(
        storage: StorageRoot,
        resources: PathBuf,
        search_paths: Vec<String>,
        rewriter: PathRewriter,
    ) -> Self {
        Self {
            storage,
            resources,
            search_paths,
            rewriter,
        }
    }

    /// Runs everything up to (but not including) the spawn: install-once
    /// provisioning, settings reconciliation, descriptor construction.
    ///
    /// Any provisioning failure aborts here, before a backend process ever
    /// exists. The suspension points are runtime setup and the install
    /// command; cancellation at either leaves the install marker absent, so
    /// the next activation re-runs the installer.
    pub async fn prepare(
        &self,
        settings: &mut ServerSettings,
        runtime: &dyn RuntimeAcquirer,
        executor: &dyn CommandExecutor,
        progress: &dyn ProgressReporter,
    ) -> Result<LaunchDescriptor, ActivateError> {
        ensure_ready(&self.storage, &self.resources, runtime, executor, progress).await?;

        reconcile(settings, &self.search_paths, &self.rewriter);

        let runtime_exe = runtime.executable()?;
        Ok(LaunchDescriptor::new(
            &runtime_exe,
            &self.storage.server_path(),
            default_initialization_options(),
        ))
    }

    /// Full activation: prepare, then spawn the backend and hand back its
    /// stdio transport together with the descriptor the host client needs.
    pub async fn activate(
        &self,
        settings: &mut ServerSettings,
        runtime: &dyn RuntimeAcquirer,
        executor: &dyn CommandExecutor,
        progress: &dyn ProgressReporter,
    ) -> Result<(LaunchDescriptor, StdioTransport), ActivateError> {
        let descriptor = self.prepare(settings, runtime, executor, progress).await?;
        let transport = start(&descriptor)?;
        info!("basedpyright activated");
        Ok((descriptor, transport))
    }
}

/// The host environment's module search paths, taken from PYTHONPATH.
/// Hosts embedding this crate pass their interpreter's own list instead.
pub fn host_search_paths() -> Vec<String> {
    search_paths_from(std::env::var_os("PYTHONPATH"))
}

fn search_paths_from(raw: Option<std::ffi::OsString>) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    std::env::split_paths(&raw)
        .map(|p| p.to_string_lossy().into_owned())
        .filter(|p| !p.is_empty())
        .collect()
}
