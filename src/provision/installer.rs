//! Install-once provisioning of the language server.

use std::io;
use std::path::Path;

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::StorageRoot;
use crate::provision::error::ProvisionError;
use crate::provision::executor::CommandExecutor;
use crate::provision::lock::InstallLock;
use crate::provision::progress::{ProgressGuard, ProgressReporter};
use crate::provision::runtime::RuntimeAcquirer;

const INSTALL_LABEL: &str = "installing basedpyright";

/// Makes sure the server entry point exists, installing on first use.
///
/// The entry artifact's existence is the only install marker: present means
/// done (zero side effects), absent means the full sequence runs — runtime
/// setup, resource-tree copy, dependency install. A failed attempt leaves
/// the marker absent, so the next activation re-runs the sequence; the
/// partially copied tree is overwritten rather than rolled back.
pub async fn ensure_ready(
    storage: &StorageRoot,
    resources: &Path,
    runtime: &dyn RuntimeAcquirer,
    executor: &dyn CommandExecutor,
    progress: &dyn ProgressReporter,
) -> Result<(), ProvisionError> {
    let server_path = storage.server_path();
    if server_path.exists() {
        debug!("Server already installed at {:?}", server_path);
        return Ok(());
    }

    let _lock = InstallLock::acquire(storage)?;

    // A concurrent session may have completed the install while this one
    // was acquiring the lock.
    if server_path.exists() {
        debug!("Server installed concurrently at {:?}", server_path);
        return Ok(());
    }

    runtime.setup().await?;

    let server_dir = storage.server_dir();
    info!("Copying server resources {:?} -> {:?}", resources, server_dir);
    copy_tree(resources, &server_dir).map_err(ProvisionError::ResourceCopy)?;

    let deno = runtime.executable()?;
    {
        let _progress = ProgressGuard::begin(progress, INSTALL_LABEL);
        executor
            .run(&deno, &["install".to_string()], &server_dir)
            .await
            .map_err(|e| ProvisionError::DependencyInstall(e.to_string()))?;
    }

    if !server_path.exists() {
        return Err(ProvisionError::ServerPathMissingAfterInstall(server_path));
    }

    info!("Server installed at {:?}", server_path);
    Ok(())
}

/// Copies a directory tree, overwriting files that already exist at the
/// destination. Stale files from an earlier attempt that no longer exist in
/// the source are left behind; the dependency install does not read them.
fn copy_tree(src: &Path, dst: &Path) -> io::Result<()> {
    for entry in WalkDir::new(src) {
        let entry = entry.map_err(io::Error::other)?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(io::Error::other)?;
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
