use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("Runtime acquisition failed: {0}")]
    RuntimeAcquisition(String),

    #[error("Dependency install failed: {0}")]
    DependencyInstall(String),

    /// The install command finished without error but the entry artifact is
    /// still absent. Fatal: launching a non-existent backend is never
    /// attempted.
    #[error("Install finished but server entry point is missing: {}", .0.display())]
    ServerPathMissingAfterInstall(PathBuf),

    #[error("Failed to copy server resources: {0}")]
    ResourceCopy(#[source] std::io::Error),

    #[error("Another install is already running against {}", .0.display())]
    InstallLocked(PathBuf),

    #[error("Failed to lock storage root: {0}")]
    Lock(#[source] std::io::Error),
}
