//! Acquisition of the scripting runtime hosting the language server.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::provision::error::ProvisionError;

/// Collaborator contract for runtime acquisition.
///
/// `setup` installs or verifies the runtime and is idempotent;
/// `executable` resolves the runtime binary once setup has succeeded.
#[async_trait::async_trait]
pub trait RuntimeAcquirer: Send + Sync {
    async fn setup(&self) -> Result<(), ProvisionError>;

    fn executable(&self) -> Result<PathBuf, ProvisionError>;
}

/// Uses a Deno already present on the host's PATH. Setup only verifies the
/// binary resolves; nothing is downloaded.
#[derive(Debug, Default)]
pub struct SystemDeno;

impl SystemDeno {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl RuntimeAcquirer for SystemDeno {
    async fn setup(&self) -> Result<(), ProvisionError> {
        let exe = self.executable()?;
        info!("Using deno at {:?}", exe);
        Ok(())
    }

    fn executable(&self) -> Result<PathBuf, ProvisionError> {
        let exe = which::which("deno").map_err(|e| {
            ProvisionError::RuntimeAcquisition(format!("deno not found on PATH: {}", e))
        })?;
        debug!("Resolved deno executable: {:?}", exe);
        Ok(exe)
    }
}
