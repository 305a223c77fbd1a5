//! Runs external commands to completion in a working directory.

use std::path::Path;
use std::process::Stdio;

use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("command exited with {0}")]
    NonZero(std::process::ExitStatus),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Collaborator contract for running a command to completion.
/// Non-zero exit is a failure.
#[async_trait::async_trait]
pub trait CommandExecutor: Send + Sync {
    async fn run(&self, program: &Path, args: &[String], cwd: &Path) -> Result<(), ExecError>;
}

/// Runs commands through tokio with inherited environment and no stdin.
#[derive(Debug, Default)]
pub struct TokioExecutor;

#[async_trait::async_trait]
impl CommandExecutor for TokioExecutor {
    async fn run(&self, program: &Path, args: &[String], cwd: &Path) -> Result<(), ExecError> {
        debug!("Running {:?} {:?} in {:?}", program, args, cwd);

        let status = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .status()
            .await?;

        if !status.success() {
            return Err(ExecError::NonZero(status));
        }
        Ok(())
    }
}
