//! Advisory file lock preventing two installs from racing on one storage
//! root. Activation normally runs once per session, but nothing stops a
//! second session from pointing at the same directory.

use std::fs::{File, OpenOptions};
use std::io;

use tracing::debug;

use crate::config::StorageRoot;
use crate::provision::error::ProvisionError;

/// Exclusive lock over a storage root, held for the duration of an install.
/// Released when dropped.
pub struct InstallLock {
    _file: File,
}

impl InstallLock {
    /// Tries to take the lock without blocking. A concurrent holder yields
    /// `InstallLocked` so the caller can surface the contention instead of
    /// waiting on an install of unknown duration.
    pub fn acquire(storage: &StorageRoot) -> Result<Self, ProvisionError> {
        std::fs::create_dir_all(storage.path()).map_err(ProvisionError::Lock)?;

        let lock_path = storage.lock_path();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(ProvisionError::Lock)?;

        if let Err(err) = try_lock_exclusive(&file) {
            if err.kind() == io::ErrorKind::WouldBlock {
                return Err(ProvisionError::InstallLocked(storage.path().to_path_buf()));
            }
            return Err(ProvisionError::Lock(err));
        }

        debug!("Acquired install lock at {:?}", lock_path);
        Ok(InstallLock { _file: file })
    }
}

#[cfg(unix)]
fn try_lock_exclusive(file: &File) -> io::Result<()> {
    use rustix::fs::{FlockOperation, flock};

    flock(file, FlockOperation::NonBlockingLockExclusive)?;
    Ok(())
}

#[cfg(not(unix))]
fn try_lock_exclusive(_file: &File) -> io::Result<()> {
    // Advisory locking is unix-only here; other hosts fall back to the
    // one-activation-per-session assumption.
    Ok(())
}
