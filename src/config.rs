use std::path::{Path, PathBuf};

/// Storage tag scoping the on-disk server installation. Bumping it forces a
/// fresh install into a new directory on next activation.
pub const STORAGE_TAG: &str = "0.0.1";

/// Relative path from the server directory to the backend's entry point.
/// Its existence on disk is the install-complete marker.
pub const SERVER_ENTRY: &str = "node_modules/basedpyright/langserver.index.js";

const SERVER_DIR_NAME: &str = "language-server";
const LOCK_FILE_NAME: &str = ".install-lock";

/// Returns the path to the data directory for pyright-launcher.
/// Uses $XDG_DATA_HOME/pyright-launcher if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/pyright-launcher,
/// or ./pyright-launcher if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("pyright-launcher.log")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("pyright-launcher")
}

/// Version-tagged directory owning the server's installed resources.
///
/// Constructed once at session start and passed into the activator by
/// parameter; the path for a given tag never changes within one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageRoot {
    root: PathBuf,
}

impl StorageRoot {
    /// Creates a storage root under an explicit base directory.
    pub fn new(base: impl Into<PathBuf>, tag: &str) -> Self {
        Self {
            root: base.into().join(tag),
        }
    }

    /// Creates the default storage root under the data directory.
    pub fn from_env() -> Self {
        Self::new(data_dir(), STORAGE_TAG)
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Directory receiving the copied resource tree and installed
    /// dependencies.
    pub fn server_dir(&self) -> PathBuf {
        self.root.join(SERVER_DIR_NAME)
    }

    /// Resolved path to the backend's entry point beneath the server
    /// directory.
    pub fn server_path(&self) -> PathBuf {
        self.server_dir().join(SERVER_ENTRY)
    }

    /// Lock file guarding concurrent installs against this root.
    pub fn lock_path(&self) -> PathBuf {
        self.root.join(LOCK_FILE_NAME)
    }
}
