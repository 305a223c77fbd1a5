//! Bootstrap and launcher for the basedpyright language server.
//!
//! Ensures the Deno runtime and the server's dependencies exist on disk
//! (installed exactly once, lazily), reconciles the host's analysis search
//! paths across Python generations, and spawns the server wired to a stdio
//! transport for the host's own LSP client to drive.

pub mod config;
pub mod launch;
pub mod log;
pub mod paths;
pub mod provision;
pub mod settings;

pub use config::StorageRoot;
pub use launch::activator::{ActivateError, Activator};
pub use launch::launcher::{LaunchDescriptor, StdioTransport};
pub use paths::rewriter::{PathRewriter, PythonVersion};
pub use provision::error::ProvisionError;
pub use settings::types::ServerSettings;
