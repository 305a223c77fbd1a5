// Provisioning layer
// - error.rs: provisioning error taxonomy
// - runtime.rs: scripting-runtime acquisition (Deno)
// - executor.rs: subprocess execution trait + tokio implementation
// - progress.rs: scoped install-progress indicator
// - lock.rs: advisory file lock keyed by the storage root
// - installer.rs: install-once orchestration (ensure_ready)

pub mod error;
pub mod executor;
pub mod installer;
pub mod lock;
pub mod progress;
pub mod runtime;
