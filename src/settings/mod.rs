// Settings layer
// - types.rs: typed settings surface over the host's JSON settings object
// - reconciler.rs: extraPaths reconciliation against the host environment

pub mod reconciler;
pub mod types;
