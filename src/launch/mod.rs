// Launch layer
// - launcher.rs: command construction and subprocess spawn
// - activator.rs: provision -> reconcile -> launch orchestration

pub mod activator;
pub mod launcher;
