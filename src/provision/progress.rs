//! Scoped progress indication around the dependency install.

use tracing::info;

/// Collaborator contract for the host's progress indicator. Purely
/// observational; holds no other resource.
pub trait ProgressReporter: Send + Sync {
    fn started(&self, label: &str);
    fn finished(&self, label: &str);
}

/// Holds the indicator for one labeled operation and releases it on drop,
/// so every exit path of the guarded scope ends the indication: success,
/// error, or cancellation of the surrounding task.
pub struct ProgressGuard<'a> {
    reporter: &'a dyn ProgressReporter,
    label: String,
}

impl<'a> ProgressGuard<'a> {
    pub fn begin(reporter: &'a dyn ProgressReporter, label: &str) -> Self {
        reporter.started(label);
        Self {
            reporter,
            label: label.to_string(),
        }
    }
}

impl Drop for ProgressGuard<'_> {
    fn drop(&mut self) {
        self.reporter.finished(&self.label);
    }
}

/// Reports progress into the log. Hosts with a status bar supply their own
/// reporter instead.
#[derive(Debug, Default)]
pub struct LogProgress;

impl ProgressReporter for LogProgress {
    fn started(&self, label: &str) {
        info!("{} ...", label);
    }

    fn finished(&self, label: &str) {
        info!("{} done", label);
    }
}
