//! Merges rewritten host search paths into the settings object.

use tracing::debug;

use crate::paths::rewriter::PathRewriter;
use crate::settings::types::ServerSettings;

/// Appends the rewritten host search paths to `extra_paths` when the
/// dev-environment tag is recognized; otherwise leaves the list untouched.
///
/// Entries are appended in rewriter output order, after all existing
/// entries, without deduplication. The backend only observes the result at
/// its next start.
pub fn reconcile(settings: &mut ServerSettings, search_paths: &[String], rewriter: &PathRewriter) {
    let Some(version) = settings.dev_environment.python_version() else {
        debug!("Dev environment unrecognized, extraPaths passes through");
        return;
    };

    let appended = rewriter.rewrite(search_paths, version);
    debug!(
        "Appending {} rewritten search paths to {} existing extraPaths entries",
        appended.len(),
        settings.extra_paths.len()
    );
    settings.extra_paths.extend(appended);
}
