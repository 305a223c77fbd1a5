//! Rewrites the host's module search paths for the analysis backend.
//!
//! Host environments that embed their own Python lay out version-specific
//! subdirectories (`python3.3/`, `python38/`, ...). The backend analyzes
//! against a single target version, so every search path is rewritten to
//! that version before being handed over.
//! See https://github.com/sublimelsp/LSP-pyright/issues/28

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

/// Target Python version pair driving the rewrite table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PythonVersion {
    pub major: u8,
    pub minor: u8,
}

impl PythonVersion {
    pub const PY33: PythonVersion = PythonVersion { major: 3, minor: 3 };
    pub const PY38: PythonVersion = PythonVersion { major: 3, minor: 8 };
}

/// One entry of the rewrite table: a pattern capturing the version-bearing
/// base name, and a replacement re-inserting that base verbatim with the
/// target minor digit.
struct RewriteRule {
    pattern: &'static Regex,
    replacement: &'static str,
}

// Matches "python3" with an optional dot followed by one of the supported
// minor digits, case-insensitively. Only the digit is replaced.
static VERSION_DIR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?P<base>python3\.?)[38]").expect("valid rewrite pattern"));

fn rule_for(target: PythonVersion) -> Option<RewriteRule> {
    match (target.major, target.minor) {
        (3, 3) => Some(RewriteRule {
            pattern: &VERSION_DIR,
            replacement: "${base}3",
        }),
        (3, 8) => Some(RewriteRule {
            pattern: &VERSION_DIR,
            replacement: "${base}8",
        }),
        _ => None,
    }
}

/// Rewrites and filters ordered search-path lists for a target version.
///
/// Pure with respect to its input: the slice is never mutated. The only
/// ambient observation is the final existence check against the filesystem,
/// which is best-effort and uncached.
#[derive(Debug, Clone, Default)]
pub struct PathRewriter {
    packages_dir: Option<PathBuf>,
}

impl PathRewriter {
    /// Creates a rewriter that relocates the host's canonical packages
    /// directory to the end of the list, so project-local overrides are
    /// consulted first.
    /// See https://github.com/sublimelsp/LSP-pyright/pull/26#discussion_r520747708
    pub fn new(packages_dir: Option<PathBuf>) -> Self {
        Self { packages_dir }
    }

    /// Applies version substitution, packages-dir relocation, then the
    /// existence filter, preserving the relative order of survivors.
    /// Duplicate inputs are processed independently; nothing deduplicates.
    pub fn rewrite(&self, paths: &[String], target: PythonVersion) -> Vec<String> {
        let mut rewritten: Vec<String> = match rule_for(target) {
            Some(rule) => paths
                .iter()
                .map(|p| rule.pattern.replace_all(p, rule.replacement).into_owned())
                .collect(),
            None => paths.to_vec(),
        };

        // Move the packages directory to the last position, exactly once.
        // Absent from the input means nothing to do.
        if let Some(packages_dir) = &self.packages_dir
            && rewritten.iter().any(|p| Path::new(p) == packages_dir)
        {
            rewritten.retain(|p| Path::new(p) != packages_dir);
            rewritten.push(packages_dir.to_string_lossy().into_owned());
        }

        rewritten.retain(|p| Path::new(p).is_dir());
        rewritten
    }
}
