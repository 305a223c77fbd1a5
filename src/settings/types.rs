//! Typed view over the host's JSON settings object.
//!
//! Only the recognized keys are interpreted; everything else rides along
//! untouched. Malformed values never fail activation, they fall back to
//! documented defaults.

use serde_json::{Map, Value};
use tracing::warn;

use crate::paths::rewriter::PythonVersion;

/// Settings key selecting the host-environment Python generation.
pub const DEV_ENVIRONMENT_KEY: &str = "basedpyright.dev_environment";

/// Settings key holding the ordered analysis search-path list.
pub const EXTRA_PATHS_KEY: &str = "python.analysis.extraPaths";

/// Recognized host-environment identifiers. Anything else means no path
/// rewriting is wanted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DevEnvironment {
    SublimeText38,
    #[default]
    Unrecognized,
}

impl DevEnvironment {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "sublime_text_38" => Self::SublimeText38,
            _ => Self::Unrecognized,
        }
    }

    /// The Python version pair the tag stands for, if recognized.
    pub fn python_version(self) -> Option<PythonVersion> {
        match self {
            Self::SublimeText38 => Some(PythonVersion::PY38),
            Self::Unrecognized => None,
        }
    }
}

/// The recognized slice of the settings object, with defaults applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServerSettings {
    pub dev_environment: DevEnvironment,
    /// Ordered, append-only; never deduplicated (documented policy).
    pub extra_paths: Vec<String>,
    /// Keys this launcher does not interpret, preserved for write-back.
    pub(crate) rest: Map<String, Value>,
}

impl ServerSettings {
    /// Decodes a settings object permissively: missing or mistyped values
    /// become defaults rather than errors.
    pub fn from_value(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            if !value.is_null() {
                warn!("Settings root is not an object, using defaults");
            }
            return Self::default();
        };

        let dev_environment = match object.get(DEV_ENVIRONMENT_KEY) {
            Some(Value::String(raw)) => DevEnvironment::parse(raw),
            Some(other) => {
                warn!("{} has unexpected type {:?}", DEV_ENVIRONMENT_KEY, other);
                DevEnvironment::Unrecognized
            }
            None => DevEnvironment::Unrecognized,
        };

        let extra_paths = match object.get(EXTRA_PATHS_KEY) {
            Some(Value::Array(entries)) => entries
                .iter()
                .filter_map(|entry| entry.as_str().map(str::to_string))
                .collect(),
            Some(other) => {
                warn!("{} has unexpected type {:?}", EXTRA_PATHS_KEY, other);
                Vec::new()
            }
            None => Vec::new(),
        };

        let rest = object
            .iter()
            .filter(|(key, _)| key.as_str() != DEV_ENVIRONMENT_KEY && key.as_str() != EXTRA_PATHS_KEY)
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Self {
            dev_environment,
            extra_paths,
            rest,
        }
    }

    /// Serializes back into the host's settings shape, writing the
    /// reconciled list under the canonical key.
    pub fn to_value(&self) -> Value {
        let mut object = self.rest.clone();
        let tag = match self.dev_environment {
            DevEnvironment::SublimeText38 => Some("sublime_text_38"),
            DevEnvironment::Unrecognized => None,
        };
        if let Some(tag) = tag {
            object.insert(DEV_ENVIRONMENT_KEY.to_string(), Value::String(tag.into()));
        }
        object.insert(
            EXTRA_PATHS_KEY.to_string(),
            Value::Array(self.extra_paths.iter().cloned().map(Value::String).collect()),
        );
        Value::Object(object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn parses_recognized_dev_environment_and_paths() {
        let settings = ServerSettings::from_value(&json!({
            "basedpyright.dev_environment": "sublime_text_38",
            "python.analysis.extraPaths": ["/a", "/b"],
        }));

        assert_eq!(settings.dev_environment, DevEnvironment::SublimeText38);
        assert_eq!(settings.extra_paths, vec!["/a", "/b"]);
    }

    #[test]
    fn unknown_tag_is_unrecognized() {
        let settings = ServerSettings::from_value(&json!({
            "basedpyright.dev_environment": "sublime_text_33",
        }));

        assert_eq!(settings.dev_environment, DevEnvironment::Unrecognized);
    }

    #[test]
    fn mistyped_values_fall_back_to_defaults() {
        let settings = ServerSettings::from_value(&json!({
            "basedpyright.dev_environment": 38,
            "python.analysis.extraPaths": "/not/a/list",
        }));

        assert_eq!(settings.dev_environment, DevEnvironment::Unrecognized);
        assert!(settings.extra_paths.is_empty());
    }

    #[test]
    fn non_object_root_uses_defaults() {
        assert_eq!(
            ServerSettings::from_value(&json!("nonsense")),
            ServerSettings::default()
        );
        assert_eq!(ServerSettings::from_value(&Value::Null), ServerSettings::default());
    }

    #[test]
    fn non_string_path_entries_are_skipped() {
        let settings = ServerSettings::from_value(&json!({
            "python.analysis.extraPaths": ["/a", 42, null, "/b"],
        }));

        assert_eq!(settings.extra_paths, vec!["/a", "/b"]);
    }

    #[test]
    fn write_back_preserves_foreign_keys() {
        let input = json!({
            "basedpyright.dev_environment": "sublime_text_38",
            "python.analysis.extraPaths": ["/a"],
            "basedpyright.analysis.diagnosticMode": "openFilesOnly",
        });

        let mut settings = ServerSettings::from_value(&input);
        settings.extra_paths.push("/b".to_string());
        let output = settings.to_value();

        assert_eq!(output["python.analysis.extraPaths"], json!(["/a", "/b"]));
        assert_eq!(
            output["basedpyright.analysis.diagnosticMode"],
            json!("openFilesOnly")
        );
        assert_eq!(
            output["basedpyright.dev_environment"],
            json!("sublime_text_38")
        );
    }
}
