#![forbid(unsafe_code)]

//! Runtime settings.
//!
//! Loaded once at startup from the host's storage as a raw JSON string.
//! Storage itself is a host concern; this module only decodes and
//! validates. Any failure falls back to the built-in defaults, so settings
//! can never block initialization.

use serde::{Deserialize, Serialize};

use revtag_model::CLEAR_TOKEN;

/// Built-in label set, used when storage is empty or unreadable.
pub const DEFAULT_LABELS: [&str; 12] = [
    "praise",
    "nitpick",
    "suggestion",
    "issue",
    "todo",
    "question",
    "thought",
    "chore",
    "note",
    "typo",
    "polish",
    "quibble",
];

/// Built-in decoration set.
pub const DEFAULT_DECORATIONS: [&str; 5] =
    ["non-blocking", "blocking", "if-minor", "security", "test"];

/// User-configurable options recognized by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Selectable labels, in panel order.
    pub labels: Vec<String>,
    /// Selectable decorations, in panel order.
    pub decorations: Vec<String>,
    /// Label preselected by the host UI. Recognized and validated, but the
    /// engine never applies it without an explicit user choice.
    pub default_label: String,
    /// Whether panels on reply composers start visible.
    pub replies_start_visible: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            labels: DEFAULT_LABELS.iter().map(|s| (*s).to_owned()).collect(),
            decorations: DEFAULT_DECORATIONS
                .iter()
                .map(|s| (*s).to_owned())
                .collect(),
            default_label: "suggestion".to_owned(),
            replies_start_visible: false,
        }
    }
}

impl Settings {
    /// Decode settings from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, SettingsError> {
        serde_json::from_str(s).map_err(SettingsError::Json)
    }

    /// Decode settings, falling back to defaults on any failure.
    ///
    /// `raw` is `None` when the host storage had nothing persisted.
    #[must_use]
    pub fn load_or_default(raw: Option<&str>) -> Self {
        match raw {
            None => Self::default(),
            Some(s) => match Self::from_json_str(s) {
                Ok(settings) => settings,
                Err(err) => {
                    tracing::warn!(%err, "settings unreadable, using defaults");
                    Self::default()
                }
            },
        }
    }

    /// Validate the configured values.
    ///
    /// Returns a list of problems; an empty list means the settings are
    /// usable as-is.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.labels.is_empty() {
            errors.push("labels must not be empty".to_owned());
        }
        if self.labels.iter().any(|l| l == CLEAR_TOKEN) {
            errors.push(format!(
                "label {CLEAR_TOKEN:?} collides with the reserved clear token"
            ));
        }
        if self.labels.iter().any(|l| l.trim().is_empty()) {
            errors.push("labels must not contain blank entries".to_owned());
        }
        if self.decorations.iter().any(|d| d.trim().is_empty()) {
            errors.push("decorations must not contain blank entries".to_owned());
        }
        if !self.default_label.is_empty() && !self.labels.contains(&self.default_label) {
            errors.push(format!(
                "defaultLabel {:?} is not in the configured labels",
                self.default_label
            ));
        }

        errors
    }
}

/// Errors that can occur when decoding settings.
#[derive(Debug)]
pub enum SettingsError {
    /// JSON parse error.
    Json(serde_json::Error),
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(e) => Some(e),
        }
    }
}
