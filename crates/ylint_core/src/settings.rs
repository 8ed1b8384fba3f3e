//! User-facing settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Settings namespace used by editors (`yamllint.enable`, `yamllint.config`, ...).
pub const SETTINGS_SECTION: &str = "yamllint";

/// Default debounce delay in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Global lint settings.
///
/// Deserialized from the editor's JSON settings; missing fields take their
/// defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Master switch. When off, diagnostics are cleared and nothing is linted.
    pub enable: bool,
    /// Explicit configuration file; overrides discovery when non-empty.
    pub config: String,
    pub lint_on_save: bool,
    pub lint_on_change: bool,
    pub lint_on_open: bool,
    /// Quiet period before a change-triggered lint runs, in milliseconds.
    pub debounce_time: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enable: true,
            config: String::new(),
            lint_on_save: true,
            lint_on_change: true,
            lint_on_open: true,
            debounce_time: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl Settings {
    /// Reads settings from a JSON value, either the bare settings object or
    /// an object holding it under [`SETTINGS_SECTION`].
    pub fn from_json(value: &serde_json::Value) -> Result<Self, serde_json::Error> {
        let section = value.get(SETTINGS_SECTION).unwrap_or(value);
        if section.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(section.clone())
    }

    /// Reads settings held under [`SETTINGS_SECTION`] only.
    ///
    /// Returns `None` when `value` has no such key, so changes to other
    /// sections never touch these settings.
    pub fn from_section(value: &serde_json::Value) -> Option<Result<Self, serde_json::Error>> {
        let section = value.get(SETTINGS_SECTION)?;
        Some(Self::from_json(section))
    }

    /// The debounce delay as a [`Duration`].
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_time)
    }

    /// Whether an explicit configuration path is set.
    pub fn has_explicit_config(&self) -> bool {
        !self.config.trim().is_empty()
    }
}
