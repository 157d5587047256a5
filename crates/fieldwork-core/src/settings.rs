//! Process-wide settings: the messages forms attach to invalid input and the
//! defaults forms and rows fall back on.
//!
//! Library code reads [`SETTINGS.current()`](LazySettings::current), which
//! answers with the defaults until an application calls
//! [`configure`](LazySettings::configure).

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::{FieldworkError, FieldworkResult};

/// Every tunable fieldwork reads at runtime.
///
/// Missing keys deserialize to their defaults, so a settings file only
/// lists what it changes.
///
/// ```
/// use fieldwork_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert!(settings.debug);
/// assert_eq!(settings.default_form_method, "post");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub debug: bool,
    /// Default filter for [`setup_logging`](crate::logging::setup_logging).
    pub log_level: String,

    /// Added once to a form when any visible field fails.
    pub invalid_form_message: String,
    /// Added to a required field that came back empty.
    pub required_message: String,
    /// Added to a choice field whose submission matches no choice.
    pub invalid_choice_message: String,

    /// Click handler given to highlightable rows.
    pub highlight_row_script: String,

    pub default_form_method: String,
    pub default_form_target: String,

    /// Application keys fieldwork itself ignores.
    pub extra: HashMap<String, serde_json::Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: true,
            log_level: "info".into(),
            invalid_form_message: "Please correct the indicated errors and resubmit the form."
                .into(),
            required_message: "This field is required.".into(),
            invalid_choice_message: "Select a valid choice.".into(),
            highlight_row_script: "fieldwork.highlightRow(this)".into(),
            default_form_method: "post".into(),
            default_form_target: "_self".into(),
            extra: HashMap::new(),
        }
    }
}

/// Settings set at most once, with defaults available before that.
pub struct LazySettings {
    configured: OnceLock<Settings>,
    fallback: OnceLock<Settings>,
}

impl LazySettings {
    pub const fn new() -> Self {
        Self {
            configured: OnceLock::new(),
            fallback: OnceLock::new(),
        }
    }

    /// Installs `settings` for the rest of the process.
    ///
    /// # Errors
    ///
    /// A configuration error if settings were already installed; the first
    /// call wins.
    pub fn configure(&self, settings: Settings) -> FieldworkResult<()> {
        self.configured.set(settings).map_err(|_| {
            FieldworkError::ConfigurationError("settings are already configured".to_string())
        })
    }

    /// The installed settings, if any.
    pub fn get(&self) -> Option<&Settings> {
        self.configured.get()
    }

    /// The installed settings, or the defaults.
    pub fn current(&self) -> &Settings {
        self.get()
            .unwrap_or_else(|| self.fallback.get_or_init(Settings::default))
    }

    pub fn is_configured(&self) -> bool {
        self.get().is_some()
    }
}

impl Default for LazySettings {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LazySettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazySettings")
            .field("configured", &self.get())
            .finish()
    }
}

pub static SETTINGS: LazySettings = LazySettings::new();
