//! Reading [`Settings`] from configuration files and the environment.
//!
//! A file only needs the keys it changes; everything else keeps its default.
//! Environment variables, when applied, win over the file.
//!
//! | Env Var | Setting |
//! |---|---|
//! | `FIELDWORK_DEBUG` | `debug` |
//! | `FIELDWORK_LOG_LEVEL` | `log_level` |
//! | `FIELDWORK_INVALID_FORM_MESSAGE` | `invalid_form_message` |
//! | `FIELDWORK_REQUIRED_MESSAGE` | `required_message` |
//! | `FIELDWORK_HIGHLIGHT_ROW_SCRIPT` | `highlight_row_script` |
//!
//! ```rust,no_run
//! use fieldwork_core::settings_loader;
//!
//! let settings = settings_loader::from_file_with_env("config/fieldwork.toml").unwrap();
//! ```

use std::path::Path;

use crate::error::{FieldworkError, FieldworkResult};
use crate::settings::Settings;

/// A configuration file syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Toml,
    Json,
}

impl Format {
    /// Picks the format from a file extension: `.json` is JSON, anything
    /// else is TOML.
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Toml,
        }
    }

    /// Parses `source` in this format.
    pub fn parse(self, source: &str) -> FieldworkResult<Settings> {
        let parsed: Result<Settings, String> = match self {
            Self::Toml => toml::from_str(source).map_err(|e| e.to_string()),
            Self::Json => serde_json::from_str(source).map_err(|e| e.to_string()),
        };
        parsed.map_err(|e| {
            FieldworkError::ConfigurationError(format!("invalid {self:?} settings: {e}"))
        })
    }
}

pub fn from_toml_str(source: &str) -> FieldworkResult<Settings> {
    Format::Toml.parse(source)
}

pub fn from_json_str(source: &str) -> FieldworkResult<Settings> {
    Format::Json.parse(source)
}

/// Reads a settings file, choosing the format by extension.
pub fn from_file(path: impl AsRef<Path>) -> FieldworkResult<Settings> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|e| {
        FieldworkError::ConfigurationError(format!("cannot read '{}': {e}", path.display()))
    })?;
    Format::for_path(path).parse(&source)
}

/// [`from_file`], then [`apply_env_overrides`].
pub fn from_file_with_env(path: impl AsRef<Path>) -> FieldworkResult<Settings> {
    let mut settings = from_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Defaults with environment overrides applied.
pub fn from_env() -> Settings {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings);
    settings
}

const ENV_VARS: [&str; 5] = [
    "FIELDWORK_DEBUG",
    "FIELDWORK_LOG_LEVEL",
    "FIELDWORK_INVALID_FORM_MESSAGE",
    "FIELDWORK_REQUIRED_MESSAGE",
    "FIELDWORK_HIGHLIGHT_ROW_SCRIPT",
];

/// Overwrites settings from any `FIELDWORK_*` variables that are set.
pub fn apply_env_overrides(settings: &mut Settings) {
    apply_overrides(settings, |name| std::env::var(name).ok());
}

fn apply_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    for name in ENV_VARS {
        let Some(value) = lookup(name) else {
            continue;
        };
        match name {
            "FIELDWORK_DEBUG" => settings.debug = parse_flag(&value),
            "FIELDWORK_LOG_LEVEL" => settings.log_level = value,
            "FIELDWORK_INVALID_FORM_MESSAGE" => settings.invalid_form_message = value,
            "FIELDWORK_REQUIRED_MESSAGE" => settings.required_message = value,
            _ => settings.highlight_row_script = value,
        }
    }
}

fn parse_flag(value: &str) -> bool {
    ["1", "true", "yes", "on"]
        .iter()
        .any(|truthy| value.trim().eq_ignore_ascii_case(truthy))
}
