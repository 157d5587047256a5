//! # fieldwork-core
//!
//! What every other fieldwork crate builds on: the shared error type, the
//! process-wide [`Settings`] with their loader, logging setup, the ordered
//! multi-value map behind submitted parameters, and slug rules.
//!
//! - [`error`] - `FieldworkError` and `FieldworkResult`
//! - [`settings`] / [`settings_loader`] - messages and defaults, read from TOML, JSON, or `FIELDWORK_*` variables
//! - [`logging`] - subscriber setup and submission spans
//! - [`utils`] - `MultiValueDict`, `slugify`, and `escape_html`

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;
pub mod utils;

pub use error::{FieldworkError, FieldworkResult};
pub use settings::{Settings, SETTINGS};
