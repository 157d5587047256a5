//! Logging integration for the fieldwork crates.
//!
//! Provides helpers for configuring [`tracing`]-based logging from
//! [`Settings`](crate::settings::Settings) and for creating per-submission spans.

use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::settings::Settings;

/// Installs the global subscriber: pretty output in debug mode, one JSON
/// object per event otherwise, filtered by `settings.log_level`.
///
/// An unparseable level falls back to `info`. Returns `false` if a
/// subscriber was already installed, in which case nothing changes.
pub fn setup_logging(settings: &Settings) -> bool {
    let filter = EnvFilter::try_new(&settings.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let output = if settings.debug {
        fmt::layer()
            .pretty()
            .with_file(true)
            .with_line_number(true)
            .boxed()
    } else {
        fmt::layer().json().with_current_span(true).boxed()
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(output)
        .try_init()
        .is_ok()
}

/// Creates a tracing span for one validation pass over a submitted form.
///
/// Every event emitted while reconstructing rows and validating fields is
/// tagged with the form id.
///
/// # Examples
///
/// ```
/// use fieldwork_core::logging::submission_span;
///
/// let span = submission_span("signup-form");
/// let _guard = span.enter();
/// tracing::debug!("validating");
/// ```
pub fn submission_span(form_id: &str) -> tracing::Span {
    tracing::debug_span!("submission", form = form_id)
}
