//! Core error types for the fieldwork crates.
//!
//! [`FieldworkError`] covers configuration mistakes caught at build time,
//! lookups of names that do not exist, writes to a read-only parameter map,
//! and the I/O and serialization failures of the settings loader.
//!
//! A failed validation is not an error value; it is state carried by fields
//! and forms.

use thiserror::Error;

/// Everything a fieldwork call can fail with.
///
/// ```
/// use fieldwork_core::FieldworkError;
///
/// let err = FieldworkError::NotFound("field 'email'".into());
/// assert_eq!(err.to_string(), "Not found: field 'email'");
/// assert!(!err.is_configuration());
/// ```
#[derive(Error, Debug)]
pub enum FieldworkError {
    // ── Build-time ───────────────────────────────────────────────────

    /// A builder or constructor was used incorrectly: a missing required
    /// input, a choice field without choices, contradictory row flags, or a
    /// row factory that fails to produce a row.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    // ── Lookup ───────────────────────────────────────────────────────

    /// A field or field bearer name that does not exist was requested.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A read-only structure was asked to change, such as setting a key on
    /// an immutable `QueryDict`.
    #[error("Suspicious operation: {0}")]
    SuspiciousOperation(String),

    // ── Serialization ────────────────────────────────────────────────

    /// Values that could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // ── IO ───────────────────────────────────────────────────────────

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl FieldworkError {
    /// Whether a builder or constructor was misused.
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::ConfigurationError(_))
    }

    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

pub type FieldworkResult<T> = Result<T, FieldworkError>;
