//! # fieldwork
//!
//! Server-side building blocks for structured HTML forms and tables.
//!
//! This is the meta-crate that re-exports all sub-crates for convenient access.
//! You can depend on `fieldwork` to get everything, or depend on individual
//! crates for finer-grained control.

/// Settings, error types, and logging setup.
pub use fieldwork_core as core;

/// Field values and the record adapter contract.
#[cfg(feature = "db")]
pub use fieldwork_db as db;

/// The submitted-parameter map.
#[cfg(feature = "http")]
pub use fieldwork_http as http;

/// Fields, bearers, rows, forms, tables, sections, and filters.
#[cfg(feature = "forms")]
pub use fieldwork_forms as forms;

/// Commonly used items in one import.
#[cfg(feature = "forms")]
pub mod prelude {
    pub use fieldwork_core::{FieldworkError, FieldworkResult, Settings, SETTINGS};
    pub use fieldwork_db::{Column, ColumnKind, Record, Value};
    pub use fieldwork_forms::{
        BaseForm, Choice, Condition, Field, FieldBearer, FieldType, Filter, FilterStatement,
        Form, FormAction, PickAForm, Renderable, Row, Section, Submission, Table, TableForm,
        Validity,
    };
    pub use fieldwork_http::QueryDict;
}
