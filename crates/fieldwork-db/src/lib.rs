//! # fieldwork-db
//!
//! Persistence-facing types for fieldwork: the backend-agnostic [`Value`]
//! carried by fields, and the [`Record`] contract through which an ORM
//! adapter exposes a persisted object as a set of columns.
//!
//! No query construction lives here; the adapter behind a [`Record`] owns
//! all database access.

pub mod record;
pub mod value;

pub use record::{Column, ColumnKind, Record};
pub use value::Value;
