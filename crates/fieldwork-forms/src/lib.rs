//! # fieldwork-forms
//!
//! Composable form and table components for fieldwork. Fields group into
//! field bearers, bearers into rows and forms, and rows into table forms
//! that grow or shrink with each submission. A separate filter pipeline
//! sorts, filters, and paginates rows before they are rendered. Tables and
//! sections arrange the same pieces for display.
//!
//! ## Modules
//!
//! - [`fields`] - `Field`, its builder, and the validation state machine
//! - [`choice`] - Alias/value pairs for choice fields
//! - [`field_bearer`] - Named, nestable field containers
//! - [`row`] - Rows of a table or table form
//! - [`validation`] - The validation cascade and exogenous validators
//! - [`form`] - The `Form` trait and `BaseForm`
//! - [`table_form`] - Forms with dynamically discovered rows
//! - [`pick_a`] - Forms that delegate to one picked form
//! - [`table`] - Read-only rows behind a filter
//! - [`section`] - Labels, text, and nested writables
//! - [`filter`] - Sort, predicate, and pagination pipelines
//! - [`record`] - Field bearers backed by persisted records
//! - [`renderable`] - A closed view for renderers

pub mod choice;
pub mod field_bearer;
pub mod fields;
pub mod filter;
pub mod form;
pub mod pick_a;
pub mod record;
pub mod renderable;
pub mod row;
pub mod section;
pub mod table;
pub mod table_form;
pub mod validation;

pub use choice::Choice;
pub use field_bearer::{FieldBearer, FieldBearerBuilder};
pub use fields::{Field, FieldBuilder, FieldType, Validity};
pub use filter::{Condition, Filter, FilterStatement};
pub use form::{BaseForm, BaseFormBuilder, Form, FormAction, Submission};
pub use pick_a::{PickAForm, PickAFormBuilder};
pub use record::make_fields_from_record;
pub use renderable::Renderable;
pub use row::{Row, RowBuilder};
pub use section::{Section, SectionBuilder, SectionItem};
pub use table::{Table, TableBuilder};
pub use table_form::{TableForm, TableFormBuilder};
pub use validation::{ValidationContext, Validators};
