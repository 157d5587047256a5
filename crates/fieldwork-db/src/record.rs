//! The record adapter contract.
//!
//! A [`Record`] is a persisted object seen through its columns. An ORM
//! adapter implements it once per model; the forms crate turns the columns
//! into fields and writes validated data back through
//! [`Record::set_value`].

use fieldwork_core::FieldworkResult;

use crate::value::Value;

/// The storage kind of a column, which decides the field type it maps to.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind")]
pub enum ColumnKind {
    /// The primary key column.
    PrimaryKey,
    /// A many-to-one reference to another record.
    ForeignKey {
        /// The referenced model name.
        to: String,
    },
    /// An optimistic-locking version counter.
    Version,
    /// A boolean column.
    Boolean,
    /// A short string column.
    Text,
    /// An unlimited-length text column.
    LongText,
    /// An integer column.
    Integer,
    /// A floating-point column.
    Float,
    /// A date column.
    Date,
    /// A date-and-time column.
    DateTime,
    /// A column restricted to a fixed set of values.
    Enum {
        /// The allowed values, in display order.
        values: Vec<String>,
    },
}

impl ColumnKind {
    /// Returns `true` for bookkeeping columns that a form never shows.
    pub const fn is_bookkeeping(&self) -> bool {
        matches!(self, Self::PrimaryKey | Self::ForeignKey { .. } | Self::Version)
    }
}

/// One column of a record, with its current value.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// The column name, unique within the record's model.
    pub name: String,
    /// The storage kind.
    pub kind: ColumnKind,
    /// Human-readable label.
    pub label: String,
    /// Whether the column accepts NULL.
    pub nullable: bool,
    /// The record's current value for this column.
    pub value: Value,
}

impl Column {
    /// Creates a non-nullable column whose label is its name.
    pub fn new(name: impl Into<String>, kind: ColumnKind, value: impl Into<Value>) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            kind,
            nullable: false,
            value: value.into(),
        }
    }

    /// Sets the human-readable label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets whether the column accepts NULL.
    #[must_use]
    pub const fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }
}

/// A persisted object exposed column by column.
///
/// # Examples
///
/// ```
/// use fieldwork_core::FieldworkResult;
/// use fieldwork_db::{Column, ColumnKind, Record, Value};
///
/// struct Note {
///     id: i64,
///     body: String,
/// }
///
/// impl Record for Note {
///     fn model_name(&self) -> &str {
///         "Note"
///     }
///
///     fn columns(&self) -> Vec<Column> {
///         vec![
///             Column::new("id", ColumnKind::PrimaryKey, self.id),
///             Column::new("body", ColumnKind::LongText, self.body.as_str()),
///         ]
///     }
///
///     fn set_value(&mut self, column: &str, value: Value) -> FieldworkResult<()> {
///         if column == "body" {
///             self.body = value.to_string();
///         }
///         Ok(())
///     }
///
///     fn save(&mut self) -> Value {
///         Value::Int(self.id)
///     }
/// }
///
/// let note = Note { id: 1, body: "hi".into() };
/// assert_eq!(note.columns().len(), 2);
/// ```
pub trait Record {
    /// The model name, used as the field-name prefix (`<Model>.<column>`).
    fn model_name(&self) -> &str;

    /// The record's columns in declaration order.
    fn columns(&self) -> Vec<Column>;

    /// Writes a value into the named column.
    ///
    /// # Errors
    ///
    /// Returns [`NotFound`](fieldwork_core::FieldworkError::NotFound) when the
    /// column does not exist, or an adapter-specific error when the value
    /// cannot be stored.
    fn set_value(&mut self, column: &str, value: Value) -> FieldworkResult<()>;

    /// Persists the record and returns an adapter-defined result.
    fn save(&mut self) -> Value;
}
