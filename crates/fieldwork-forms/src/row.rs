//! Rows: a field bearer plus row-level presentation.

use indexmap::IndexMap;

use fieldwork_core::{FieldworkError, FieldworkResult, SETTINGS};

use crate::field_bearer::{FieldBearer, FieldBearerBuilder};
use crate::fields::Field;

/// One row of a table or table form.
///
/// A row is either highlightable or carries its own click behavior, never
/// both.
#[derive(Debug)]
pub struct Row {
    id: String,
    classes: Vec<String>,
    data: IndexMap<String, String>,
    field_bearer: FieldBearer,
    on_click: Option<String>,
    highlightable: bool,
}

impl Row {
    pub fn builder() -> RowBuilder {
        RowBuilder::new()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub const fn data(&self) -> &IndexMap<String, String> {
        &self.data
    }

    pub const fn field_bearer(&self) -> &FieldBearer {
        &self.field_bearer
    }

    pub fn field_bearer_mut(&mut self) -> &mut FieldBearer {
        &mut self.field_bearer
    }

    /// The row's click behavior. Highlightable rows report the configured
    /// highlight script.
    pub fn on_click(&self) -> Option<&str> {
        self.on_click.as_deref()
    }

    pub const fn is_highlightable(&self) -> bool {
        self.highlightable
    }
}

/// Builder for [`Row`].
///
/// Fields go into an inner [`FieldBearerBuilder`]; use
/// [`with_field_bearer`](Self::with_field_bearer) for anything beyond
/// adding fields.
#[derive(Debug, Default)]
pub struct RowBuilder {
    id: String,
    classes: Vec<String>,
    data: IndexMap<String, String>,
    field_bearer: FieldBearerBuilder,
    on_click: Option<String>,
    highlightable: bool,
}

impl RowBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn field(mut self, name: impl Into<String>, field: Field) -> Self {
        self.field_bearer = self.field_bearer.field(name, field);
        self
    }

    pub fn field_bearer(mut self, name: impl Into<String>, bearer: FieldBearer) -> Self {
        self.field_bearer = self.field_bearer.field_bearer(name, bearer);
        self
    }

    /// Applies arbitrary configuration to the inner bearer builder.
    pub fn with_field_bearer<F>(mut self, configure: F) -> Self
    where
        F: FnOnce(FieldBearerBuilder) -> FieldBearerBuilder,
    {
        self.field_bearer = configure(self.field_bearer);
        self
    }

    pub fn on_click(mut self, on_click: impl Into<String>) -> Self {
        self.on_click = Some(on_click.into());
        self
    }

    pub fn highlightable(mut self, highlightable: bool) -> Self {
        self.highlightable = highlightable;
        self
    }

    /// # Errors
    ///
    /// Returns [`FieldworkError::ConfigurationError`] if the row is both
    /// highlightable and given a click behavior, if it has no fields, or if
    /// the inner bearer fails to build.
    pub fn build(self) -> FieldworkResult<Row> {
        if self.highlightable && self.on_click.is_some() {
            return Err(FieldworkError::ConfigurationError(
                "a row cannot be highlightable and also carry an on_click".into(),
            ));
        }

        let field_bearer = self.field_bearer.build()?;
        if field_bearer.is_empty() {
            return Err(FieldworkError::ConfigurationError(
                "a row needs at least one field".into(),
            ));
        }

        let on_click = if self.highlightable {
            Some(SETTINGS.current().highlight_row_script.clone())
        } else {
            self.on_click
        };

        Ok(Row {
            id: self.id,
            classes: self.classes,
            data: self.data,
            field_bearer,
            on_click,
            highlightable: self.highlightable,
        })
    }
}
