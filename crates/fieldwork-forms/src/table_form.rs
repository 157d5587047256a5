//! Forms made of a variable number of identical rows.
//!
//! A [`TableForm`] may carry a row factory. The row it produces at
//! construction is the *prototypical row*, and the slug of its first visible
//! field is the *anchor*. Every submitted key containing the anchor names one
//! row instance; what is left after removing the anchor is that row's prefix.
//! Each pass rebuilds the live rows as the initial rows followed by one fresh
//! factory row per discovered prefix.

use std::fmt;

use indexmap::IndexMap;

use fieldwork_core::logging::submission_span;
use fieldwork_core::{FieldworkError, FieldworkResult};
use fieldwork_db::Value;
use fieldwork_http::QueryDict;

use crate::field_bearer::FieldBearer;
use crate::fields::{self, Field, Validity};
use crate::filter::Filter;
use crate::form::{Form, FormAction, FormState, FormStateBuilder};
use crate::row::Row;
use crate::validation::{self, ValidationContext};

/// Produces one fresh row with the prototypical shape.
pub type RowFactory = Box<dyn Fn() -> FieldworkResult<Row>>;

/// Callback run by [`TableForm::on_valid`] or [`TableForm::on_invalid`].
pub type TableFormCallback = Box<dyn Fn(&TableForm) -> Value>;

/// A form whose fields come from its rows.
///
/// # Examples
///
/// ```
/// use fieldwork_forms::{Field, FieldType, Form, Row, TableForm};
/// use fieldwork_http::QueryDict;
///
/// let mut form = TableForm::builder()
///     .id("people")
///     .row_factory(|| {
///         Row::builder()
///             .field(
///                 "name",
///                 Field::builder().field_type(FieldType::Text).label("Name").build()?,
///             )
///             .build()
///     })
///     .build()
///     .unwrap();
///
/// form.validate(&QueryDict::parse("0-name=Ann&1-name=Bob")).unwrap();
/// assert_eq!(form.rows().len(), 2);
/// assert!(form.is_valid());
/// ```
pub struct TableForm {
    state: FormState,
    row_factory: Option<RowFactory>,
    prototypical_row: Option<Row>,
    initial_row_count: usize,
    rows: Vec<Row>,
    can_remove: bool,
    filter: Filter,
    on_valid: Option<TableFormCallback>,
    on_invalid: Option<TableFormCallback>,
}

impl fmt::Debug for TableForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableForm")
            .field("state", &self.state)
            .field("prototypical_row", &self.prototypical_row)
            .field("initial_row_count", &self.initial_row_count)
            .field("rows", &self.rows)
            .field("can_remove", &self.can_remove)
            .field("filter", &self.filter)
            .finish_non_exhaustive()
    }
}

impl TableForm {
    pub fn builder() -> TableFormBuilder {
        TableFormBuilder::new()
    }

    /// The live rows: initial rows, then rows discovered in the last pass.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [Row] {
        &mut self.rows
    }

    /// The rows the form was built with.
    pub fn initial_rows(&self) -> &[Row] {
        &self.rows[..self.initial_row_count]
    }

    pub const fn prototypical_row(&self) -> Option<&Row> {
        self.prototypical_row.as_ref()
    }

    pub const fn can_remove(&self) -> bool {
        self.can_remove
    }

    /// The filter a renderer should apply to the rows. Empty by default.
    pub const fn filter(&self) -> &Filter {
        &self.filter
    }

    /// The slug row discovery looks for, when the form has a factory.
    pub fn anchor(&self) -> Option<String> {
        self.prototypical_row.as_ref().and_then(anchor_of)
    }

    fn discover_rows(&self, params: &QueryDict) -> FieldworkResult<Vec<Row>> {
        let (Some(factory), Some(prototype)) = (&self.row_factory, &self.prototypical_row) else {
            return Ok(Vec::new());
        };
        let Some(anchor) = anchor_of(prototype) else {
            return Ok(Vec::new());
        };

        let prefixes: Vec<String> = params
            .keys()
            .filter(|key| key.contains(anchor.as_str()))
            .map(|key| key.replace(anchor.as_str(), ""))
            .collect();
        tracing::debug!(form = %self.state.id, %anchor, ?prefixes, "row prefixes discovered");

        prefixes
            .iter()
            .map(|prefix| instantiate_row(factory, prototype, prefix, params))
            .collect()
    }
}

fn anchor_of(row: &Row) -> Option<String> {
    row.field_bearer()
        .visible_fields()
        .first()
        .map(|(_, field)| field.slug())
}

/// Builds one row for `prefix`, seeding each field from `params`.
///
/// The prototype's suffix chain is copied only onto fields whose suffixes
/// differ from it. A factory that already adds the suffixes would otherwise
/// get them twice, and the row's slugs would stop matching the submitted
/// keys the row was discovered from.
fn instantiate_row(
    factory: &RowFactory,
    prototype: &Row,
    prefix: &str,
    params: &QueryDict,
) -> FieldworkResult<Row> {
    let mut row = factory()?;
    let prefix = prefix.trim_matches('-');

    for (name, template) in prototype.field_bearer().fields() {
        let field = row.field_bearer_mut().field_by_name_mut(name)?;
        if field.suffixes() != template.suffixes() {
            let suffix = template.suffixes().join("-");
            if !suffix.is_empty() {
                field.add_suffix(suffix);
            }
        }
        if !prefix.is_empty() {
            field.add_prefix(prefix);
        }
        if let Some(values) = params.get_list(&field.slug()).filter(|v| !v.is_empty()) {
            field.set_initial(fields::submitted_value(values));
        }
    }
    Ok(row)
}

impl Form for TableForm {
    fn id(&self) -> &str {
        &self.state.id
    }

    fn classes(&self) -> &[String] {
        &self.state.classes
    }

    fn data(&self) -> &IndexMap<String, String> {
        &self.state.data
    }

    fn form_type(&self) -> &str {
        &self.state.form_type
    }

    fn method(&self) -> &str {
        &self.state.method
    }

    fn target(&self) -> &str {
        &self.state.target
    }

    fn actions(&self) -> &[FormAction] {
        &self.state.actions
    }

    /// The prototypical row's bearer, or the first row's when there is no
    /// factory.
    fn field_bearer(&self) -> Option<&FieldBearer> {
        self.prototypical_row
            .as_ref()
            .or_else(|| self.rows.first())
            .map(Row::field_bearer)
    }

    fn sub_forms(&self) -> &[Box<dyn Form>] {
        &[]
    }

    fn errors(&self) -> &[String] {
        &self.state.errors
    }

    fn add_error(&mut self, error: String) {
        self.state.errors.push(error);
    }

    fn validity(&self) -> Validity {
        self.state.validity
    }

    fn validate(&mut self, params: &QueryDict) -> FieldworkResult<()> {
        let span = submission_span(&self.state.id);
        let _guard = span.enter();

        self.state.begin_pass();
        self.rows.truncate(self.initial_row_count);
        let discovered = self.discover_rows(params)?;
        self.rows.extend(discovered);

        for row in &mut self.rows {
            validation::validate_fields(row.field_bearer_mut(), params);
        }
        for row in &mut self.rows {
            validation::run_validators(
                row.field_bearer_mut(),
                &self.state.validators,
                &self.state.id,
                params,
            );
        }

        let invalid = self
            .rows
            .iter()
            .any(|row| validation::has_invalid_visible(row.field_bearer()));
        if invalid {
            self.state.add_invalid_form_error();
            self.state.validity = Validity::Invalid;
        } else {
            self.state.validity = Validity::Valid;
        }
        tracing::debug!(rows = self.rows.len(), validity = ?self.state.validity, "table form validated");
        Ok(())
    }

    /// Runs the `on_valid` callback, or saves every row's bearer and returns
    /// the results as a list.
    fn on_valid(&mut self) -> Value {
        match &self.on_valid {
            Some(callback) => callback(self),
            None => Value::List(
                self.rows
                    .iter()
                    .map(|row| row.field_bearer().save())
                    .collect(),
            ),
        }
    }

    fn on_invalid(&mut self) -> Value {
        self.on_invalid
            .as_ref()
            .map_or(Value::Null, |callback| callback(self))
    }
}

/// Builder for [`TableForm`].
#[derive(Default)]
pub struct TableFormBuilder {
    state: FormStateBuilder,
    rows: Vec<Row>,
    row_factory: Option<RowFactory>,
    can_remove: bool,
    filter: Filter,
    on_valid: Option<TableFormCallback>,
    on_invalid: Option<TableFormCallback>,
}

impl fmt::Debug for TableFormBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableFormBuilder")
            .field("state", &self.state)
            .field("rows", &self.rows)
            .field("has_row_factory", &self.row_factory.is_some())
            .field("can_remove", &self.can_remove)
            .finish_non_exhaustive()
    }
}

impl TableFormBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.state.id = Some(id.into());
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.state.classes.push(class.into());
        self
    }

    pub fn data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.state.data.insert(key.into(), value.into());
        self
    }

    /// Defaults to `"table"`.
    pub fn form_type(mut self, form_type: impl Into<String>) -> Self {
        self.state.form_type = Some(form_type.into());
        self
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.state.method = Some(method.into());
        self
    }

    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.state.target = Some(target.into());
        self
    }

    pub fn action(mut self, action: FormAction) -> Self {
        self.state.actions.push(action);
        self
    }

    pub fn row(mut self, row: Row) -> Self {
        self.rows.push(row);
        self
    }

    pub fn rows(mut self, rows: impl IntoIterator<Item = Row>) -> Self {
        self.rows.extend(rows);
        self
    }

    pub fn row_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> FieldworkResult<Row> + 'static,
    {
        self.row_factory = Some(Box::new(factory));
        self
    }

    pub fn can_remove(mut self, can_remove: bool) -> Self {
        self.can_remove = can_remove;
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    pub fn validator<F>(mut self, field_name: impl Into<String>, validator: F) -> Self
    where
        F: Fn(&mut Field, &ValidationContext<'_>) + 'static,
    {
        self.state.validators.add(field_name, validator);
        self
    }

    pub fn on_valid<F>(mut self, callback: F) -> Self
    where
        F: Fn(&TableForm) -> Value + 'static,
    {
        self.on_valid = Some(Box::new(callback));
        self
    }

    pub fn on_invalid<F>(mut self, callback: F) -> Self
    where
        F: Fn(&TableForm) -> Value + 'static,
    {
        self.on_invalid = Some(Box::new(callback));
        self
    }

    /// Builds the form, calling the row factory once for the prototype.
    ///
    /// # Errors
    ///
    /// Returns [`FieldworkError::ConfigurationError`] if the id is missing,
    /// if the factory fails, or if its row has no visible field or a visible
    /// field with an empty slug.
    pub fn build(self) -> FieldworkResult<TableForm> {
        let state = self.state.build("table")?;

        let prototypical_row = match &self.row_factory {
            Some(factory) => {
                let row = factory().map_err(|err| {
                    FieldworkError::ConfigurationError(format!(
                        "row factory of table form '{}' failed: {err}",
                        state.id
                    ))
                })?;
                match anchor_of(&row) {
                    None => {
                        return Err(FieldworkError::ConfigurationError(format!(
                            "row factory of table form '{}' made a row with no visible field",
                            state.id
                        )))
                    }
                    Some(anchor) if anchor.is_empty() => {
                        return Err(FieldworkError::ConfigurationError(format!(
                            "first visible field of table form '{}' has an empty slug",
                            state.id
                        )))
                    }
                    Some(_) => Some(row),
                }
            }
            None => None,
        };

        Ok(TableForm {
            state,
            row_factory: self.row_factory,
            prototypical_row,
            initial_row_count: self.rows.len(),
            rows: self.rows,
            can_remove: self.can_remove,
            filter: self.filter,
            on_valid: self.on_valid,
            on_invalid: self.on_invalid,
        })
    }
}
