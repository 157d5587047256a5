//! The `Form` trait and the `BaseForm` implementation.
//!
//! Every form type runs the same lifecycle: [`Form::validate`] reads one set
//! of submitted params, then [`Form::submit`] calls either `on_valid` or
//! `on_invalid`. Forms never read ambient request state; the params are
//! always passed in.
//!
//! [`BaseForm`] owns a single [`FieldBearer`] plus any number of sub-forms.

use std::fmt;

use indexmap::IndexMap;

use fieldwork_core::logging::submission_span;
use fieldwork_core::{FieldworkError, FieldworkResult, SETTINGS};
use fieldwork_db::Value;
use fieldwork_http::QueryDict;

use crate::field_bearer::{FieldBearer, FieldBearerBuilder};
use crate::fields::{Field, Validity};
use crate::validation::{self, ValidationContext, Validators};

/// A button or link that submits a form somewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormAction {
    label: String,
    method: String,
    target: String,
}

impl FormAction {
    pub fn new(
        label: impl Into<String>,
        method: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            method: method.into(),
            target: target.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn target(&self) -> &str {
        &self.target
    }
}

/// The outcome of [`Form::submit`].
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// Validation passed; holds the `on_valid` result.
    Valid(Value),
    /// Validation failed; holds the form's errors and the `on_invalid` result.
    Invalid { errors: Vec<String>, result: Value },
}

impl Submission {
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }
}

/// The core form abstraction.
///
/// Implementations keep their own validity and error list; both are reset
/// at the start of each [`validate`](Form::validate) call.
pub trait Form {
    fn id(&self) -> &str;

    fn classes(&self) -> &[String];

    /// `data-*` attributes for the renderer.
    fn data(&self) -> &IndexMap<String, String>;

    /// A free-form tag the renderer may use to pick a layout.
    fn form_type(&self) -> &str;

    fn method(&self) -> &str;

    fn target(&self) -> &str;

    fn actions(&self) -> &[FormAction];

    /// The bearer whose fields this form renders, when it has one.
    fn field_bearer(&self) -> Option<&FieldBearer>;

    fn sub_forms(&self) -> &[Box<dyn Form>];

    /// Form-level errors, excluding those attached to fields.
    fn errors(&self) -> &[String];

    fn add_error(&mut self, error: String);

    fn validity(&self) -> Validity;

    /// Runs one validation pass over `params`.
    ///
    /// Bad input is reported through [`validity`](Form::validity) and
    /// [`errors`](Form::errors), never as an `Err`.
    ///
    /// # Errors
    ///
    /// Returns an error only for configuration problems discovered while
    /// rebuilding the form, such as a failing row factory.
    fn validate(&mut self, params: &QueryDict) -> FieldworkResult<()>;

    fn on_valid(&mut self) -> Value;

    fn on_invalid(&mut self) -> Value;

    fn is_valid(&self) -> bool {
        self.validity() == Validity::Valid
    }

    /// Validates `params`, then runs the matching callback.
    fn submit(&mut self, params: &QueryDict) -> FieldworkResult<Submission> {
        self.validate(params)?;
        if self.is_valid() {
            Ok(Submission::Valid(self.on_valid()))
        } else {
            let result = self.on_invalid();
            Ok(Submission::Invalid {
                errors: self.errors().to_vec(),
                result,
            })
        }
    }
}

/// State every form type carries.
#[derive(Debug)]
pub(crate) struct FormState {
    pub(crate) id: String,
    pub(crate) classes: Vec<String>,
    pub(crate) data: IndexMap<String, String>,
    pub(crate) form_type: String,
    pub(crate) method: String,
    pub(crate) target: String,
    pub(crate) actions: Vec<FormAction>,
    pub(crate) validators: Validators,
    pub(crate) errors: Vec<String>,
    pub(crate) validity: Validity,
}

impl FormState {
    /// Resets errors and validity for a fresh pass.
    pub(crate) fn begin_pass(&mut self) {
        self.errors.clear();
        self.validity = Validity::Unvalidated;
    }

    pub(crate) fn add_invalid_form_error(&mut self) {
        self.errors
            .push(SETTINGS.current().invalid_form_message.clone());
    }
}

/// The settings shared by the form builders.
#[derive(Debug, Default)]
pub(crate) struct FormStateBuilder {
    pub(crate) id: Option<String>,
    pub(crate) classes: Vec<String>,
    pub(crate) data: IndexMap<String, String>,
    pub(crate) form_type: Option<String>,
    pub(crate) method: Option<String>,
    pub(crate) target: Option<String>,
    pub(crate) actions: Vec<FormAction>,
    pub(crate) validators: Validators,
}

impl FormStateBuilder {
    pub(crate) fn build(self, default_type: &str) -> FieldworkResult<FormState> {
        let id = self
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| FieldworkError::ConfigurationError("a form needs an id".into()))?;
        let settings = SETTINGS.current();
        Ok(FormState {
            id,
            classes: self.classes,
            data: self.data,
            form_type: self.form_type.unwrap_or_else(|| default_type.to_string()),
            method: self
                .method
                .unwrap_or_else(|| settings.default_form_method.clone()),
            target: self
                .target
                .unwrap_or_else(|| settings.default_form_target.clone()),
            actions: self.actions,
            validators: self.validators,
            errors: Vec::new(),
            validity: Validity::Unvalidated,
        })
    }
}

/// Callback run by [`BaseForm::on_valid`] or [`BaseForm::on_invalid`].
pub type BaseFormCallback = Box<dyn Fn(&BaseForm) -> Value>;

/// A form over one field bearer.
///
/// # Examples
///
/// ```
/// use fieldwork_forms::{BaseForm, Field, FieldType, Form, Submission};
/// use fieldwork_http::QueryDict;
///
/// let mut form = BaseForm::builder()
///     .id("signup")
///     .field(
///         "email",
///         Field::builder()
///             .field_type(FieldType::Text)
///             .label("Email")
///             .required(true)
///             .build()
///             .unwrap(),
///     )
///     .build()
///     .unwrap();
///
/// let outcome = form.submit(&QueryDict::new()).unwrap();
/// assert!(!outcome.is_valid());
/// assert_eq!(form.errors().len(), 1);
///
/// let outcome = form.submit(&QueryDict::parse("email=a%40b.c")).unwrap();
/// assert!(matches!(outcome, Submission::Valid(_)));
/// ```
pub struct BaseForm {
    state: FormState,
    field_bearer: FieldBearer,
    sub_forms: Vec<Box<dyn Form>>,
    on_valid: Option<BaseFormCallback>,
    on_invalid: Option<BaseFormCallback>,
}

impl fmt::Debug for BaseForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaseForm")
            .field("state", &self.state)
            .field("field_bearer", &self.field_bearer)
            .field("sub_forms", &self.sub_forms.len())
            .finish_non_exhaustive()
    }
}

impl BaseForm {
    pub fn builder() -> BaseFormBuilder {
        BaseFormBuilder::new()
    }

    pub fn field_bearer_mut(&mut self) -> &mut FieldBearer {
        &mut self.field_bearer
    }

    /// Shortcut for `field_bearer().field_by_name(name)`.
    pub fn field_by_name(&self, name: &str) -> FieldworkResult<&Field> {
        self.field_bearer.field_by_name(name)
    }
}

impl Form for BaseForm {
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

    fn field_bearer(&self) -> Option<&FieldBearer> {
        Some(&self.field_bearer)
    }

    fn sub_forms(&self) -> &[Box<dyn Form>] {
        &self.sub_forms
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
        validation::validate_fields(&mut self.field_bearer, params);
        validation::run_validators(
            &mut self.field_bearer,
            &self.state.validators,
            &self.state.id,
            params,
        );

        let mut valid = !validation::has_invalid_visible(&self.field_bearer);
        for sub_form in &mut self.sub_forms {
            sub_form.validate(params)?;
            valid &= sub_form.is_valid();
        }

        // One generic error on the parent, whether its own fields or a
        // sub-form failed; the sub-form keeps its own errors too.
        if !valid {
            self.state.add_invalid_form_error();
        }
        self.state.validity = if valid {
            Validity::Valid
        } else {
            Validity::Invalid
        };
        tracing::debug!(validity = ?self.state.validity, errors = self.state.errors.len(), "form validated");
        Ok(())
    }

    /// Runs the `on_valid` callback, or saves the field bearer when none was
    /// given, then runs `on_valid` on every sub-form. Returns this form's
    /// own result.
    fn on_valid(&mut self) -> Value {
        let result = match &self.on_valid {
            Some(callback) => callback(self),
            None => self.field_bearer.save(),
        };
        for sub_form in &mut self.sub_forms {
            sub_form.on_valid();
        }
        result
    }

    fn on_invalid(&mut self) -> Value {
        let result = self
            .on_invalid
            .as_ref()
            .map_or(Value::Null, |callback| callback(self));
        for sub_form in &mut self.sub_forms {
            sub_form.on_invalid();
        }
        result
    }
}

/// Builder for [`BaseForm`].
#[derive(Default)]
pub struct BaseFormBuilder {
    state: FormStateBuilder,
    field_bearer: FieldBearerBuilder,
    sub_forms: Vec<Box<dyn Form>>,
    on_valid: Option<BaseFormCallback>,
    on_invalid: Option<BaseFormCallback>,
}

impl fmt::Debug for BaseFormBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaseFormBuilder")
            .field("state", &self.state)
            .field("field_bearer", &self.field_bearer)
            .finish_non_exhaustive()
    }
}

impl BaseFormBuilder {
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

    /// Defaults to `"base"`.
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

    pub fn field(mut self, name: impl Into<String>, field: Field) -> Self {
        self.field_bearer = self.field_bearer.field(name, field);
        self
    }

    /// Replaces the bearer builder wholesale.
    pub fn field_bearer(mut self, field_bearer: FieldBearerBuilder) -> Self {
        self.field_bearer = field_bearer;
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

    pub fn sub_form(mut self, form: impl Form + 'static) -> Self {
        self.sub_forms.push(Box::new(form));
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
        F: Fn(&BaseForm) -> Value + 'static,
    {
        self.on_valid = Some(Box::new(callback));
        self
    }

    pub fn on_invalid<F>(mut self, callback: F) -> Self
    where
        F: Fn(&BaseForm) -> Value + 'static,
    {
        self.on_invalid = Some(Box::new(callback));
        self
    }

    /// # Errors
    ///
    /// Returns [`FieldworkError::ConfigurationError`] if the id is missing or
    /// the field bearer fails to build.
    pub fn build(self) -> FieldworkResult<BaseForm> {
        Ok(BaseForm {
            state: self.state.build("base")?,
            field_bearer: self.field_bearer.build()?,
            sub_forms: self.sub_forms,
            on_valid: self.on_valid,
            on_invalid: self.on_invalid,
        })
    }
}
