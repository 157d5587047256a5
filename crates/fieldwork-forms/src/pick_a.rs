//! Pick-a forms: the user picks one of several forms and fills it in.
//!
//! The manifest is an ordered list of labels. Most labels own a form; a
//! label without one is a heading the renderer shows between options. The
//! chosen label arrives as its slug under `{id}-pick`, and only the chosen
//! form is validated.

use std::fmt;

use indexmap::IndexMap;

use fieldwork_core::logging::submission_span;
use fieldwork_core::utils::text::slugify;
use fieldwork_core::{FieldworkError, FieldworkResult, SETTINGS};
use fieldwork_db::Value;
use fieldwork_http::QueryDict;

use crate::field_bearer::FieldBearer;
use crate::fields::Validity;
use crate::form::{Form, FormAction, FormState, FormStateBuilder};

/// A form that delegates to whichever of its forms was picked.
///
/// # Examples
///
/// ```
/// use fieldwork_forms::{BaseForm, Field, FieldType, Form, PickAForm};
/// use fieldwork_http::QueryDict;
///
/// let by_mail = BaseForm::builder()
///     .id("mail")
///     .field(
///         "address",
///         Field::builder()
///             .field_type(FieldType::Text)
///             .label("Address")
///             .required(true)
///             .build()
///             .unwrap(),
///     )
///     .build()
///     .unwrap();
/// let in_person = BaseForm::builder().id("pickup").build().unwrap();
///
/// let mut form = PickAForm::builder()
///     .id("delivery")
///     .label("How should we deliver?")
///     .form("By Mail", by_mail)
///     .form("In Person", in_person)
///     .build()
///     .unwrap();
///
/// form.validate(&QueryDict::parse("delivery-pick=in-person")).unwrap();
/// assert!(form.is_valid());
/// assert_eq!(form.selected_label(), Some("In Person"));
///
/// form.validate(&QueryDict::parse("delivery-pick=by-mail")).unwrap();
/// assert!(!form.is_valid());
/// ```
pub struct PickAForm {
    state: FormState,
    forms: Vec<Box<dyn Form>>,
    manifest: Vec<(String, Option<usize>)>,
    selected: Option<usize>,
}

impl fmt::Debug for PickAForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PickAForm")
            .field("state", &self.state)
            .field("labels", &self.labels())
            .field("selected", &self.selected_label())
            .finish_non_exhaustive()
    }
}

impl PickAForm {
    pub fn builder() -> PickAFormBuilder {
        PickAFormBuilder::new()
    }

    /// The parameter the chosen label's slug is read from.
    pub fn selection_key(&self) -> String {
        format!("{}-pick", self.state.id)
    }

    /// Labels in manifest order, with the form each one owns.
    pub fn manifest(&self) -> impl Iterator<Item = (&str, Option<&dyn Form>)> {
        self.manifest.iter().map(|(label, index)| {
            (
                label.as_str(),
                index.and_then(|i| self.forms.get(i)).map(|form| &**form),
            )
        })
    }

    pub fn labels(&self) -> Vec<&str> {
        self.manifest.iter().map(|(label, _)| label.as_str()).collect()
    }

    /// The label picked in the last pass, if it named a form.
    pub fn selected_label(&self) -> Option<&str> {
        self.selected
            .and_then(|entry| self.manifest.get(entry))
            .map(|(label, _)| label.as_str())
    }

    pub fn selected_form(&self) -> Option<&dyn Form> {
        self.selected_index().and_then(|i| self.forms.get(i)).map(|form| &**form)
    }

    fn selected_index(&self) -> Option<usize> {
        self.selected
            .and_then(|entry| self.manifest.get(entry))
            .and_then(|(_, index)| *index)
    }

    fn reject(&mut self, message: String) {
        self.state.errors.push(message);
        self.state.validity = Validity::Invalid;
    }
}

impl Form for PickAForm {
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
        None
    }

    fn sub_forms(&self) -> &[Box<dyn Form>] {
        &self.forms
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
        self.selected = None;
        let settings = SETTINGS.current();

        let Some(picked) = params
            .get(&self.selection_key())
            .filter(|slug| !slug.is_empty())
        else {
            self.reject(settings.required_message.clone());
            tracing::debug!("nothing picked");
            return Ok(());
        };

        self.selected = self
            .manifest
            .iter()
            .position(|(label, index)| index.is_some() && slugify(label) == picked);
        let Some(index) = self.selected_index() else {
            self.reject(settings.invalid_choice_message.clone());
            tracing::debug!(picked, "pick matches no form");
            return Ok(());
        };
        let Some(form) = self.forms.get_mut(index) else {
            return Err(FieldworkError::ConfigurationError(format!(
                "pick-a manifest points at missing form {index}"
            )));
        };

        form.validate(params)?;
        if form.is_valid() {
            self.state.validity = Validity::Valid;
        } else {
            self.state.add_invalid_form_error();
            self.state.validity = Validity::Invalid;
        }
        tracing::debug!(picked, validity = ?self.state.validity, "pick-a validated");
        Ok(())
    }

    /// The picked form's `on_valid` result.
    fn on_valid(&mut self) -> Value {
        match self.selected_index().and_then(|i| self.forms.get_mut(i)) {
            Some(form) => form.on_valid(),
            None => Value::Null,
        }
    }

    /// The picked form's `on_invalid` result, or null when nothing usable was
    /// picked.
    fn on_invalid(&mut self) -> Value {
        match self.selected_index().and_then(|i| self.forms.get_mut(i)) {
            Some(form) => form.on_invalid(),
            None => Value::Null,
        }
    }
}

/// Builder for [`PickAForm`].
#[derive(Default)]
pub struct PickAFormBuilder {
    state: FormStateBuilder,
    forms: Vec<Box<dyn Form>>,
    manifest: Vec<(String, Option<usize>)>,
}

impl fmt::Debug for PickAFormBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PickAFormBuilder")
            .field("state", &self.state)
            .field("manifest", &self.manifest)
            .finish_non_exhaustive()
    }
}

impl PickAFormBuilder {
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

    /// Defaults to `"pick-a"`.
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

    pub fn actions(mut self, actions: impl IntoIterator<Item = FormAction>) -> Self {
        self.state.actions.extend(actions);
        self
    }

    /// Adds a label that owns no form.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.manifest.push((label.into(), None));
        self
    }

    pub fn form(mut self, label: impl Into<String>, form: impl Form + 'static) -> Self {
        self.manifest.push((label.into(), Some(self.forms.len())));
        self.forms.push(Box::new(form));
        self
    }

    pub fn forms<L>(mut self, forms: impl IntoIterator<Item = (L, Box<dyn Form>)>) -> Self
    where
        L: Into<String>,
    {
        for (label, form) in forms {
            self.manifest.push((label.into(), Some(self.forms.len())));
            self.forms.push(form);
        }
        self
    }

    /// # Errors
    ///
    /// Returns [`FieldworkError::ConfigurationError`] if the id is missing,
    /// if a form's label has an empty slug, or if two forms' labels share a
    /// slug.
    pub fn build(self) -> FieldworkResult<PickAForm> {
        let state = self.state.build("pick-a")?;

        let mut seen: Vec<String> = Vec::new();
        for (label, _) in self.manifest.iter().filter(|(_, index)| index.is_some()) {
            let slug = slugify(label);
            if slug.is_empty() {
                return Err(FieldworkError::ConfigurationError(format!(
                    "pick-a '{}' option '{label}' has no usable slug",
                    state.id
                )));
            }
            if seen.contains(&slug) {
                return Err(FieldworkError::ConfigurationError(format!(
                    "pick-a '{}' options share the slug '{slug}'",
                    state.id
                )));
            }
            seen.push(slug);
        }

        Ok(PickAForm {
            state,
            forms: self.forms,
            manifest: self.manifest,
            selected: None,
        })
    }
}
