//! Fields and their endogenous validation.
//!
//! A [`Field`] is the atomic unit of submitted data. Its wire name, the
//! slug, is derived on every call from its prefix chain, its slugified
//! label, and its suffix chain, so a field moved into a repeated row picks
//! up its new name without any bookkeeping.
//!
//! [`Field::validate`] checks the only two things a field can know on its
//! own: whether a required value was submitted, and whether a submitted
//! choice alias exists. Everything richer is an exogenous validator run by
//! the owning form (see [`crate::validation`]).

use indexmap::IndexMap;

use fieldwork_core::utils::text::slugify;
use fieldwork_core::{FieldworkError, FieldworkResult, SETTINGS};
use fieldwork_db::Value;
use fieldwork_http::QueryDict;

use crate::choice::Choice;

/// The type tag of a field.
///
/// The tag decides how a field validates and is the renderer's hint for the
/// control to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldType {
    /// Read-only text; the initial value is displayed, not edited.
    Literal,
    /// A single-line text input.
    Text,
    /// A multi-line text input.
    Textarea,
    /// A checkbox.
    Boolean,
    /// Exactly one of the configured choices.
    Choice,
    /// Any subset of the configured choices.
    MultipleChoice,
    /// A heading between groups of fields.
    SectionLabel,
    /// Pre-rendered markup.
    Html,
    /// A date input.
    Date,
    /// A date-and-time input.
    DateTime,
    /// A record's primary key.
    PrimaryKey,
    /// A reference to another record.
    ForeignKey,
    /// A record's optimistic-locking version.
    Version,
}

impl FieldType {
    /// The tag as the renderer sees it.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Literal => "literal",
            Self::Text => "text",
            Self::Textarea => "textarea",
            Self::Boolean => "boolean",
            Self::Choice => "choice",
            Self::MultipleChoice => "multiple-choice",
            Self::SectionLabel => "section-label",
            Self::Html => "html",
            Self::Date => "date",
            Self::DateTime => "datetime",
            Self::PrimaryKey => "primary-key",
            Self::ForeignKey => "foreign-key",
            Self::Version => "version",
        }
    }

    /// Returns `true` for types that validate against a choice set.
    pub const fn needs_choices(self) -> bool {
        matches!(self, Self::Choice | Self::MultipleChoice)
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a field, form, or table form stands after its latest validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Validity {
    /// No validation pass has run yet.
    #[default]
    Unvalidated,
    /// The latest pass added no errors.
    Valid,
    /// The latest pass added at least one error.
    Invalid,
}

/// An atomic, validatable unit of submitted data.
///
/// Build one with [`FieldBuilder`]:
///
/// ```
/// use fieldwork_forms::{Field, FieldType, Validity};
/// use fieldwork_http::QueryDict;
///
/// let mut field = Field::builder()
///     .field_type(FieldType::Text)
///     .label("First Name")
///     .build()
///     .unwrap();
/// assert_eq!(field.slug(), "first-name");
///
/// field.validate(&QueryDict::parse("first-name=Ada"));
/// assert_eq!(field.validity(), Validity::Valid);
/// assert_eq!(field.validated_data().unwrap().to_string(), "Ada");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    field_type: FieldType,
    label: String,
    initial: Value,
    required: bool,
    choices: Vec<Choice>,
    size: Option<usize>,
    helptext: String,
    placeholder: String,
    prefixes: Vec<String>,
    suffixes: Vec<String>,
    classes: Vec<String>,
    data: IndexMap<String, String>,
    submitted: Vec<String>,
    validated_data: Option<Value>,
    errors: Vec<String>,
    validity: Validity,
}

impl Field {
    /// Starts building a field.
    pub fn builder() -> FieldBuilder {
        FieldBuilder::new()
    }

    // ── Identity ─────────────────────────────────────────────────────

    /// The wire-level name: prefixes, slugified label, and suffixes joined
    /// with `-`, empty segments skipped.
    pub fn slug(&self) -> String {
        let label = slugify(&self.label);
        self.prefixes
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(label.as_str()))
            .chain(self.suffixes.iter().map(String::as_str))
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>()
            .join("-")
    }

    /// The render id, identical to the slug.
    pub fn id(&self) -> String {
        self.slug()
    }

    /// Prefix segments, outermost first.
    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    /// Suffix segments in the order they were added.
    pub fn suffixes(&self) -> &[String] {
        &self.suffixes
    }

    /// Adds a prefix segment in front of the existing ones.
    pub fn add_prefix(&mut self, prefix: impl Into<String>) -> &mut Self {
        self.prefixes.insert(0, prefix.into());
        self
    }

    /// Adds a suffix segment after the existing ones.
    pub fn add_suffix(&mut self, suffix: impl Into<String>) -> &mut Self {
        self.suffixes.push(suffix.into());
        self
    }

    // ── Configuration ────────────────────────────────────────────────

    pub const fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn set_type(&mut self, field_type: FieldType) -> &mut Self {
        self.field_type = field_type;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) -> &mut Self {
        self.label = label.into();
        self
    }

    /// The value shown before the user edits the field, or the value
    /// re-displayed after a failed submission.
    pub const fn initial(&self) -> &Value {
        &self.initial
    }

    pub fn set_initial(&mut self, initial: impl Into<Value>) -> &mut Self {
        self.initial = initial.into();
        self
    }

    pub const fn is_required(&self) -> bool {
        self.required
    }

    pub fn set_required(&mut self, required: bool) -> &mut Self {
        self.required = required;
        self
    }

    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    pub fn set_choices(&mut self, choices: Vec<Choice>) -> &mut Self {
        self.choices = choices;
        self
    }

    pub const fn size(&self) -> Option<usize> {
        self.size
    }

    pub fn set_size(&mut self, size: usize) -> &mut Self {
        self.size = Some(size);
        self
    }

    pub fn helptext(&self) -> &str {
        &self.helptext
    }

    pub fn set_helptext(&mut self, helptext: impl Into<String>) -> &mut Self {
        self.helptext = helptext.into();
        self
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn set_placeholder(&mut self, placeholder: impl Into<String>) -> &mut Self {
        self.placeholder = placeholder.into();
        self
    }

    /// CSS classes for the renderer.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// `data-*` attributes for the renderer.
    pub const fn data(&self) -> &IndexMap<String, String> {
        &self.data
    }

    // ── Validation state ─────────────────────────────────────────────

    /// Runs endogenous validation against `params`.
    ///
    /// Errors and validated data from an earlier pass are discarded first,
    /// so repeating the call on unchanged input gives the same result.
    pub fn validate(&mut self, params: &QueryDict) {
        self.remove_errors();
        self.validated_data = None;

        let slug = self.slug();
        self.submitted = params
            .submitted(&slug)
            .into_iter()
            .map(str::to_string)
            .collect();

        let settings = SETTINGS.current();

        if self.submitted.is_empty() {
            if self.required {
                self.errors.push(settings.required_message.clone());
            }
        } else {
            match self.field_type {
                FieldType::Choice => {
                    let alias = self.submitted.last().map_or("", String::as_str);
                    match self.choice_by_alias(alias) {
                        Some(value) => self.validated_data = Some(value),
                        None => self.errors.push(settings.invalid_choice_message.clone()),
                    }
                }
                FieldType::MultipleChoice => {
                    let resolved: Option<Vec<Value>> = self
                        .submitted
                        .iter()
                        .map(|alias| self.choice_by_alias(alias))
                        .collect();
                    match resolved {
                        Some(values) => self.validated_data = Some(Value::List(values)),
                        None => self.errors.push(settings.invalid_choice_message.clone()),
                    }
                }
                _ => self.validated_data = Some(submitted_value(&self.submitted)),
            }
        }

        self.validity = if self.errors.is_empty() {
            Validity::Valid
        } else {
            Validity::Invalid
        };
        tracing::trace!(slug = %slug, validity = ?self.validity, "field validated");
    }

    fn choice_by_alias(&self, alias: &str) -> Option<Value> {
        self.choices
            .iter()
            .find(|choice| choice.alias() == alias)
            .map(|choice| choice.value().clone())
    }

    pub const fn validity(&self) -> Validity {
        self.validity
    }

    /// Returns `true` only after a validation pass that left no errors.
    pub fn is_valid(&self) -> bool {
        self.validity == Validity::Valid
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Appends an error and marks the field invalid.
    pub fn add_error(&mut self, error: impl Into<String>) -> &mut Self {
        self.errors.push(error.into());
        self.validity = Validity::Invalid;
        self
    }

    /// Clears the error list.
    pub fn remove_errors(&mut self) -> &mut Self {
        self.errors.clear();
        self
    }

    pub const fn validated_data(&self) -> Option<&Value> {
        self.validated_data.as_ref()
    }

    pub fn set_validated_data(&mut self, data: impl Into<Value>) -> &mut Self {
        self.validated_data = Some(data.into());
        self
    }

    pub const fn has_validated_data(&self) -> bool {
        self.validated_data.is_some()
    }

    /// The non-empty values found under the slug in the latest pass.
    pub fn submitted(&self) -> &[String] {
        &self.submitted
    }

    /// Returns `true` if the latest pass found a non-empty value.
    pub fn was_submitted(&self) -> bool {
        !self.submitted.is_empty()
    }
}

/// One submitted value stays a string; several become a list of strings.
pub(crate) fn submitted_value(values: &[String]) -> Value {
    match values {
        [single] => Value::String(single.clone()),
        many => Value::List(many.iter().map(|v| Value::String(v.clone())).collect()),
    }
}

/// A one-shot builder for [`Field`].
///
/// Type and label are mandatory; every other attribute has a default.
#[derive(Debug, Default)]
pub struct FieldBuilder {
    field_type: Option<FieldType>,
    label: Option<String>,
    initial: Value,
    required: bool,
    choices: Vec<Choice>,
    size: Option<usize>,
    helptext: String,
    placeholder: String,
    prefixes: Vec<String>,
    suffixes: Vec<String>,
    classes: Vec<String>,
    data: IndexMap<String, String>,
}

impl FieldBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field_type(mut self, field_type: FieldType) -> Self {
        self.field_type = Some(field_type);
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn initial(mut self, initial: impl Into<Value>) -> Self {
        self.initial = initial.into();
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn choices(mut self, choices: Vec<Choice>) -> Self {
        self.choices = choices;
        self
    }

    pub fn choice(mut self, choice: Choice) -> Self {
        self.choices.push(choice);
        self
    }

    pub fn size(mut self, size: usize) -> Self {
        self.size = Some(size);
        self
    }

    pub fn helptext(mut self, helptext: impl Into<String>) -> Self {
        self.helptext = helptext.into();
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Adds a prefix segment in front of any added so far.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefixes.insert(0, prefix.into());
        self
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffixes.push(suffix.into());
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

    /// Produces the field.
    ///
    /// # Errors
    ///
    /// Returns [`FieldworkError::ConfigurationError`] if the type or label was
    /// never set, or if a choice type has no choices.
    pub fn build(self) -> FieldworkResult<Field> {
        let field_type = self.field_type.ok_or_else(|| {
            FieldworkError::ConfigurationError("a field needs a type: call .field_type()".into())
        })?;
        let label = self.label.ok_or_else(|| {
            FieldworkError::ConfigurationError("a field needs a label: call .label()".into())
        })?;
        if field_type.needs_choices() && self.choices.is_empty() {
            return Err(FieldworkError::ConfigurationError(format!(
                "{field_type} field '{label}' must include choices: call .choices()"
            )));
        }

        Ok(Field {
            field_type,
            label,
            initial: self.initial,
            required: self.required,
            choices: self.choices,
            size: self.size,
            helptext: self.helptext,
            placeholder: self.placeholder,
            prefixes: self.prefixes,
            suffixes: self.suffixes,
            classes: self.classes,
            data: self.data,
            submitted: Vec::new(),
            validated_data: None,
            errors: Vec::new(),
            validity: Validity::Unvalidated,
        })
    }
}
