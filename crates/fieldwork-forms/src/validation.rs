//! The validation cascade shared by forms and table forms.
//!
//! A pass runs in three steps:
//! 1. Endogenous: every field validates itself against the params.
//! 2. Exogenous: validators registered under a field name run against every
//!    field with that name, in registration order.
//! 3. Aggregate: any invalid visible field makes the owner invalid.
//!
//! Validators report problems only by mutating the field they are handed.

use std::fmt;

use indexmap::IndexMap;

use fieldwork_db::Value;
use fieldwork_http::QueryDict;

use crate::field_bearer::FieldBearer;
use crate::fields::Field;

/// What an exogenous validator can see besides the field itself.
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    form_id: &'a str,
    params: &'a QueryDict,
    data: &'a IndexMap<String, Option<Value>>,
}

impl<'a> ValidationContext<'a> {
    pub const fn new(
        form_id: &'a str,
        params: &'a QueryDict,
        data: &'a IndexMap<String, Option<Value>>,
    ) -> Self {
        Self {
            form_id,
            params,
            data,
        }
    }

    /// The id of the form running the validator.
    pub const fn form_id(&self) -> &'a str {
        self.form_id
    }

    /// The submission being validated.
    pub const fn params(&self) -> &'a QueryDict {
        self.params
    }

    /// Validated data of a sibling field, as it stood after endogenous
    /// validation. Siblings are the fields of the same form, or of the same
    /// row in a table form.
    pub fn validated(&self, name: &str) -> Option<&'a Value> {
        self.data.get(name).and_then(Option::as_ref)
    }
}

/// A cross-field or business-rule check.
pub type Validator = Box<dyn Fn(&mut Field, &ValidationContext<'_>)>;

/// Validators keyed by field name.
#[derive(Default)]
pub struct Validators {
    by_name: IndexMap<String, Vec<Validator>>,
}

impl fmt::Debug for Validators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.by_name.iter().map(|(name, list)| (name, list.len())))
            .finish()
    }
}

impl Validators {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<F>(&mut self, name: impl Into<String>, validator: F)
    where
        F: Fn(&mut Field, &ValidationContext<'_>) + 'static,
    {
        self.by_name
            .entry(name.into())
            .or_default()
            .push(Box::new(validator));
    }

    pub fn for_name(&self, name: &str) -> &[Validator] {
        self.by_name.get(name).map_or(&[], Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// Step 1: every field in `bearer` validates itself.
pub fn validate_fields(bearer: &mut FieldBearer, params: &QueryDict) {
    for (_, field) in bearer.fields_mut() {
        field.validate(params);
    }
}

/// Step 2: run the registered validators over `bearer`'s fields.
pub fn run_validators(
    bearer: &mut FieldBearer,
    validators: &Validators,
    form_id: &str,
    params: &QueryDict,
) {
    if validators.is_empty() {
        return;
    }
    let snapshot = bearer.validated_data();
    let context = ValidationContext::new(form_id, params, &snapshot);
    for (name, field) in bearer.fields_mut() {
        for validator in validators.for_name(name) {
            validator(&mut *field, &context);
        }
    }
}

/// Step 3: returns `true` if any visible field is invalid.
pub fn has_invalid_visible(bearer: &FieldBearer) -> bool {
    bearer
        .visible_fields()
        .into_iter()
        .any(|(_, field)| !field.is_valid())
}
