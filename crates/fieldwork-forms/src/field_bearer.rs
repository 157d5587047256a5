//! Named, nestable containers of fields.
//!
//! A [`FieldBearer`] owns an ordered map of fields and an ordered map of
//! child bearers. Most accessors work on the flattened view: own fields
//! first, then each child's flattened fields, in insertion order.
//!
//! Visibility composes downward. A name is hidden at one level if that
//! level lists it as hidden, or if that level has an explicit visible list
//! that omits it. A name hidden at any level is hidden overall.

use std::fmt;

use indexmap::IndexMap;

use fieldwork_core::{FieldworkError, FieldworkResult};
use fieldwork_db::Value;

use crate::choice::Choice;
use crate::fields::{Field, FieldType};

/// Callback run by [`FieldBearer::save`].
pub type SaveFn = Box<dyn Fn(&FieldBearer) -> Value>;

/// An ordered, named container of fields and nested bearers.
///
/// # Examples
///
/// ```
/// use fieldwork_forms::{Field, FieldBearer, FieldType};
///
/// let text = |label: &str| {
///     Field::builder().field_type(FieldType::Text).label(label).build().unwrap()
/// };
///
/// let address = FieldBearer::builder()
///     .field("street", text("Street"))
///     .field("city", text("City"))
///     .build()
///     .unwrap();
///
/// let person = FieldBearer::builder()
///     .field("name", text("Name"))
///     .field("id", text("Id"))
///     .hidden_field_names(["id"])
///     .field_bearer("address", address)
///     .build()
///     .unwrap();
///
/// assert_eq!(person.field_names(), vec!["name", "id", "street", "city"]);
/// assert_eq!(person.visible_field_names(), vec!["name", "street", "city"]);
/// assert_eq!(person.hidden_field_names(), vec!["id"]);
/// ```
pub struct FieldBearer {
    fields: IndexMap<String, Field>,
    field_bearers: IndexMap<String, FieldBearer>,
    visible_names: Option<Vec<String>>,
    hidden_names: Vec<String>,
    save_fn: Option<SaveFn>,
}

impl fmt::Debug for FieldBearer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldBearer")
            .field("fields", &self.fields)
            .field("field_bearers", &self.field_bearers)
            .field("visible_names", &self.visible_names)
            .field("hidden_names", &self.hidden_names)
            .field("has_save_fn", &self.save_fn.is_some())
            .finish()
    }
}

impl FieldBearer {
    /// Starts building a field bearer.
    pub fn builder() -> FieldBearerBuilder {
        FieldBearerBuilder::new()
    }

    // ── Flattened fields ─────────────────────────────────────────────

    /// Every field, own fields first, then each child's in turn.
    pub fn fields(&self) -> Vec<(&str, &Field)> {
        self.classified()
            .into_iter()
            .map(|(name, field, _)| (name, field))
            .collect()
    }

    /// Mutable access to every field, in the same order as [`fields`](Self::fields).
    pub fn fields_mut(&mut self) -> Vec<(&str, &mut Field)> {
        let mut out: Vec<(&str, &mut Field)> = self
            .fields
            .iter_mut()
            .map(|(name, field)| (name.as_str(), field))
            .collect();
        for child in self.field_bearers.values_mut() {
            out.extend(child.fields_mut());
        }
        out
    }

    /// Field names in flattened order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields().into_iter().map(|(name, _)| name).collect()
    }

    /// This bearer's own fields, excluding those of children.
    pub const fn own_fields(&self) -> &IndexMap<String, Field> {
        &self.fields
    }

    /// Returns `true` if neither this bearer nor any child holds a field.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.field_bearers.values().all(Self::is_empty)
    }

    /// Looks a field up by name anywhere in the tree.
    pub fn field_by_name(&self, name: &str) -> FieldworkResult<&Field> {
        self.find_field(name)
            .ok_or_else(|| FieldworkError::NotFound(format!("field '{name}'")))
    }

    /// Looks a field up by name anywhere in the tree, for mutation.
    pub fn field_by_name_mut(&mut self, name: &str) -> FieldworkResult<&mut Field> {
        self.find_field_mut(name)
            .ok_or_else(|| FieldworkError::NotFound(format!("field '{name}'")))
    }

    fn find_field(&self, name: &str) -> Option<&Field> {
        self.fields
            .get(name)
            .or_else(|| self.field_bearers.values().find_map(|child| child.find_field(name)))
    }

    fn find_field_mut(&mut self, name: &str) -> Option<&mut Field> {
        if let Some(field) = self.fields.get_mut(name) {
            return Some(field);
        }
        self.field_bearers
            .values_mut()
            .find_map(|child| child.find_field_mut(name))
    }

    /// The name under which this exact field instance is stored.
    ///
    /// Matching is by identity, so an equal field owned elsewhere is not
    /// found.
    pub fn name_by_field(&self, field: &Field) -> FieldworkResult<&str> {
        self.fields()
            .into_iter()
            .find(|(_, candidate)| std::ptr::eq(*candidate, field))
            .map(|(name, _)| name)
            .ok_or_else(|| {
                FieldworkError::NotFound(format!("field '{}' in this bearer", field.label()))
            })
    }

    // ── Visibility ───────────────────────────────────────────────────

    fn hidden_here(&self, name: &str) -> bool {
        self.hidden_names.iter().any(|n| n == name)
            || self
                .visible_names
                .as_ref()
                .is_some_and(|visible| !visible.iter().any(|n| n == name))
    }

    /// Flattened fields tagged with whether they are hidden.
    fn classified(&self) -> Vec<(&str, &Field, bool)> {
        let mut out: Vec<(&str, &Field, bool)> = self
            .fields
            .iter()
            .map(|(name, field)| (name.as_str(), field, self.hidden_here(name)))
            .collect();
        for child in self.field_bearers.values() {
            out.extend(
                child
                    .classified()
                    .into_iter()
                    .map(|(name, field, hidden)| (name, field, hidden || self.hidden_here(name))),
            );
        }
        out
    }

    pub fn visible_fields(&self) -> Vec<(&str, &Field)> {
        self.classified()
            .into_iter()
            .filter(|(_, _, hidden)| !hidden)
            .map(|(name, field, _)| (name, field))
            .collect()
    }

    pub fn hidden_fields(&self) -> Vec<(&str, &Field)> {
        self.classified()
            .into_iter()
            .filter(|(_, _, hidden)| *hidden)
            .map(|(name, field, _)| (name, field))
            .collect()
    }

    pub fn visible_field_names(&self) -> Vec<&str> {
        self.visible_fields().into_iter().map(|(name, _)| name).collect()
    }

    pub fn hidden_field_names(&self) -> Vec<&str> {
        self.hidden_fields().into_iter().map(|(name, _)| name).collect()
    }

    /// Labels of the visible fields, for column headings.
    pub fn visible_field_labels(&self) -> Vec<&str> {
        self.visible_fields()
            .into_iter()
            .map(|(_, field)| field.label())
            .collect()
    }

    /// Returns `true` if `name` is a known field that is hidden at some level.
    pub fn is_hidden(&self, name: &str) -> bool {
        self.classified()
            .into_iter()
            .any(|(candidate, _, hidden)| candidate == name && hidden)
    }

    // ── Nested bearers ───────────────────────────────────────────────

    /// Direct children, in insertion order.
    pub const fn field_bearers(&self) -> &IndexMap<String, FieldBearer> {
        &self.field_bearers
    }

    /// Looks a nested bearer up by name, searching children before
    /// grandchildren.
    pub fn field_bearer_by_name(&self, name: &str) -> FieldworkResult<&Self> {
        self.find_bearer(name)
            .ok_or_else(|| FieldworkError::NotFound(format!("field bearer '{name}'")))
    }

    fn find_bearer(&self, name: &str) -> Option<&Self> {
        self.field_bearers.get(name).or_else(|| {
            self.field_bearers
                .values()
                .find_map(|child| child.find_bearer(name))
        })
    }

    // ── Data ─────────────────────────────────────────────────────────

    /// A snapshot of every field's validated data, keyed by name.
    pub fn validated_data(&self) -> IndexMap<String, Option<Value>> {
        self.fields()
            .into_iter()
            .map(|(name, field)| (name.to_string(), field.validated_data().cloned()))
            .collect()
    }

    /// Runs this bearer's save callback, then every child's `save`.
    ///
    /// Only this bearer's own result is returned; child results are
    /// discarded. Without a callback the result is [`Value::Null`].
    pub fn save(&self) -> Value {
        let result = self.save_fn.as_ref().map_or(Value::Null, |save| save(self));
        for child in self.field_bearers.values() {
            child.save();
        }
        result
    }
}

enum FieldEdit {
    Initial(Value),
    Type(FieldType),
    Label(String),
    Helptext(String),
    Placeholder(String),
    Choices(Vec<Choice>),
}

/// Builder for [`FieldBearer`].
///
/// Field edits such as [`initial_field_value`](Self::initial_field_value)
/// are applied at [`build`](Self::build), after every field and child has
/// been added, so they may target fields of nested bearers.
#[derive(Default)]
pub struct FieldBearerBuilder {
    fields: Vec<(String, Field)>,
    field_bearers: Vec<(String, FieldBearer)>,
    visible_names: Option<Vec<String>>,
    hidden_names: Vec<String>,
    save_fn: Option<SaveFn>,
    make_literal: bool,
    edits: Vec<(String, FieldEdit)>,
}

impl fmt::Debug for FieldBearerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldBearerBuilder")
            .field("fields", &self.fields)
            .field("field_bearers", &self.field_bearers)
            .field("visible_names", &self.visible_names)
            .field("hidden_names", &self.hidden_names)
            .field("make_literal", &self.make_literal)
            .finish_non_exhaustive()
    }
}

impl FieldBearerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, field: Field) -> Self {
        self.fields.push((name.into(), field));
        self
    }

    pub fn fields<N, I>(mut self, fields: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, Field)>,
    {
        self.fields
            .extend(fields.into_iter().map(|(name, field)| (name.into(), field)));
        self
    }

    pub fn field_bearer(mut self, name: impl Into<String>, bearer: FieldBearer) -> Self {
        self.field_bearers.push((name.into(), bearer));
        self
    }

    /// Makes every field not listed here hidden at this level.
    pub fn visible_field_names<N, I>(mut self, names: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = N>,
    {
        self.visible_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn hidden_field_names<N, I>(mut self, names: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = N>,
    {
        self.hidden_names.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn save_fn<F>(mut self, save: F) -> Self
    where
        F: Fn(&FieldBearer) -> Value + 'static,
    {
        self.save_fn = Some(Box::new(save));
        self
    }

    /// Turns every field except section labels into a literal.
    pub fn make_literal(mut self) -> Self {
        self.make_literal = true;
        self
    }

    pub fn initial_field_value(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.edits.push((name.into(), FieldEdit::Initial(value.into())));
        self
    }

    pub fn field_type(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.edits.push((name.into(), FieldEdit::Type(field_type)));
        self
    }

    pub fn field_label(mut self, name: impl Into<String>, label: impl Into<String>) -> Self {
        self.edits.push((name.into(), FieldEdit::Label(label.into())));
        self
    }

    pub fn field_helptext(mut self, name: impl Into<String>, helptext: impl Into<String>) -> Self {
        self.edits.push((name.into(), FieldEdit::Helptext(helptext.into())));
        self
    }

    pub fn field_placeholder(
        mut self,
        name: impl Into<String>,
        placeholder: impl Into<String>,
    ) -> Self {
        self.edits
            .push((name.into(), FieldEdit::Placeholder(placeholder.into())));
        self
    }

    /// Replaces a field's choices and switches it to [`FieldType::Choice`].
    pub fn field_choices(mut self, name: impl Into<String>, choices: Vec<Choice>) -> Self {
        self.edits.push((name.into(), FieldEdit::Choices(choices)));
        self
    }

    /// Assembles the bearer and applies queued field edits.
    ///
    /// # Errors
    ///
    /// Returns [`FieldworkError::ConfigurationError`] if a name occurs twice
    /// in the flattened tree, if a visible or hidden name matches no field,
    /// or if an edit leaves a choice-typed field without choices. Returns [`FieldworkError::NotFound`] if a field edit names an unknown
    /// field.
    pub fn build(self) -> FieldworkResult<FieldBearer> {
        let mut seen: Vec<String> = Vec::new();
        let mut claim = |name: &str| {
            if seen.iter().any(|n| n == name) {
                return Err(FieldworkError::ConfigurationError(format!(
                    "field name '{name}' is used more than once"
                )));
            }
            seen.push(name.to_string());
            Ok(())
        };

        for (name, _) in &self.fields {
            claim(name)?;
        }
        for (_, child) in &self.field_bearers {
            for name in child.field_names() {
                claim(name)?;
            }
        }

        let mut bearer = FieldBearer {
            fields: self.fields.into_iter().collect(),
            field_bearers: self.field_bearers.into_iter().collect(),
            visible_names: self.visible_names,
            hidden_names: self.hidden_names,
            save_fn: self.save_fn,
        };

        let known = bearer.field_names();
        let listed = bearer
            .visible_names
            .iter()
            .flatten()
            .chain(&bearer.hidden_names);
        for name in listed {
            if !known.contains(&name.as_str()) {
                return Err(FieldworkError::ConfigurationError(format!(
                    "visibility list names unknown field '{name}'"
                )));
            }
        }

        if self.make_literal {
            for (_, field) in bearer.fields_mut() {
                if field.field_type() != FieldType::SectionLabel {
                    field.set_type(FieldType::Literal);
                }
            }
        }

        for (name, edit) in self.edits {
            let field = bearer.field_by_name_mut(&name)?;
            match edit {
                FieldEdit::Initial(value) => field.set_initial(value),
                FieldEdit::Type(field_type) => field.set_type(field_type),
                FieldEdit::Label(label) => field.set_label(label),
                FieldEdit::Helptext(helptext) => field.set_helptext(helptext),
                FieldEdit::Placeholder(placeholder) => field.set_placeholder(placeholder),
                FieldEdit::Choices(choices) => {
                    field.set_choices(choices).set_type(FieldType::Choice)
                }
            };
        }

        if let Some((name, field)) = bearer
            .fields()
            .into_iter()
            .find(|(_, field)| field.field_type().needs_choices() && field.choices().is_empty())
        {
            return Err(FieldworkError::ConfigurationError(format!(
                "{} field '{name}' has no choices after its edits were applied",
                field.field_type()
            )));
        }

        Ok(bearer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;
    use std::rc::Rc;

    fn literal(label: &str) -> Field {
        Field::builder()
            .field_type(FieldType::Literal)
            .label(label)
            .build()
            .unwrap()
    }

    fn nested() -> FieldBearer {
        let inner = FieldBearer::builder()
            .field("field2", literal("Second"))
            .field("field3", literal("Third"))
            .build()
            .unwrap();
        let middle = FieldBearer::builder()
            .field_bearer("inner", inner)
            .build()
            .unwrap();
        FieldBearer::builder()
            .field("field1", literal("First"))
            .field_bearer("middle", middle)
            .build()
            .unwrap()
    }

    #[test]
    fn test_fields_flatten_own_first() {
        let bearer = nested();
        assert_eq!(bearer.field_names(), vec!["field1", "field2", "field3"]);
        assert_eq!(bearer.own_fields().len(), 1);
        assert!(!bearer.is_empty());
    }

    #[test]
    fn test_field_by_name_round_trip() {
        let bearer = nested();
        for name in ["field1", "field2", "field3"] {
            let field = bearer.field_by_name(name).unwrap();
            assert_eq!(bearer.name_by_field(field).unwrap(), name);
        }
        assert_eq!(bearer.field_by_name("field3").unwrap().label(), "Third");
    }

    #[test]
    fn test_unknown_name_is_not_found() {
        let mut bearer = nested();
        assert!(bearer.field_by_name("nope").unwrap_err().is_not_found());
        assert!(bearer.field_by_name_mut("nope").unwrap_err().is_not_found());
        assert!(bearer.field_bearer_by_name("nope").unwrap_err().is_not_found());
    }

    #[test]
    fn test_name_by_field_uses_identity() {
        let bearer = nested();
        let lookalike = literal("First");
        assert_eq!(&lookalike, bearer.field_by_name("field1").unwrap());
        assert!(bearer.name_by_field(&lookalike).unwrap_err().is_not_found());
    }

    #[test]
    fn test_field_by_name_mut_reaches_children() {
        let mut bearer = nested();
        bearer.field_by_name_mut("field3").unwrap().set_label("Changed");
        assert_eq!(bearer.field_by_name("field3").unwrap().label(), "Changed");
    }

    #[test]
    fn test_field_bearer_by_name_searches_depth() {
        let bearer = nested();
        assert_eq!(bearer.field_bearers().len(), 1);
        let inner = bearer.field_bearer_by_name("inner").unwrap();
        assert_eq!(inner.field_names(), vec!["field2", "field3"]);
    }

    #[test]
    fn test_three_visible_one_hidden() {
        let child = FieldBearer::builder()
            .field("c", literal("C"))
            .field("d", literal("D"))
            .build()
            .unwrap();
        let bearer = FieldBearer::builder()
            .field("a", literal("A"))
            .field("b", literal("B"))
            .hidden_field_names(["b"])
            .field_bearer("child", child)
            .build()
            .unwrap();
        assert_eq!(bearer.visible_field_names(), vec!["a", "c", "d"]);
        assert_eq!(bearer.hidden_field_names(), vec!["b"]);
        assert_eq!(bearer.fields().len(), 4);
        assert_eq!(bearer.visible_field_labels(), vec!["A", "C", "D"]);
    }

    #[test]
    fn test_hidden_in_child_stays_hidden() {
        let child = FieldBearer::builder()
            .field("secret", literal("Secret"))
            .field("shown", literal("Shown"))
            .hidden_field_names(["secret"])
            .build()
            .unwrap();
        let bearer = FieldBearer::builder()
            .field_bearer("child", child)
            .build()
            .unwrap();
        assert!(bearer.is_hidden("secret"));
        assert_eq!(bearer.visible_field_names(), vec!["shown"]);
    }

    #[test]
    fn test_explicit_visible_list_hides_the_rest() {
        let child = FieldBearer::builder()
            .field("street", literal("Street"))
            .build()
            .unwrap();
        let bearer = FieldBearer::builder()
            .field("name", literal("Name"))
            .field("age", literal("Age"))
            .field_bearer("address", child)
            .visible_field_names(["name"])
            .build()
            .unwrap();
        assert_eq!(bearer.visible_field_names(), vec!["name"]);
        assert_eq!(bearer.hidden_field_names(), vec!["age", "street"]);
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let child = FieldBearer::builder()
            .field("name", literal("Name"))
            .build()
            .unwrap();
        let err = FieldBearer::builder()
            .field("name", literal("Other"))
            .field_bearer("child", child)
            .build()
            .unwrap_err();
        assert!(err.is_configuration());

        let err = FieldBearer::builder()
            .field("x", literal("X"))
            .field("x", literal("Y"))
            .build()
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_unknown_visibility_name_rejected() {
        let err = FieldBearer::builder()
            .field("a", literal("A"))
            .hidden_field_names(["b"])
            .build()
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_save_returns_only_own_result() {
        let child_calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&child_calls);
        let child = FieldBearer::builder()
            .field("c", literal("C"))
            .save_fn(move |_| {
                counter.set(counter.get() + 1);
                Value::from("child")
            })
            .build()
            .unwrap();
        let bearer = FieldBearer::builder()
            .field("p", literal("P"))
            .field_bearer("child", child)
            .save_fn(|_| Value::from("saved"))
            .build()
            .unwrap();
        assert_eq!(bearer.save(), Value::from("saved"));
        assert_eq!(child_calls.get(), 1);
    }

    #[test]
    fn test_save_without_callback_is_null_but_runs_children() {
        let ran = Rc::new(Cell::new(false));
        let flag = Rc::clone(&ran);
        let child = FieldBearer::builder()
            .field("c", literal("C"))
            .save_fn(move |_| {
                flag.set(true);
                Value::Null
            })
            .build()
            .unwrap();
        let bearer = FieldBearer::builder()
            .field_bearer("child", child)
            .build()
            .unwrap();
        assert_eq!(bearer.save(), Value::Null);
        assert!(ran.get());
    }

    #[test]
    fn test_make_literal_keeps_section_labels() {
        let bearer = FieldBearer::builder()
            .field(
                "label",
                Field::builder()
                    .field_type(FieldType::SectionLabel)
                    .label("Section")
                    .build()
                    .unwrap(),
            )
            .field(
                "flag",
                Field::builder()
                    .field_type(FieldType::Boolean)
                    .label("Flag")
                    .build()
                    .unwrap(),
            )
            .make_literal()
            .build()
            .unwrap();
        assert_eq!(
            bearer.field_by_name("label").unwrap().field_type(),
            FieldType::SectionLabel
        );
        assert_eq!(
            bearer.field_by_name("flag").unwrap().field_type(),
            FieldType::Literal
        );
    }

    #[test]
    fn test_field_edits_apply_at_build() {
        let bearer = FieldBearer::builder()
            .field("field1", literal("One"))
            .field("field2", literal("Two"))
            .initial_field_value("field1", "seed")
            .field_type("field1", FieldType::Boolean)
            .field_label("field1", "Uno")
            .field_helptext("field1", "help")
            .field_placeholder("field1", "hint")
            .field_choices("field2", vec![Choice::from_value(3), Choice::from_value(4)])
            .build()
            .unwrap();

        let one = bearer.field_by_name("field1").unwrap();
        assert_eq!(one.initial(), &Value::from("seed"));
        assert_eq!(one.field_type(), FieldType::Boolean);
        assert_eq!(one.label(), "Uno");
        assert_eq!(one.helptext(), "help");
        assert_eq!(one.placeholder(), "hint");

        let two = bearer.field_by_name("field2").unwrap();
        assert_eq!(two.field_type(), FieldType::Choice);
        assert_eq!(two.choices().len(), 2);
        assert_eq!(two.initial(), &Value::Null);
    }

    #[test]
    fn test_edits_cannot_leave_choice_field_empty() {
        let err = FieldBearer::builder()
            .field("size", literal("Size"))
            .field_type("size", FieldType::Choice)
            .build()
            .unwrap_err();
        assert!(err.is_configuration());

        let err = FieldBearer::builder()
            .field("sizes", literal("Sizes"))
            .field_type("sizes", FieldType::MultipleChoice)
            .build()
            .unwrap_err();
        assert!(err.is_configuration());

        let err = FieldBearer::builder()
            .field("size", literal("Size"))
            .field_choices("size", vec![])
            .build()
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_type_edit_with_choices_edit_builds() {
        let bearer = FieldBearer::builder()
            .field("size", literal("Size"))
            .field_type("size", FieldType::MultipleChoice)
            .field_choices("size", vec![Choice::from_value("s")])
            .field_type("size", FieldType::MultipleChoice)
            .build()
            .unwrap();
        let size = bearer.field_by_name("size").unwrap();
        assert_eq!(size.field_type(), FieldType::MultipleChoice);
        assert_eq!(size.choices().len(), 1);
    }

    #[test]
    fn test_field_edit_on_unknown_name_fails() {
        let err = FieldBearer::builder()
            .field("a", literal("A"))
            .field_label("b", "B")
            .build()
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_validated_data_snapshot() {
        let mut bearer = nested();
        bearer
            .field_by_name_mut("field2")
            .unwrap()
            .set_validated_data("x");
        let data = bearer.validated_data();
        assert_eq!(data.get("field1"), Some(&None));
        assert_eq!(data.get("field2"), Some(&Some(Value::from("x"))));
    }
}
