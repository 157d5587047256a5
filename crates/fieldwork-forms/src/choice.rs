//! Choices offered by choice and multiple-choice fields.

use fieldwork_core::utils::text::slugify;
use fieldwork_db::Value;

/// An immutable (alias, value) pair.
///
/// The alias is what a browser submits; the value is what validation hands
/// back as the field's validated data.
///
/// # Examples
///
/// ```
/// use fieldwork_db::Value;
/// use fieldwork_forms::Choice;
///
/// let choice = Choice::from_value("Sea Green");
/// assert_eq!(choice.alias(), "sea-green");
/// assert_eq!(choice.value(), &Value::from("Sea Green"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    alias: String,
    value: Value,
}

impl Choice {
    /// Creates a choice with an explicit alias.
    pub fn new(alias: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            alias: alias.into(),
            value: value.into(),
        }
    }

    /// Creates a choice whose alias is the slug of the value's text.
    pub fn from_value(value: impl Into<Value>) -> Self {
        let value = value.into();
        Self {
            alias: slugify(&value.to_string()),
            value,
        }
    }

    /// The wire-level key.
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// The semantic payload.
    pub const fn value(&self) -> &Value {
        &self.value
    }
}
