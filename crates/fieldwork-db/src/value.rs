//! The value carried by fields, choices, and filter operands.
//!
//! [`Value`] is what a field starts from (its initial value), what it
//! produces once valid (validated data), and what filter predicates compare
//! against. Rows are ordered with [`Value::natural_cmp`].

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A backend-agnostic field value.
///
/// ```
/// use fieldwork_db::value::Value;
///
/// assert_eq!(Value::from(42_i64), Value::Int(42));
/// assert_eq!(Value::from(Some("hi")), Value::String("hi".into()));
/// assert_eq!(Value::from(None::<i64>), Value::Null);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    DateTimeTz(DateTime<Utc>),
    Time(NaiveTime),
    Uuid(Uuid),
    Json(serde_json::Value),
    /// Multiple-choice data and repeated submissions.
    List(Vec<Value>),
}

macro_rules! value_from {
    ($($source:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$source> for Value {
                fn from(inner: $source) -> Self {
                    Self::$variant(inner.into())
                }
            }
        )*
    };
}

value_from! {
    bool => Bool,
    i32 => Int,
    i64 => Int,
    u32 => Int,
    f64 => Float,
    String => String,
    &str => String,
    NaiveDate => Date,
    NaiveDateTime => DateTime,
    DateTime<Utc> => DateTimeTz,
    NaiveTime => Time,
    Uuid => Uuid,
    serde_json::Value => Json,
    Vec<Value> => List,
}

/// `()` is "no operand".
impl From<()> for Value {
    fn from((): ()) -> Self {
        Self::Null
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(inner: Option<T>) -> Self {
        inner.map_or(Self::Null, Into::into)
    }
}

/// `Null` is the empty string. Lists render as `[a, b]`; dates and times in
/// ISO form.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(v) => f.write_str(v),
            Self::Date(v) => write!(f, "{v}"),
            Self::DateTime(v) => write!(f, "{v}"),
            Self::DateTimeTz(v) => write!(f, "{v}"),
            Self::Time(v) => write!(f, "{v}"),
            Self::Uuid(v) => write!(f, "{v}"),
            Self::Json(v) => write!(f, "{v}"),
            Self::List(items) => {
                f.write_str("[")?;
                let mut sep = "";
                for item in items {
                    write!(f, "{sep}{item}")?;
                    sep = ", ";
                }
                f.write_str("]")
            }
        }
    }
}

impl Value {
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub const fn as_bool(&self) -> Option<bool> {
        if let Self::Bool(v) = self {
            Some(*v)
        } else {
            None
        }
    }

    /// The integer held, or parsed from a base-10 string.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::String(text) => text.trim().parse().ok(),
            _ => None,
        }
    }

    pub const fn as_float(&self) -> Option<f64> {
        if let Self::Float(v) = self {
            Some(*v)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        if let Self::String(text) = self {
            Some(text)
        } else {
            None
        }
    }

    pub fn as_list(&self) -> Option<&[Self]> {
        if let Self::List(items) = self {
            Some(items)
        } else {
            None
        }
    }

    /// Any int, float, or numeric string as a float.
    #[allow(clippy::cast_precision_loss)]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            Self::String(text) => text.trim().parse().ok(),
            _ => None,
        }
    }

    /// Falsy: `Null`, `false`, zero, `""`, `"0"`, an empty list, and JSON
    /// `null`/`false`. Everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(v) => *v,
            Self::Int(v) => *v != 0,
            Self::Float(v) => *v != 0.0,
            Self::String(text) => !text.is_empty() && text != "0",
            Self::List(items) => !items.is_empty(),
            Self::Json(json) => {
                !matches!(json, serde_json::Value::Null | serde_json::Value::Bool(false))
            }
            _ => true,
        }
    }

    /// Total order used to sort rows.
    ///
    /// Values are first grouped by kind: `Null`, then numbers (ints, floats,
    /// and numeric strings), booleans, dates, naive date-times, UTC
    /// date-times, times, lists, and finally everything else by its text.
    /// Numbers compare numerically with `NaN` last, so `"9" < "10" < "1a"`.
    /// Lists compare element-wise.
    pub fn natural_cmp(&self, other: &Self) -> Ordering {
        self.sort_rank()
            .cmp(&other.sort_rank())
            .then_with(|| self.cmp_same_rank(other))
    }

    fn sort_rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Int(_) | Self::Float(_) => 1,
            Self::String(_) if self.as_number().is_some() => 1,
            Self::Bool(_) => 2,
            Self::Date(_) => 3,
            Self::DateTime(_) => 4,
            Self::DateTimeTz(_) => 5,
            Self::Time(_) => 6,
            Self::List(_) => 7,
            Self::String(_) | Self::Uuid(_) | Self::Json(_) => 8,
        }
    }

    /// Ints tie-break float equality exactly, so `2^53` and `2^53 + 1`
    /// stay ordered.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn numeric_key(&self) -> Option<(f64, i64)> {
        match self {
            Self::Int(v) => Some((*v as f64, *v)),
            _ => self.as_number().map(|v| (v, v as i64)),
        }
    }

    fn cmp_same_rank(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Date(a), Self::Date(b)) => a.cmp(b),
            (Self::DateTime(a), Self::DateTime(b)) => a.cmp(b),
            (Self::DateTimeTz(a), Self::DateTimeTz(b)) => a.cmp(b),
            (Self::Time(a), Self::Time(b)) => a.cmp(b),
            (Self::List(a), Self::List(b)) => {
                for (x, y) in a.iter().zip(b) {
                    let order = x.natural_cmp(y);
                    if order.is_ne() {
                        return order;
                    }
                }
                a.len().cmp(&b.len())
            }
            _ => match (self.numeric_key(), other.numeric_key()) {
                (Some((a, ai)), Some((b, bi))) => a.total_cmp(&b).then(ai.cmp(&bi)),
                _ => self.to_string().cmp(&other.to_string()),
            },
        }
    }
}
