//! Single filter operations over rows.

use std::cmp::Ordering;

use fieldwork_core::{FieldworkError, FieldworkResult};
use fieldwork_db::Value;

use crate::row::Row;

/// What a [`FilterStatement`] does with its rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Condition {
    SortAsc,
    SortDesc,
    LessThan,
    GreaterThan,
    EqualTo,
    NotEqualTo,
    Contains,
    Truthy,
    Falsey,
    /// Criterion is the page size, control the 1-indexed page.
    PaginateBy,
}

impl Condition {
    const fn needs_criterion(self) -> bool {
        matches!(
            self,
            Self::LessThan | Self::GreaterThan | Self::EqualTo | Self::NotEqualTo | Self::Contains
        )
    }
}

/// One operation in a filter: a sort, a predicate, or a page slice.
///
/// The comparison value of a row is the initial value of its field named
/// `field_name`.
///
/// # Examples
///
/// ```
/// use fieldwork_forms::filter::{Condition, FilterStatement};
///
/// let stmt = FilterStatement::new("age", Condition::GreaterThan, 18, ()).unwrap();
/// assert_eq!(stmt.condition(), Condition::GreaterThan);
///
/// assert!(FilterStatement::new("age", Condition::GreaterThan, (), ()).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FilterStatement {
    field_name: String,
    condition: Condition,
    criterion: Value,
    control: Value,
}

impl FilterStatement {
    /// Creates a statement, checking its operands.
    ///
    /// # Errors
    ///
    /// Returns [`FieldworkError::ConfigurationError`] if a comparison or
    /// `Contains` has a null criterion, or if `PaginateBy` lacks a positive
    /// integer page size and page.
    pub fn new(
        field_name: impl Into<String>,
        condition: Condition,
        criterion: impl Into<Value>,
        control: impl Into<Value>,
    ) -> FieldworkResult<Self> {
        let stmt = Self {
            field_name: field_name.into(),
            condition,
            criterion: criterion.into(),
            control: control.into(),
        };

        if condition.needs_criterion() && stmt.criterion.is_null() {
            return Err(FieldworkError::ConfigurationError(format!(
                "{condition:?} on '{}' needs a criterion",
                stmt.field_name
            )));
        }
        if condition == Condition::PaginateBy && stmt.page_window().is_none() {
            return Err(FieldworkError::ConfigurationError(format!(
                "PaginateBy needs a positive page size and page, got {:?} and {:?}",
                stmt.criterion, stmt.control
            )));
        }
        Ok(stmt)
    }

    pub fn sort_asc(field_name: impl Into<String>) -> Self {
        Self::unchecked(field_name.into(), Condition::SortAsc)
    }

    pub fn sort_desc(field_name: impl Into<String>) -> Self {
        Self::unchecked(field_name.into(), Condition::SortDesc)
    }

    /// Keeps rows whose value coerces to `true`.
    pub fn truthy(field_name: impl Into<String>) -> Self {
        Self::unchecked(field_name.into(), Condition::Truthy)
    }

    pub fn falsey(field_name: impl Into<String>) -> Self {
        Self::unchecked(field_name.into(), Condition::Falsey)
    }

    /// Keeps page `page` (1-indexed) of `per_page` rows.
    ///
    /// # Errors
    ///
    /// Returns [`FieldworkError::ConfigurationError`] if either number is zero.
    pub fn paginate_by(per_page: usize, page: usize) -> FieldworkResult<Self> {
        Self::new(
            "",
            Condition::PaginateBy,
            i64::try_from(per_page).unwrap_or(i64::MAX),
            i64::try_from(page).unwrap_or(i64::MAX),
        )
    }

    const fn unchecked(field_name: String, condition: Condition) -> Self {
        Self {
            field_name,
            condition,
            criterion: Value::Null,
            control: Value::Null,
        }
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub const fn condition(&self) -> Condition {
        self.condition
    }

    pub const fn criterion(&self) -> &Value {
        &self.criterion
    }

    pub const fn control(&self) -> &Value {
        &self.control
    }

    /// Page size and page number, when both are positive integers.
    pub(crate) fn page_window(&self) -> Option<(usize, usize)> {
        let positive = |v: &Value| {
            v.as_int()
                .filter(|n| *n > 0)
                .and_then(|n| usize::try_from(n).ok())
        };
        Some((positive(&self.criterion)?, positive(&self.control)?))
    }

    fn value_of<'r>(&self, row: &'r Row) -> FieldworkResult<&'r Value> {
        Ok(row
            .field_bearer()
            .field_by_name(&self.field_name)?
            .initial())
    }

    /// Applies this statement to `rows`.
    ///
    /// # Errors
    ///
    /// Returns [`FieldworkError::NotFound`] if a row has no field named
    /// `field_name`. Pagination never looks at fields.
    pub fn apply_to_rows(&self, rows: Vec<Row>) -> FieldworkResult<Vec<Row>> {
        match self.condition {
            Condition::PaginateBy => {
                let Some((per_page, page)) = self.page_window() else {
                    return Ok(rows);
                };
                Ok(rows
                    .into_iter()
                    .skip((page - 1).saturating_mul(per_page))
                    .take(per_page)
                    .collect())
            }
            Condition::SortAsc | Condition::SortDesc => {
                let mut keyed = rows
                    .into_iter()
                    .map(|row| -> FieldworkResult<(Value, Row)> {
                        Ok((self.value_of(&row)?.clone(), row))
                    })
                    .collect::<FieldworkResult<Vec<_>>>()?;
                if self.condition == Condition::SortAsc {
                    keyed.sort_by(|(a, _), (b, _)| a.natural_cmp(b));
                } else {
                    keyed.sort_by(|(a, _), (b, _)| b.natural_cmp(a));
                }
                Ok(keyed.into_iter().map(|(_, row)| row).collect())
            }
            _ => {
                let mut kept = Vec::with_capacity(rows.len());
                for row in rows {
                    if self.keeps(self.value_of(&row)?) {
                        kept.push(row);
                    }
                }
                Ok(kept)
            }
        }
    }

    fn keeps(&self, value: &Value) -> bool {
        let ordering = || value.natural_cmp(&self.criterion);
        match self.condition {
            Condition::LessThan => ordering() == Ordering::Less,
            Condition::GreaterThan => ordering() == Ordering::Greater,
            Condition::EqualTo => ordering() == Ordering::Equal,
            Condition::NotEqualTo => ordering() != Ordering::Equal,
            Condition::Contains => value.to_string().contains(&self.criterion.to_string()),
            Condition::Truthy => value.is_truthy(),
            Condition::Falsey => !value.is_truthy(),
            Condition::SortAsc | Condition::SortDesc | Condition::PaginateBy => true,
        }
    }
}
