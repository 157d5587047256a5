//! Sorting, predicate, and pagination pipelines over rows.
//!
//! A [`Filter`] holds an ordered list of [`FilterStatement`]s and an
//! optional next filter. Applying it runs its own statements in order, then
//! hands the result to the next filter. Order matters: sorting then
//! paginating is not paginating then sorting.

mod statement;

pub use statement::{Condition, FilterStatement};

use fieldwork_core::FieldworkResult;
use fieldwork_http::QueryDict;

use crate::row::Row;

/// A named link in a filter chain.
///
/// An empty filter passes rows through untouched.
///
/// # Examples
///
/// ```
/// use fieldwork_forms::filter::{Filter, FilterStatement};
///
/// let filter = Filter::new("people", vec![FilterStatement::sort_asc("name")])
///     .then(Filter::new("pages", vec![FilterStatement::paginate_by(25, 2).unwrap()]));
/// assert_eq!(filter.chain().count(), 2);
/// assert_eq!(filter.max_pages(60), Some(3));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    id: String,
    statements: Vec<FilterStatement>,
    next: Option<Box<Filter>>,
}

impl Filter {
    pub fn new(id: impl Into<String>, statements: Vec<FilterStatement>) -> Self {
        Self {
            id: id.into(),
            statements,
            next: None,
        }
    }

    /// Appends `next` at the end of this chain.
    #[must_use]
    pub fn then(mut self, next: Self) -> Self {
        let tail = match self.next.take() {
            Some(existing) => existing.then(next),
            None => next,
        };
        self.next = Some(Box::new(tail));
        self
    }

    /// A filter that shows page `{id}-page` of `per_page` rows.
    ///
    /// A missing, malformed, or zero page number means the first page.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `per_page` is zero.
    pub fn pagination(
        id: impl Into<String>,
        per_page: usize,
        params: &QueryDict,
    ) -> FieldworkResult<Self> {
        let id = id.into();
        let page = params
            .get(&format!("{id}-page"))
            .and_then(|p| p.trim().parse::<usize>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1);
        tracing::debug!(filter = %id, page, per_page, "pagination requested");
        Ok(Self::new(id, vec![FilterStatement::paginate_by(per_page, page)?]))
    }

    /// A filter that sorts by `{id}-sort-field` in `{id}-sort-order`
    /// (`asc` or `desc`, default `asc`).
    ///
    /// Without a sort field the filter is empty.
    pub fn sort(id: impl Into<String>, params: &QueryDict) -> Self {
        let id = id.into();
        let statements = params
            .get(&format!("{id}-sort-field"))
            .filter(|field| !field.is_empty())
            .map(|field| {
                let descending = params
                    .get(&format!("{id}-sort-order"))
                    .is_some_and(|order| order.eq_ignore_ascii_case("desc"));
                if descending {
                    FilterStatement::sort_desc(field)
                } else {
                    FilterStatement::sort_asc(field)
                }
            })
            .into_iter()
            .collect();
        Self::new(id, statements)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn statements(&self) -> &[FilterStatement] {
        &self.statements
    }

    pub fn next_filter(&self) -> Option<&Self> {
        self.next.as_deref()
    }

    /// This filter followed by every filter after it.
    pub fn chain(&self) -> impl Iterator<Item = &Self> {
        std::iter::successors(Some(self), |filter| filter.next_filter())
    }

    /// Returns `true` if no filter in the chain has a statement.
    pub fn is_identity(&self) -> bool {
        self.chain().all(|filter| filter.statements.is_empty())
    }

    fn page_window(&self) -> Option<(usize, usize)> {
        self.chain()
            .flat_map(|filter| filter.statements.iter())
            .find(|stmt| stmt.condition() == Condition::PaginateBy)
            .and_then(FilterStatement::page_window)
    }

    /// The page the chain's first pagination statement selects.
    pub fn current_page(&self) -> Option<usize> {
        self.page_window().map(|(_, page)| page)
    }

    /// Number of pages `row_count` rows fill, at least one.
    ///
    /// `None` when the chain does not paginate.
    pub fn max_pages(&self, row_count: usize) -> Option<usize> {
        self.page_window()
            .map(|(per_page, _)| row_count.div_ceil(per_page).max(1))
    }

    /// Runs the chain over `rows`.
    ///
    /// # Errors
    ///
    /// Returns [`NotFound`](fieldwork_core::FieldworkError::NotFound) if a
    /// statement names a field some row lacks.
    pub fn apply_to_rows(&self, rows: Vec<Row>) -> FieldworkResult<Vec<Row>> {
        let mut rows = rows;
        for filter in self.chain() {
            for stmt in &filter.statements {
                rows = stmt.apply_to_rows(rows)?;
            }
            tracing::trace!(filter = %filter.id, rows = rows.len(), "filter applied");
        }
        Ok(rows)
    }
}
