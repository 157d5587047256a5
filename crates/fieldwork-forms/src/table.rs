//! Read-only tables: rows shown through a filter chain.
//!
//! A [`Table`] is the display counterpart of a
//! [`TableForm`](crate::table_form::TableForm). It takes no submissions;
//! its filter runs once, when the table is built, and the table keeps the
//! rows that survive in the order the filter left them.

use indexmap::IndexMap;

use fieldwork_core::FieldworkResult;

use crate::filter::Filter;
use crate::row::Row;

/// Rows for display, already sorted, filtered, and paginated.
///
/// # Examples
///
/// ```
/// use fieldwork_forms::filter::{Filter, FilterStatement};
/// use fieldwork_forms::{Field, FieldType, Row, Table};
///
/// let person = |name: &str| {
///     Row::builder()
///         .id(name)
///         .field(
///             "name",
///             Field::builder()
///                 .field_type(FieldType::Literal)
///                 .label("Name")
///                 .initial(name)
///                 .build()
///                 .unwrap(),
///         )
///         .build()
///         .unwrap()
/// };
///
/// let table = Table::builder()
///     .id("people")
///     .rows([person("Cy"), person("Ann"), person("Bo")])
///     .filter(Filter::new("by-name", vec![FilterStatement::sort_asc("name")]))
///     .build()
///     .unwrap();
///
/// assert_eq!(table.headings(), vec!["Name"]);
/// let order: Vec<_> = table.rows().iter().map(Row::id).collect();
/// assert_eq!(order, vec!["Ann", "Bo", "Cy"]);
/// ```
#[derive(Debug)]
pub struct Table {
    id: String,
    classes: Vec<String>,
    data: IndexMap<String, String>,
    rows: Vec<Row>,
    filter: Filter,
}

impl Table {
    pub fn builder() -> TableBuilder {
        TableBuilder::new()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub const fn data(&self) -> &IndexMap<String, String> {
        &self.data
    }

    /// The rows the filter kept.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub const fn filter(&self) -> &Filter {
        &self.filter
    }

    /// Column headings: the visible field labels of the first row.
    pub fn headings(&self) -> Vec<&str> {
        self.rows
            .first()
            .map(|row| row.field_bearer().visible_field_labels())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Builder for [`Table`]. Rows and filter are both optional.
#[derive(Debug, Default)]
pub struct TableBuilder {
    id: String,
    classes: Vec<String>,
    data: IndexMap<String, String>,
    rows: Vec<Row>,
    filter: Filter,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
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

    pub fn row(mut self, row: Row) -> Self {
        self.rows.push(row);
        self
    }

    pub fn rows(mut self, rows: impl IntoIterator<Item = Row>) -> Self {
        self.rows.extend(rows);
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    /// Runs the filter over the rows and freezes the result.
    ///
    /// # Errors
    ///
    /// Returns [`NotFound`](fieldwork_core::FieldworkError::NotFound) if a
    /// filter statement names a field some row lacks.
    pub fn build(self) -> FieldworkResult<Table> {
        let rows = self.filter.apply_to_rows(self.rows)?;
        tracing::debug!(table = %self.id, rows = rows.len(), "table built");
        Ok(Table {
            id: self.id,
            classes: self.classes,
            data: self.data,
            rows,
            filter: self.filter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{Field, FieldType};
    use crate::filter::FilterStatement;
    use fieldwork_http::QueryDict;
    use pretty_assertions::assert_eq;

    fn score_row(name: &str, score: i64) -> Row {
        let literal = |label: &str, value: fieldwork_db::Value| {
            Field::builder()
                .field_type(FieldType::Literal)
                .label(label)
                .initial(value)
                .build()
                .unwrap()
        };
        Row::builder()
            .id(name)
            .field("name", literal("Name", name.into()))
            .field("score", literal("Score", score.into()))
            .build()
            .unwrap()
    }

    fn board() -> Vec<Row> {
        vec![
            score_row("ann", 7),
            score_row("bo", 12),
            score_row("cy", 3),
            score_row("di", 12),
            score_row("ed", 9),
        ]
    }

    fn ids(table: &Table) -> Vec<&str> {
        table.rows().iter().map(Row::id).collect()
    }

    #[test]
    fn test_empty_table() {
        let table = Table::builder().build().unwrap();
        assert!(table.is_empty());
        assert!(table.filter().is_identity());
        assert!(table.headings().is_empty());
    }

    #[test]
    fn test_without_filter_rows_keep_order() {
        let table = Table::builder().id("board").rows(board()).build().unwrap();
        assert_eq!(ids(&table), vec!["ann", "bo", "cy", "di", "ed"]);
        assert_eq!(table.headings(), vec!["Name", "Score"]);
    }

    #[test]
    fn test_filter_runs_at_build() {
        let params = QueryDict::parse("board-sort-field=score&board-sort-order=desc&pages-page=1");
        let filter = Filter::sort("board", &params)
            .then(Filter::pagination("pages", 3, &params).unwrap());
        let table = Table::builder()
            .id("board")
            .class("striped")
            .data("source", "league")
            .rows(board())
            .filter(filter)
            .build()
            .unwrap();

        assert_eq!(ids(&table), vec!["bo", "di", "ed"]);
        assert_eq!(table.filter().current_page(), Some(1));
        assert_eq!(table.classes(), &["striped".to_string()]);
        assert_eq!(table.data().get("source").map(String::as_str), Some("league"));
    }

    #[test]
    fn test_predicates_drop_rows() {
        let filter = Filter::new(
            "high",
            vec![FilterStatement::new("score", crate::filter::Condition::GreaterThan, 8, ()).unwrap()],
        );
        let table = Table::builder().rows(board()).filter(filter).build().unwrap();
        assert_eq!(ids(&table), vec!["bo", "di", "ed"]);
    }

    #[test]
    fn test_unknown_sort_field_is_not_found() {
        let err = Table::builder()
            .row(score_row("ann", 1))
            .filter(Filter::new("f", vec![FilterStatement::sort_asc("missing")]))
            .build()
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
