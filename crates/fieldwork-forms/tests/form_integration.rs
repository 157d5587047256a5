//! Integration tests for the submission pipeline.
//!
//! These tests drive forms the way a request handler would, covering:
//! 1. Field and form validation
//! 2. Table form row discovery
//! 3. Filtering rows for display
//! 4. Record-backed forms
//! 5. Sections and pick-a forms

use std::cell::RefCell;
use std::rc::Rc;

use pretty_assertions::assert_eq;

use fieldwork_core::{FieldworkError, FieldworkResult};
use fieldwork_db::{Column, ColumnKind, Record, Value};
use fieldwork_forms::{
    BaseForm, Choice, Condition, Field, FieldBearer, FieldType, Filter, FilterStatement, Form,
    PickAForm, Renderable, Row, Section, SectionItem, Submission, Table, TableForm, Validity,
};
use fieldwork_http::QueryDict;

// ============================================================================
// Shared helpers
// ============================================================================

fn field(field_type: FieldType, label: &str, required: bool) -> Field {
    Field::builder()
        .field_type(field_type)
        .label(label)
        .required(required)
        .build()
        .unwrap()
}

/// A contact form with a required name, an optional note, and a required
/// topic choice.
fn contact_form() -> BaseForm {
    BaseForm::builder()
        .id("contact")
        .field("name", field(FieldType::Text, "Name", true))
        .field("note", field(FieldType::Textarea, "Note", false))
        .field(
            "topic",
            Field::builder()
                .field_type(FieldType::Choice)
                .label("Topic")
                .required(true)
                .choices(vec![
                    Choice::new("sales", "Sales"),
                    Choice::new("support", "Support"),
                ])
                .build()
                .unwrap(),
        )
        .build()
        .unwrap()
}

fn line_item_row() -> FieldworkResult<Row> {
    Row::builder()
        .field(
            "first",
            Field::builder()
                .field_type(FieldType::Text)
                .label("First Field")
                .required(true)
                .build()?,
        )
        .field(
            "second",
            Field::builder()
                .field_type(FieldType::Text)
                .label("Second Field")
                .build()?,
        )
        .build()
}

fn literal_row(name: &str, score: i64) -> Row {
    Row::builder()
        .field(
            "name",
            Field::builder()
                .field_type(FieldType::Literal)
                .label("Name")
                .initial(name)
                .build()
                .unwrap(),
        )
        .field(
            "score",
            Field::builder()
                .field_type(FieldType::Literal)
                .label("Score")
                .initial(score)
                .build()
                .unwrap(),
        )
        .build()
        .unwrap()
}

fn names(rows: &[Row]) -> Vec<String> {
    rows.iter()
        .map(|row| {
            row.field_bearer()
                .field_by_name("name")
                .unwrap()
                .initial()
                .to_string()
        })
        .collect()
}

// ============================================================================
// 1. Field and form validation
// ============================================================================

#[test]
fn test_optional_absent_field_is_valid_without_data() {
    let mut note = field(FieldType::Text, "Note", false);
    note.validate(&QueryDict::new());
    assert_eq!(note.validity(), Validity::Valid);
    assert!(note.validated_data().is_none());
}

#[test]
fn test_required_absent_field_is_invalid() {
    let mut name = field(FieldType::Text, "Name", true);
    name.validate(&QueryDict::parse("name="));
    assert_eq!(name.validity(), Validity::Invalid);
    assert_eq!(name.errors(), &["This field is required.".to_string()]);
}

#[test]
fn test_validate_is_idempotent() {
    let mut form = contact_form();
    let params = QueryDict::parse("name=Ann&topic=nope");
    form.validate(&params).unwrap();
    let first: Vec<_> = form
        .field_bearer()
        .unwrap()
        .fields()
        .into_iter()
        .map(|(name, f)| (name.to_string(), f.validity(), f.errors().to_vec()))
        .collect();

    form.validate(&params).unwrap();
    let second: Vec<_> = form
        .field_bearer()
        .unwrap()
        .fields()
        .into_iter()
        .map(|(name, f)| (name.to_string(), f.validity(), f.errors().to_vec()))
        .collect();

    assert_eq!(first, second);
    assert_eq!(form.errors().len(), 1);
}

#[test]
fn test_contact_form_submission() {
    let mut form = contact_form();

    let outcome = form.submit(&QueryDict::parse("name=Ann&topic=other")).unwrap();
    assert!(!outcome.is_valid());
    let topic = form.field_by_name("topic").unwrap();
    assert_eq!(topic.errors(), &["Select a valid choice.".to_string()]);
    // Submitted values survive a failed pass for re-rendering.
    assert_eq!(topic.submitted(), &["other".to_string()]);

    form.submit(&QueryDict::parse("name=Ann&topic=support")).unwrap();
    assert!(form.is_valid());
    assert_eq!(
        form.field_by_name("topic").unwrap().validated_data(),
        Some(&Value::from("Support"))
    );
    assert!(form.field_by_name("note").unwrap().validated_data().is_none());
}

#[test]
fn test_field_by_name_round_trip() {
    let form = contact_form();
    let bearer = form.field_bearer().unwrap();
    for name in bearer.field_names() {
        let found = bearer.field_by_name(name).unwrap();
        assert_eq!(bearer.name_by_field(found).unwrap(), name);
    }
    assert!(matches!(
        bearer.field_by_name("missing"),
        Err(FieldworkError::NotFound(_))
    ));
}

#[test]
fn test_three_visible_one_hidden() {
    let bearer = FieldBearer::builder()
        .field("a", field(FieldType::Text, "A", false))
        .field("b", field(FieldType::Text, "B", false))
        .field("c", field(FieldType::Text, "C", false))
        .field("d", field(FieldType::Text, "D", false))
        .hidden_field_names(["c"])
        .build()
        .unwrap();
    assert_eq!(bearer.visible_field_names(), vec!["a", "b", "d"]);
    assert_eq!(bearer.hidden_field_names(), vec!["c"]);
}

#[test]
fn test_password_confirmation_validator() {
    let mut form = BaseForm::builder()
        .id("signup")
        .field("password", field(FieldType::Text, "Password", true))
        .field("confirm", field(FieldType::Text, "Confirm Password", true))
        .validator("confirm", |confirm, ctx| {
            if confirm.validated_data() != ctx.validated("password") {
                confirm.add_error("Passwords do not match.");
            }
        })
        .build()
        .unwrap();

    let outcome = form
        .submit(&QueryDict::parse("password=abc&confirm-password=abd"))
        .unwrap();
    assert_eq!(
        outcome,
        Submission::Invalid {
            errors: vec!["Please correct the indicated errors and resubmit the form.".into()],
            result: Value::Null,
        }
    );

    let outcome = form
        .submit(&QueryDict::parse("password=abc&confirm-password=abc"))
        .unwrap();
    assert!(outcome.is_valid());
}

// ============================================================================
// 2. Table form row discovery
// ============================================================================

#[test]
fn test_two_row_discovery() {
    let seed = line_item_row().unwrap();
    let mut form = TableForm::builder()
        .id("items")
        .row(seed)
        .row_factory(line_item_row)
        .build()
        .unwrap();

    let params =
        QueryDict::parse("row-0-first-field=A&row-0-second-field=B&row-1-first-field=C");
    form.validate(&params).unwrap();

    assert_eq!(form.rows().len(), 3);
    assert_eq!(form.initial_rows().len(), 1);
    let discovered: Vec<_> = form.rows()[1..]
        .iter()
        .map(|row| {
            let bearer = row.field_bearer();
            (
                bearer.field_by_name("first").unwrap().initial().to_string(),
                bearer.field_by_name("second").unwrap().initial().to_string(),
            )
        })
        .collect();
    assert_eq!(
        discovered,
        vec![
            ("A".to_string(), "B".to_string()),
            ("C".to_string(), String::new()),
        ]
    );
    // The seed row has no prefix, so nothing was submitted for it.
    assert!(!form.is_valid());
}

#[test]
fn test_adversarial_keys_follow_substring_rule() {
    let mut form = TableForm::builder()
        .id("items")
        .row_factory(line_item_row)
        .build()
        .unwrap();

    // The anchor inside another key still names a row, and every occurrence
    // of the anchor is removed to form its prefix.
    let params = QueryDict::parse("x-first-field-first-field=1&unrelated=2&first-fieldz=3");
    form.validate(&params).unwrap();

    let slugs: Vec<_> = form
        .rows()
        .iter()
        .map(|row| row.field_bearer().field_by_name("first").unwrap().slug())
        .collect();
    assert_eq!(slugs, vec!["x-first-field", "z-first-field"]);
}

#[test]
fn test_rows_do_not_accumulate_across_passes() {
    let mut form = TableForm::builder()
        .id("items")
        .row_factory(line_item_row)
        .build()
        .unwrap();
    let params = QueryDict::parse("a-first-field=1&b-first-field=2");
    for _ in 0..3 {
        form.validate(&params).unwrap();
        assert_eq!(form.rows().len(), 2);
        assert!(form.is_valid());
    }
    form.validate(&QueryDict::new()).unwrap();
    assert!(form.rows().is_empty());
    assert!(form.is_valid());
}

#[test]
fn test_table_form_submit_saves_rows() {
    let mut form = TableForm::builder()
        .id("items")
        .row_factory(line_item_row)
        .on_valid(|form| Value::Int(i64::try_from(form.rows().len()).unwrap_or(i64::MAX)))
        .build()
        .unwrap();
    let outcome = form
        .submit(&QueryDict::parse("p-first-field=A&q-first-field=B&r-first-field=C"))
        .unwrap();
    assert_eq!(outcome, Submission::Valid(Value::Int(3)));
}

#[test]
fn test_highlightable_row_with_on_click_fails() {
    let err = Row::builder()
        .field("a", field(FieldType::Literal, "A", false))
        .highlightable(true)
        .on_click("open()")
        .build()
        .unwrap_err();
    assert!(err.is_configuration());
}

// ============================================================================
// 3. Filtering rows for display
// ============================================================================

#[test]
fn test_sort_and_paginate_from_params() {
    let rows: Vec<Row> = [("ann", 3), ("bob", 9), ("cy", 1), ("di", 7), ("ed", 5)]
        .into_iter()
        .map(|(name, score)| literal_row(name, score))
        .collect();

    let params = QueryDict::parse("board-sort-field=score&board-sort-order=desc&board-page=2");
    let filter =
        Filter::sort("board", &params).then(Filter::pagination("board", 2, &params).unwrap());

    assert_eq!(filter.max_pages(rows.len()), Some(3));
    let page = filter.apply_to_rows(rows).unwrap();
    assert_eq!(names(&page), vec!["ed", "ann"]);
}

#[test]
fn test_paginate_hundred_rows_by_ten() {
    let rows: Vec<Row> = (0..100).map(|n| literal_row(&format!("r{n}"), n)).collect();
    let page = Filter::new("p", vec![FilterStatement::paginate_by(10, 3).unwrap()])
        .apply_to_rows(rows)
        .unwrap();
    let expected: Vec<String> = (20..30).map(|n| format!("r{n}")).collect();
    assert_eq!(names(&page), expected);
}

#[test]
fn test_predicates_chain() {
    let rows: Vec<Row> = [("ann", 3), ("bob", 9), ("cy", 0), ("dan", 7)]
        .into_iter()
        .map(|(name, score)| literal_row(name, score))
        .collect();
    let filter = Filter::new(
        "f",
        vec![
            FilterStatement::truthy("score"),
            FilterStatement::new("name", Condition::Contains, "n", ()).unwrap(),
            FilterStatement::sort_asc("score"),
        ],
    );
    assert_eq!(names(&filter.apply_to_rows(rows).unwrap()), vec!["ann", "dan"]);
}

#[test]
fn test_table_shows_requested_page() {
    let params = QueryDict::parse("board-sort-field=score&board-page=2");
    let table = Table::builder()
        .id("board")
        .rows((1..=7).map(|n| literal_row(&format!("p{n}"), 8 - n)))
        .filter(
            Filter::sort("board", &params).then(Filter::pagination("board", 3, &params).unwrap()),
        )
        .build()
        .unwrap();

    assert_eq!(names(table.rows()), vec!["p4", "p3", "p2"]);
    assert_eq!(table.filter().max_pages(7), Some(3));
    assert_eq!(table.headings(), vec!["Name", "Score"]);
}

// ============================================================================
// 4. Record-backed forms
// ============================================================================

#[derive(Debug)]
struct Book {
    id: i64,
    title: String,
    pages: i64,
    format: String,
    saved: bool,
}

impl Record for Book {
    fn model_name(&self) -> &str {
        "Book"
    }

    fn columns(&self) -> Vec<Column> {
        vec![
            Column::new("id", ColumnKind::PrimaryKey, self.id),
            Column::new("title", ColumnKind::Text, self.title.as_str()).label("Title"),
            Column::new("pages", ColumnKind::Integer, self.pages).label("Pages"),
            Column::new(
                "format",
                ColumnKind::Enum {
                    values: vec!["Hardcover".into(), "Paperback".into()],
                },
                self.format.as_str(),
            )
            .label("Format"),
        ]
    }

    fn set_value(&mut self, column: &str, value: Value) -> FieldworkResult<()> {
        match column {
            "title" => self.title = value.to_string(),
            "pages" => {
                self.pages = value
                    .as_int()
                    .ok_or_else(|| FieldworkError::SerializationError(format!("pages: {value}")))?;
            }
            "format" => self.format = value.to_string(),
            other => return Err(FieldworkError::NotFound(format!("column '{other}'"))),
        }
        Ok(())
    }

    fn save(&mut self) -> Value {
        self.saved = true;
        Value::Int(self.id)
    }
}

#[test]
fn test_record_form_round_trip() {
    let book = Rc::new(RefCell::new(Book {
        id: 12,
        title: "Draft".into(),
        pages: 10,
        format: "Hardcover".into(),
        saved: false,
    }));

    let mut form = BaseForm::builder()
        .id("book")
        .field_bearer(FieldBearer::builder().add_record(Rc::clone(&book)).unwrap())
        .build()
        .unwrap();

    let bearer = form.field_bearer().unwrap();
    assert_eq!(
        bearer.visible_field_names(),
        vec!["Book.title", "Book.pages", "Book.format"]
    );
    assert_eq!(
        bearer.field_by_name("Book.title").unwrap().initial(),
        &Value::from("Draft")
    );

    let outcome = form
        .submit(&QueryDict::parse("title=Final&pages=321&format=paperback"))
        .unwrap();
    // The outer bearer has no save callback of its own.
    assert_eq!(outcome, Submission::Valid(Value::Null));

    let book = book.borrow();
    assert!(book.saved);
    assert_eq!(book.title, "Final");
    assert_eq!(book.pages, 321);
    assert_eq!(book.format, "Paperback");
}

#[test]
fn test_record_form_renders_nested_bearer() {
    let book = Rc::new(RefCell::new(Book {
        id: 1,
        title: "T".into(),
        pages: 1,
        format: "Paperback".into(),
        saved: false,
    }));
    let form = BaseForm::builder()
        .id("book")
        .field_bearer(FieldBearer::builder().add_record(book).unwrap())
        .build()
        .unwrap();

    let mut field_count = 0;
    Renderable::from(&form).walk(&mut |node, _| {
        if node.kind() == "field" {
            field_count += 1;
        }
    });
    assert_eq!(field_count, 4);
}

// ============================================================================
// 5. Sections and pick-a forms
// ============================================================================

#[test]
fn test_section_wraps_pick_a_form() {
    let pick = PickAForm::builder()
        .id("reach")
        .label("How can we reach you?")
        .form("Contact Form", contact_form())
        .form(
            "Call Back",
            BaseForm::builder()
                .id("call")
                .field("phone", field(FieldType::Text, "Phone", true))
                .build()
                .unwrap(),
        )
        .build()
        .unwrap();
    let mut section = Section::builder()
        .id("help")
        .label("Need help?")
        .content("We answer within a day.")
        .writable(pick)
        .build()
        .unwrap();

    let SectionItem::PickAForm(pick) = &mut section.writables_mut()[2] else {
        panic!("third writable is the pick-a form");
    };
    let outcome = pick
        .submit(&QueryDict::parse("reach-pick=call-back&phone=555"))
        .unwrap();
    assert!(outcome.is_valid());
    assert_eq!(pick.selected_label(), Some("Call Back"));
    assert_eq!(pick.sub_forms()[0].validity(), Validity::Unvalidated);

    let mut kinds = Vec::new();
    Renderable::from(&section).walk(&mut |node, depth| {
        if depth <= 2 {
            kinds.push(node.kind());
        }
    });
    assert_eq!(
        kinds,
        vec!["section", "field", "field", "pick-a-form", "form", "form"]
    );
}
