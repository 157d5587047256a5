//! Fields backed by a persisted [`Record`].
//!
//! Each column becomes one field named `<Model>.<column>`. Bookkeeping
//! columns (primary key, foreign keys, version) become hidden fields.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use fieldwork_core::FieldworkResult;
use fieldwork_db::{Column, ColumnKind, Record, Value};

use crate::choice::Choice;
use crate::field_bearer::{FieldBearer, FieldBearerBuilder};
use crate::fields::{Field, FieldType};

/// The field type a column kind maps to.
pub fn field_type_for(kind: &ColumnKind) -> FieldType {
    match kind {
        ColumnKind::PrimaryKey => FieldType::PrimaryKey,
        ColumnKind::ForeignKey { .. } => FieldType::ForeignKey,
        ColumnKind::Version => FieldType::Version,
        ColumnKind::Boolean => FieldType::Boolean,
        ColumnKind::LongText => FieldType::Textarea,
        ColumnKind::Date => FieldType::Date,
        ColumnKind::DateTime => FieldType::DateTime,
        ColumnKind::Enum { .. } => FieldType::Choice,
        ColumnKind::Text | ColumnKind::Integer | ColumnKind::Float => FieldType::Text,
    }
}

fn field_for(column: &Column) -> FieldworkResult<Field> {
    let mut builder = Field::builder()
        .field_type(field_type_for(&column.kind))
        .label(column.label.as_str())
        .initial(column.value.clone())
        // An unchecked checkbox submits nothing.
        .required(!column.nullable && column.kind != ColumnKind::Boolean);
    if let ColumnKind::Enum { values } = &column.kind {
        builder = builder.choices(values.iter().map(|v| Choice::from_value(v.as_str())).collect());
    }
    builder.build()
}

/// Builds one field per column of `record`, in column order.
///
/// # Errors
///
/// Returns a configuration error if a column cannot become a field, such as
/// an enum column without values.
pub fn make_fields_from_record<R: Record + ?Sized>(
    record: &R,
) -> FieldworkResult<IndexMap<String, Field>> {
    let model = record.model_name();
    record
        .columns()
        .iter()
        .map(|column| Ok((format!("{model}.{}", column.name), field_for(column)?)))
        .collect()
}

/// Names of the bookkeeping fields for `record`.
fn bookkeeping_names<R: Record + ?Sized>(record: &R) -> Vec<String> {
    let model = record.model_name();
    record
        .columns()
        .iter()
        .filter(|column| column.kind.is_bookkeeping())
        .map(|column| format!("{model}.{}", column.name))
        .collect()
}

/// Writes every validated field of `bearer` named `<model>.<column>` back to
/// `record`, then saves it.
fn write_back<R: Record + ?Sized>(record: &RefCell<R>, bearer: &FieldBearer) -> Value {
    let Ok(mut record) = record.try_borrow_mut() else {
        tracing::warn!("record is borrowed elsewhere, skipping save");
        return Value::Null;
    };
    let prefix = format!("{}.", record.model_name());
    for (name, field) in bearer.own_fields() {
        let (Some(column), Some(data)) = (name.strip_prefix(&prefix), field.validated_data())
        else {
            continue;
        };
        if let Err(err) = record.set_value(column, data.clone()) {
            tracing::warn!(field = %name, error = %err, "could not write field to record");
        }
    }
    record.save()
}

/// Builds the field bearer for one record.
///
/// Saving the bearer writes its validated data into the record and returns
/// the record's own save result.
///
/// # Errors
///
/// Returns a configuration error if the record's columns cannot become
/// fields.
pub fn record_field_bearer<R: Record + 'static>(
    record: Rc<RefCell<R>>,
) -> FieldworkResult<FieldBearer> {
    let (fields, hidden) = {
        let borrowed = record.borrow();
        (
            make_fields_from_record(&*borrowed)?,
            bookkeeping_names(&*borrowed),
        )
    };
    FieldBearer::builder()
        .fields(fields)
        .hidden_field_names(hidden)
        .save_fn(move |bearer| write_back(&*record, bearer))
        .build()
}

impl FieldBearerBuilder {
    /// Nests the bearer for `record` under its model name.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the record's columns cannot become
    /// fields.
    pub fn add_record<R: Record + 'static>(self, record: Rc<RefCell<R>>) -> FieldworkResult<Self> {
        let name = record.borrow().model_name().to_string();
        Ok(self.field_bearer(name, record_field_bearer(record)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldwork_core::FieldworkError;
    use fieldwork_http::QueryDict;
    use pretty_assertions::assert_eq;

    use crate::validation;

    #[derive(Debug, Default)]
    struct Author {
        id: i64,
        name: String,
        bio: Option<String>,
        status: String,
        saves: u32,
    }

    impl Record for Author {
        fn model_name(&self) -> &str {
            "Author"
        }

        fn columns(&self) -> Vec<Column> {
            vec![
                Column::new("id", ColumnKind::PrimaryKey, self.id),
                Column::new("name", ColumnKind::Text, self.name.as_str()).label("Name"),
                Column::new("bio", ColumnKind::LongText, self.bio.clone())
                    .label("Bio")
                    .nullable(true),
                Column::new(
                    "status",
                    ColumnKind::Enum {
                        values: vec!["Active".into(), "On Leave".into()],
                    },
                    self.status.as_str(),
                )
                .label("Status"),
            ]
        }

        fn set_value(&mut self, column: &str, value: Value) -> FieldworkResult<()> {
            match column {
                "name" => self.name = value.to_string(),
                "bio" => self.bio = Some(value.to_string()),
                "status" => self.status = value.to_string(),
                other => return Err(FieldworkError::NotFound(format!("column '{other}'"))),
            }
            Ok(())
        }

        fn save(&mut self) -> Value {
            self.saves += 1;
            Value::Int(self.id)
        }
    }

    fn author() -> Rc<RefCell<Author>> {
        Rc::new(RefCell::new(Author {
            id: 7,
            name: "Ann".into(),
            status: "Active".into(),
            ..Author::default()
        }))
    }

    #[test]
    fn test_fields_follow_columns() {
        let record = author();
        let fields = make_fields_from_record(&*record.borrow()).unwrap();
        let names: Vec<_> = fields.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Author.id", "Author.name", "Author.bio", "Author.status"]);

        let name = &fields["Author.name"];
        assert_eq!(name.field_type(), FieldType::Text);
        assert!(name.is_required());
        assert_eq!(name.initial(), &Value::from("Ann"));

        let bio = &fields["Author.bio"];
        assert_eq!(bio.field_type(), FieldType::Textarea);
        assert!(!bio.is_required());
        assert!(bio.initial().is_null());

        let status = &fields["Author.status"];
        assert_eq!(status.field_type(), FieldType::Choice);
        let aliases: Vec<_> = status.choices().iter().map(Choice::alias).collect();
        assert_eq!(aliases, vec!["active", "on-leave"]);
    }

    #[test]
    fn test_bookkeeping_columns_are_hidden() {
        let bearer = FieldBearer::builder().add_record(author()).unwrap().build().unwrap();
        let nested = bearer.field_bearer_by_name("Author").unwrap();
        assert_eq!(nested.hidden_field_names(), vec!["Author.id"]);
        assert_eq!(
            bearer.visible_field_names(),
            vec!["Author.name", "Author.bio", "Author.status"]
        );
    }

    #[test]
    fn test_save_writes_validated_data_back() {
        let record = author();
        let mut bearer = FieldBearer::builder()
            .add_record(Rc::clone(&record))
            .unwrap()
            .build()
            .unwrap();
        let params = QueryDict::parse("name=Bea&bio=Writes+things&status=on-leave");
        validation::validate_fields(&mut bearer, &params);
        assert!(!validation::has_invalid_visible(&bearer));

        bearer.save();
        let saved = record.borrow();
        assert_eq!(saved.name, "Bea");
        assert_eq!(saved.bio.as_deref(), Some("Writes things"));
        assert_eq!(saved.status, "On Leave");
        assert_eq!(saved.saves, 1);
    }

    #[test]
    fn test_record_bearer_returns_record_save_result() {
        let record = author();
        let bearer = record_field_bearer(Rc::clone(&record)).unwrap();
        assert_eq!(bearer.save(), Value::Int(7));
        assert_eq!(record.borrow().name, "Ann");
    }
}
