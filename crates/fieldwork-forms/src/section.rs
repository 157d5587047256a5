//! Sections: titled blocks of display content.
//!
//! A [`Section`] holds an ordered list of [`SectionItem`]s. Labels and text
//! become fields, so a renderer draws a section with the same code it uses
//! for forms.

use indexmap::IndexMap;

use fieldwork_core::utils::text::escape_html;
use fieldwork_core::{FieldworkError, FieldworkResult};

use crate::fields::{Field, FieldType};
use crate::form::Form;
use crate::pick_a::PickAForm;
use crate::table::Table;
use crate::table_form::TableForm;

/// Label given to every content field.
pub const CONTENT_LABEL: &str = "section-content";

/// Anything a section can hold.
pub enum SectionItem {
    Field(Field),
    Section(Section),
    Table(Table),
    Form(Box<dyn Form>),
    TableForm(TableForm),
    PickAForm(PickAForm),
}

impl std::fmt::Debug for SectionItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Field(field) => f.debug_tuple("Field").field(field).finish(),
            Self::Section(section) => f.debug_tuple("Section").field(section).finish(),
            Self::Table(table) => f.debug_tuple("Table").field(table).finish(),
            Self::Form(form) => f.debug_tuple("Form").field(&form.id()).finish(),
            Self::TableForm(form) => f.debug_tuple("TableForm").field(&form.id()).finish(),
            Self::PickAForm(form) => f.debug_tuple("PickAForm").field(&form.id()).finish(),
        }
    }
}

impl From<Field> for SectionItem {
    fn from(field: Field) -> Self {
        Self::Field(field)
    }
}

impl From<Section> for SectionItem {
    fn from(section: Section) -> Self {
        Self::Section(section)
    }
}

impl From<Table> for SectionItem {
    fn from(table: Table) -> Self {
        Self::Table(table)
    }
}

impl From<Box<dyn Form>> for SectionItem {
    fn from(form: Box<dyn Form>) -> Self {
        Self::Form(form)
    }
}

impl From<crate::form::BaseForm> for SectionItem {
    fn from(form: crate::form::BaseForm) -> Self {
        Self::Form(Box::new(form))
    }
}

impl From<TableForm> for SectionItem {
    fn from(form: TableForm) -> Self {
        Self::TableForm(form)
    }
}

impl From<PickAForm> for SectionItem {
    fn from(form: PickAForm) -> Self {
        Self::PickAForm(form)
    }
}

/// A block of labels, text, tables, and forms.
///
/// # Examples
///
/// ```
/// use fieldwork_forms::section::{Section, SectionItem};
///
/// let section = Section::builder()
///     .id("welcome")
///     .label("Welcome")
///     .content("Fish & chips\nserved daily")
///     .build()
///     .unwrap();
///
/// assert_eq!(section.section_type(), "base");
/// let SectionItem::Field(content) = &section.writables()[1] else {
///     panic!("content is a field");
/// };
/// assert_eq!(content.initial().to_string(), "Fish &amp; chips<br />\nserved daily");
/// ```
#[derive(Debug)]
pub struct Section {
    id: String,
    classes: Vec<String>,
    data: IndexMap<String, String>,
    section_type: String,
    writables: Vec<SectionItem>,
}

impl Section {
    pub fn builder() -> SectionBuilder {
        SectionBuilder::new()
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

    /// A layout tag for the renderer, `"base"` unless set.
    pub fn section_type(&self) -> &str {
        &self.section_type
    }

    pub fn writables(&self) -> &[SectionItem] {
        &self.writables
    }

    pub fn writables_mut(&mut self) -> &mut [SectionItem] {
        &mut self.writables
    }
}

/// Builder for [`Section`].
#[derive(Debug, Default)]
pub struct SectionBuilder {
    id: Option<String>,
    classes: Vec<String>,
    data: IndexMap<String, String>,
    section_type: Option<String>,
    writables: Vec<SectionItem>,
    // The first builder error is kept and reported by `build`.
    error: Option<FieldworkError>,
}

impl SectionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
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

    pub fn section_type(mut self, section_type: impl Into<String>) -> Self {
        self.section_type = Some(section_type.into());
        self
    }

    /// Adds a section-label field showing `label`.
    pub fn label(self, label: impl Into<String>) -> Self {
        let label = label.into();
        let field = Field::builder()
            .field_type(FieldType::SectionLabel)
            .label(label.clone())
            .initial(label)
            .build();
        self.push_field(field)
    }

    /// Adds plain text. It is escaped, and each line break gets a `<br />`.
    pub fn content(self, text: &str) -> Self {
        let markup = escape_html(text).replace('\n', "<br />\n");
        self.literal_content(markup)
    }

    /// Adds markup as is.
    pub fn literal_content(self, markup: impl Into<String>) -> Self {
        let field = Field::builder()
            .field_type(FieldType::Html)
            .label(CONTENT_LABEL)
            .initial(markup.into())
            .build();
        self.push_field(field)
    }

    pub fn writable(mut self, item: impl Into<SectionItem>) -> Self {
        self.writables.push(item.into());
        self
    }

    fn push_field(mut self, field: FieldworkResult<Field>) -> Self {
        match field {
            Ok(field) => self.writables.push(SectionItem::Field(field)),
            Err(err) => {
                self.error.get_or_insert(err);
            }
        }
        self
    }

    /// # Errors
    ///
    /// Returns [`FieldworkError::ConfigurationError`] if the id is missing or
    /// empty.
    pub fn build(self) -> FieldworkResult<Section> {
        if let Some(err) = self.error {
            return Err(err);
        }
        let id = self
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| FieldworkError::ConfigurationError("a section needs an id".into()))?;
        Ok(Section {
            id,
            classes: self.classes,
            data: self.data,
            section_type: self.section_type.unwrap_or_else(|| "base".to_string()),
            writables: self.writables,
        })
    }
}
