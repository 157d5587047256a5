//! A closed, read-only view over everything a renderer can draw.
//!
//! [`Renderable`] borrows one node of a built tree. Renderers match on it,
//! or walk it with [`Renderable::walk`]; nothing here knows about markup.

use indexmap::IndexMap;

use crate::field_bearer::FieldBearer;
use crate::fields::Field;
use crate::filter::Filter;
use crate::form::{BaseForm, Form};
use crate::pick_a::PickAForm;
use crate::row::Row;
use crate::section::{Section, SectionItem};
use crate::table::Table;
use crate::table_form::TableForm;

/// One node of a renderable tree.
#[derive(Clone, Copy)]
pub enum Renderable<'a> {
    Field(&'a Field),
    FieldBearer(&'a FieldBearer),
    Row(&'a Row),
    Form(&'a dyn Form),
    TableForm(&'a TableForm),
    PickAForm(&'a PickAForm),
    Table(&'a Table),
    Section(&'a Section),
    Filter(&'a Filter),
}

impl std::fmt::Debug for Renderable<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple(self.kind()).field(&self.id()).finish()
    }
}

impl<'a> Renderable<'a> {
    /// The node's kind, stable across releases.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Field(_) => "field",
            Self::FieldBearer(_) => "field-bearer",
            Self::Row(_) => "row",
            Self::Form(_) => "form",
            Self::TableForm(_) => "table-form",
            Self::PickAForm(_) => "pick-a-form",
            Self::Table(_) => "table",
            Self::Section(_) => "section",
            Self::Filter(_) => "filter",
        }
    }

    /// The node's render id. Field bearers have none.
    pub fn id(&self) -> Option<String> {
        match self {
            Self::Field(field) => Some(field.id()),
            Self::FieldBearer(_) => None,
            Self::Row(row) => Some(row.id().to_string()),
            Self::Form(form) => Some(form.id().to_string()),
            Self::TableForm(form) => Some(form.id().to_string()),
            Self::PickAForm(form) => Some(form.id().to_string()),
            Self::Table(table) => Some(table.id().to_string()),
            Self::Section(section) => Some(section.id().to_string()),
            Self::Filter(filter) => Some(filter.id().to_string()),
        }
    }

    /// The finer-grained type tag: a field's type, a form's type, or a
    /// section's type.
    pub fn type_tag(&self) -> &'a str {
        match *self {
            Self::Field(field) => field.field_type().as_str(),
            Self::Form(form) => form.form_type(),
            Self::TableForm(form) => form.form_type(),
            Self::PickAForm(form) => form.form_type(),
            Self::Section(section) => section.section_type(),
            Self::FieldBearer(_) | Self::Row(_) | Self::Table(_) | Self::Filter(_) => self.kind(),
        }
    }

    pub fn classes(&self) -> &'a [String] {
        match *self {
            Self::Field(field) => field.classes(),
            Self::Row(row) => row.classes(),
            Self::Form(form) => form.classes(),
            Self::TableForm(form) => form.classes(),
            Self::PickAForm(form) => form.classes(),
            Self::Table(table) => table.classes(),
            Self::Section(section) => section.classes(),
            Self::FieldBearer(_) | Self::Filter(_) => &[],
        }
    }

    /// `data-*` attributes, for nodes that carry them.
    pub fn data(&self) -> Option<&'a IndexMap<String, String>> {
        match *self {
            Self::Field(field) => Some(field.data()),
            Self::Row(row) => Some(row.data()),
            Self::Form(form) => Some(form.data()),
            Self::TableForm(form) => Some(form.data()),
            Self::PickAForm(form) => Some(form.data()),
            Self::Table(table) => Some(table.data()),
            Self::Section(section) => Some(section.data()),
            Self::FieldBearer(_) | Self::Filter(_) => None,
        }
    }

    /// Direct children in render order.
    ///
    /// - a field bearer yields its own fields, then its nested bearers
    /// - a row yields its field bearer
    /// - a form yields its field bearer, then its sub-forms
    /// - a table form or table yields its rows, then its filter unless it
    ///   is empty
    /// - a pick-a form yields its forms in manifest order
    /// - a section yields its writables
    /// - a filter yields the next filter in its chain
    pub fn children(&self) -> Vec<Self> {
        match *self {
            Self::Field(_) => Vec::new(),
            Self::FieldBearer(bearer) => bearer
                .own_fields()
                .values()
                .map(Self::Field)
                .chain(bearer.field_bearers().values().map(Self::FieldBearer))
                .collect(),
            Self::Row(row) => vec![Self::FieldBearer(row.field_bearer())],
            Self::Form(form) => form
                .field_bearer()
                .map(Self::FieldBearer)
                .into_iter()
                .chain(form.sub_forms().iter().map(|sub| Self::Form(&**sub)))
                .collect(),
            Self::TableForm(form) => Self::rows_then_filter(form.rows(), form.filter()),
            Self::Table(table) => Self::rows_then_filter(table.rows(), table.filter()),
            Self::PickAForm(form) => form
                .manifest()
                .filter_map(|(_, owned)| owned.map(Self::Form))
                .collect(),
            Self::Section(section) => section.writables().iter().map(Self::from).collect(),
            Self::Filter(filter) => filter.next_filter().map(Self::Filter).into_iter().collect(),
        }
    }

    fn rows_then_filter(rows: &'a [Row], filter: &'a Filter) -> Vec<Self> {
        let mut children: Vec<Self> = rows.iter().map(Self::Row).collect();
        if !filter.is_identity() {
            children.push(Self::Filter(filter));
        }
        children
    }

    /// Visits this node and every descendant depth-first, with its depth.
    pub fn walk<F>(&self, visit: &mut F)
    where
        F: FnMut(&Self, usize),
    {
        self.walk_at(0, visit);
    }

    fn walk_at<F>(&self, depth: usize, visit: &mut F)
    where
        F: FnMut(&Self, usize),
    {
        visit(self, depth);
        for child in self.children() {
            child.walk_at(depth + 1, visit);
        }
    }
}

impl<'a> From<&'a Field> for Renderable<'a> {
    fn from(field: &'a Field) -> Self {
        Self::Field(field)
    }
}

impl<'a> From<&'a FieldBearer> for Renderable<'a> {
    fn from(bearer: &'a FieldBearer) -> Self {
        Self::FieldBearer(bearer)
    }
}

impl<'a> From<&'a Row> for Renderable<'a> {
    fn from(row: &'a Row) -> Self {
        Self::Row(row)
    }
}

impl<'a> From<&'a BaseForm> for Renderable<'a> {
    fn from(form: &'a BaseForm) -> Self {
        Self::Form(form)
    }
}

impl<'a> From<&'a TableForm> for Renderable<'a> {
    fn from(form: &'a TableForm) -> Self {
        Self::TableForm(form)
    }
}

impl<'a> From<&'a PickAForm> for Renderable<'a> {
    fn from(form: &'a PickAForm) -> Self {
        Self::PickAForm(form)
    }
}

impl<'a> From<&'a Table> for Renderable<'a> {
    fn from(table: &'a Table) -> Self {
        Self::Table(table)
    }
}

impl<'a> From<&'a Section> for Renderable<'a> {
    fn from(section: &'a Section) -> Self {
        Self::Section(section)
    }
}

impl<'a> From<&'a SectionItem> for Renderable<'a> {
    fn from(item: &'a SectionItem) -> Self {
        match item {
            SectionItem::Field(field) => Self::Field(field),
            SectionItem::Section(section) => Self::Section(section),
            SectionItem::Table(table) => Self::Table(table),
            SectionItem::Form(form) => Self::Form(&**form),
            SectionItem::TableForm(form) => Self::TableForm(form),
            SectionItem::PickAForm(form) => Self::PickAForm(form),
        }
    }
}

impl<'a> From<&'a Filter> for Renderable<'a> {
    fn from(filter: &'a Filter) -> Self {
        Self::Filter(filter)
    }
}
