use crate::domain::model::{BookField, BookRecord};
use serde_json::{Map, Value};

/// Picks which fields of a [`BookRecord`] end up in the output.
///
/// `include` is applied first (an empty list keeps everything), then
/// `exclude` removes fields from what is left.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSelection {
    pub include: Vec<BookField>,
    pub exclude: Vec<BookField>,
}

impl FieldSelection {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn include(fields: impl IntoIterator<Item = BookField>) -> Self {
        Self {
            include: fields.into_iter().collect(),
            exclude: Vec::new(),
        }
    }

    pub fn exclude(fields: impl IntoIterator<Item = BookField>) -> Self {
        Self {
            include: Vec::new(),
            exclude: fields.into_iter().collect(),
        }
    }

    /// Selected fields in declaration order.
    pub fn columns(&self) -> Vec<BookField> {
        BookField::ALL
            .into_iter()
            .filter(|field| self.include.is_empty() || self.include.contains(field))
            .filter(|field| !self.exclude.contains(field))
            .collect()
    }

    pub fn project(&self, book: &BookRecord) -> Map<String, Value> {
        self.columns()
            .into_iter()
            .map(|field| (field.as_str().to_string(), book.get(field)))
            .collect()
    }
}
