//! Result of scanning one collection.

use std::{cmp::Ordering, collections::HashSet};

use quire_core::{CoreError, Entry, FieldValue, ValidationError};
use serde::{Serialize, de::DeserializeOwned};

/// Entries and rejected documents of a single `load_all` call.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadedCollection {
    /// Collection name.
    pub name: String,

    /// Valid entries in discovery order.
    pub entries: Vec<Entry>,

    /// Rejected documents, in discovery order.
    #[serde(skip)]
    pub errors: Vec<ValidationError>,
}

/// A loose reference whose target id is not an entry of the collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DanglingReference {
    /// Id of the referencing entry.
    pub from: String,

    /// Field holding the reference.
    pub field: String,

    /// Referenced id that was not found.
    pub target: String,
}

impl LoadedCollection {
    /// Find an entry by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Whether every discovered document validated.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Entries not flagged with `isDraft: true`.
    pub fn published(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(|e| !e.is_draft())
    }

    /// Entries sorted newest first by a date field.
    ///
    /// Entries without the field go last; ties are broken by id.
    #[must_use]
    pub fn sorted_by_date(&self, field: &str) -> Vec<&Entry> {
        let mut entries: Vec<_> = self.entries.iter().collect();
        entries.sort_by(|a, b| match (b.date_field(field), a.date_field(field)) {
            (Some(b_date), Some(a_date)) => b_date.cmp(&a_date).then_with(|| a.id.cmp(&b.id)),
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => a.id.cmp(&b.id),
        });
        entries
    }

    /// Loose references in a string-list field that match no entry id.
    #[must_use]
    pub fn dangling_references(&self, field: &str) -> Vec<DanglingReference> {
        let ids: HashSet<&str> = self.entries.iter().map(|e| e.id.as_str()).collect();
        let ids = &ids;

        self.entries
            .iter()
            .flat_map(move |entry| {
                entry
                    .get(field)
                    .and_then(FieldValue::as_list)
                    .unwrap_or_default()
                    .iter()
                    .filter(move |target| !ids.contains(target.as_str()))
                    .map(move |target| DanglingReference {
                        from: entry.id.clone(),
                        field: field.to_string(),
                        target: target.clone(),
                    })
            })
            .collect()
    }

    /// Deserialize every entry into a typed record.
    pub fn typed<T: DeserializeOwned>(&self) -> Result<Vec<T>, CoreError> {
        self.entries.iter().map(Entry::data_as::<T>).collect()
    }
}
