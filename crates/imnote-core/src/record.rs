//! Citation records in CSL-JSON shape and the per-session store

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A person as CSL-JSON expects it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub given: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
}

/// A CSL date, always a single `[year, month, day]` part here
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateParts {
    #[serde(rename = "date-parts")]
    pub date_parts: Vec<Vec<i32>>,
}

impl DateParts {
    pub fn ymd(year: i32, month: i32, day: i32) -> Self {
        Self {
            date_parts: vec![vec![year, month, day]],
        }
    }

    /// A year-only date, pinned to the first of January
    pub fn year(year: i32) -> Self {
        Self::ymd(year, 1, 1)
    }
}

/// The processor-ready form of one bibliography entry
///
/// `id` is fixed at construction and is the only key the [`RecordStore`]
/// looks records up by. Fields without a typed slot ride along in `extra`
/// and are flattened into the JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationRecord {
    id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "URL", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(rename = "DOI", skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub author: Vec<Name>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued: Option<DateParts>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accessed: Option<DateParts>,
    #[serde(flatten)]
    pub extra: IndexMap<String, String>,
}

/// Keys with a typed slot in [`CitationRecord`]; never stored in `extra`
pub(crate) const RESERVED_KEYS: &[&str] = &[
    "id", "type", "title", "url", "doi", "publisher", "published", "author", "issued", "accessed",
];

impl CitationRecord {
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            title: None,
            url: None,
            doi: None,
            publisher: None,
            published: None,
            author: Vec::new(),
            issued: None,
            accessed: None,
            extra: IndexMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Records registered during one session, keyed by id
///
/// Registration order is kept separately, including repeats, since it
/// drives bibliography order.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: IndexMap<String, CitationRecord>,
    order: Vec<String>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a record and append its id to the order
    pub fn insert(&mut self, record: CitationRecord) {
        let id = record.id().to_string();
        self.records.insert(id.clone(), record);
        self.order.push(id);
    }

    pub fn get(&self, id: &str) -> Option<&CitationRecord> {
        self.records.get(id)
    }

    /// Ids in registration order; an id registered twice appears twice
    pub fn ids(&self) -> &[String] {
        &self.order
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
