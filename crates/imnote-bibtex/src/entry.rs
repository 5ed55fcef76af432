//! BibTeX entry data structures

use indexmap::IndexMap;

use crate::names::split_creators;

/// Fields whose values are name lists rather than plain text.
pub const CREATOR_ROLES: &[&str] = &["author", "editor", "translator", "bookauthor"];

/// BibTeX entry type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BibTeXEntryType {
    Article,
    Book,
    Booklet,
    Conference,
    InBook,
    InCollection,
    InProceedings,
    Manual,
    MastersThesis,
    Misc,
    PhdThesis,
    Proceedings,
    TechReport,
    Unpublished,
    Online,
    Software,
    Dataset,
    Unknown,
}

impl BibTeXEntryType {
    /// Parse an entry type from a string (case-insensitive)
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "article" => Self::Article,
            "book" => Self::Book,
            "booklet" => Self::Booklet,
            "conference" => Self::Conference,
            "inbook" => Self::InBook,
            "incollection" => Self::InCollection,
            "inproceedings" => Self::InProceedings,
            "manual" => Self::Manual,
            "mastersthesis" => Self::MastersThesis,
            "misc" => Self::Misc,
            "phdthesis" => Self::PhdThesis,
            "proceedings" => Self::Proceedings,
            "techreport" => Self::TechReport,
            "unpublished" => Self::Unpublished,
            "online" | "electronic" | "www" => Self::Online,
            "software" => Self::Software,
            "dataset" => Self::Dataset,
            _ => Self::Unknown,
        }
    }

    /// Convert entry type to canonical string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Article => "article",
            Self::Book => "book",
            Self::Booklet => "booklet",
            Self::Conference => "conference",
            Self::InBook => "inbook",
            Self::InCollection => "incollection",
            Self::InProceedings => "inproceedings",
            Self::Manual => "manual",
            Self::MastersThesis => "mastersthesis",
            Self::Misc => "misc",
            Self::PhdThesis => "phdthesis",
            Self::Proceedings => "proceedings",
            Self::TechReport => "techreport",
            Self::Unpublished => "unpublished",
            Self::Online => "online",
            Self::Software => "software",
            Self::Dataset => "dataset",
            Self::Unknown => "misc",
        }
    }

    /// The classic BibTeX types a note template can be assigned to
    pub fn template_types() -> &'static [BibTeXEntryType] {
        &[
            Self::Article,
            Self::Book,
            Self::Booklet,
            Self::Conference,
            Self::InBook,
            Self::InCollection,
            Self::InProceedings,
            Self::Manual,
            Self::MastersThesis,
            Self::Misc,
            Self::PhdThesis,
            Self::Proceedings,
            Self::TechReport,
            Self::Unpublished,
        ]
    }
}

/// One person in a name list, split the way BibTeX splits names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Creator {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl Creator {
    pub fn new(first_name: Option<&str>, last_name: Option<&str>) -> Self {
        Self {
            first_name: first_name.map(str::to_string),
            last_name: last_name.map(str::to_string),
        }
    }
}

/// A parsed BibTeX entry
///
/// Field names are stored lower-cased. A field repeated in the source keeps
/// every value in order. Name-list fields are additionally split into
/// [`Creator`]s under their role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    pub key: String,
    pub entry_type: String,
    pub fields: IndexMap<String, Vec<String>>,
    pub creators: IndexMap<String, Vec<Creator>>,
    pub raw_bibtex: Option<String>,
}

impl RawEntry {
    /// Create a new entry; the type tag is lower-cased
    pub fn new(key: impl Into<String>, entry_type: impl AsRef<str>) -> Self {
        Self {
            key: key.into(),
            entry_type: entry_type.as_ref().to_lowercase(),
            fields: IndexMap::new(),
            creators: IndexMap::new(),
            raw_bibtex: None,
        }
    }

    /// Add a field value to the entry
    pub fn add_field(&mut self, key: impl AsRef<str>, value: impl Into<String>) {
        let key = key.as_ref().to_lowercase();
        let value = value.into();

        if CREATOR_ROLES.contains(&key.as_str()) {
            self.creators
                .entry(key.clone())
                .or_default()
                .extend(split_creators(&value));
        }

        self.fields.entry(key).or_default().push(value);
    }

    /// Get the first value of a field (case-insensitive)
    pub fn get_field(&self, key: &str) -> Option<&str> {
        self.fields
            .get(&key.to_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Creators recorded under a role such as `author`
    pub fn creators(&self, role: &str) -> Option<&[Creator]> {
        self.creators.get(role).map(Vec::as_slice)
    }

}
