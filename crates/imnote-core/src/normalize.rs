//! Raw BibTeX entries to citation records

use chrono::{Datelike, NaiveDate};
use imnote_bibtex::RawEntry;
use tracing::debug;

use crate::record::{CitationRecord, DateParts, Name, RESERVED_KEYS};

/// Converts entries into [`CitationRecord`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    accessed: Option<NaiveDate>,
}

impl Normalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp every record with an access date
    pub fn with_accessed(date: NaiveDate) -> Self {
        Self {
            accessed: Some(date),
        }
    }

    /// Build the record for one entry. Never fails; odd fields are dropped
    /// or passed through rather than rejected.
    pub fn normalize(&self, entry: &RawEntry) -> CitationRecord {
        let mut record = CitationRecord::new(entry.key.clone(), entry.entry_type.clone());

        for (name, values) in &entry.fields {
            let Some(value) = values.first() else {
                continue;
            };

            // Name lists are carried by `creators`
            if entry.creators.contains_key(name) {
                continue;
            }

            match name.to_lowercase().as_str() {
                "year" => record.issued = parse_year(&entry.key, value).map(DateParts::year),
                "title" => record.title = Some(value.clone()),
                "url" => record.url = Some(value.clone()),
                "doi" => record.doi = Some(value.clone()),
                "publisher" => record.publisher = Some(value.clone()),
                "published" => record.published = Some(value.clone()),
                other if RESERVED_KEYS.contains(&other) => {
                    debug!(key = %entry.key, field = other, "Dropping field that shadows a record attribute");
                }
                _ => {
                    record.extra.insert(name.clone(), value.clone());
                }
            }
        }

        if let Some(authors) = entry.creators("author") {
            record.author = authors
                .iter()
                .map(|creator| Name {
                    given: creator.first_name.clone(),
                    family: creator.last_name.clone(),
                })
                .collect();
        }

        if let Some(date) = self.accessed {
            record.accessed = Some(DateParts::ymd(
                date.year(),
                date.month() as i32,
                date.day() as i32,
            ));
        }

        record
    }
}

/// Normalize without access-date tracking
pub fn normalize(entry: &RawEntry) -> CitationRecord {
    Normalizer::new().normalize(entry)
}

fn parse_year(key: &str, value: &str) -> Option<i32> {
    match value.trim().parse::<i32>() {
        Ok(year) => Some(year),
        Err(_) => {
            debug!(key, year = value, "Ignoring non-numeric year");
            None
        }
    }
}
