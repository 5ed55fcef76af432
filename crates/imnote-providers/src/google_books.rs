//! Google Books provider for ISBN lookups
//!
//! API docs: https://developers.google.com/books/docs/v1/using
//!
//! The volumes API answers with JSON, so a `@book` record is synthesized
//! from the first returned volume.

use imnote_bibtex::{format_entry, RawEntry};
use serde::Deserialize;
use tracing::debug;

use crate::cite_key::generate_cite_key;
use crate::extractors::match_isbn;
use crate::http::{HttpRequest, HttpTransport};
use crate::resolver::ProviderError;

pub const GOOGLE_BOOKS_URL: &str = "https://www.googleapis.com/books/v1/volumes";

// Requests without a browser agent are sometimes answered with an empty list
const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

#[derive(Debug, Deserialize)]
struct VolumesResponse {
    #[serde(default)]
    items: Vec<Volume>,
}

#[derive(Debug, Deserialize)]
struct Volume {
    #[serde(rename = "volumeInfo")]
    volume_info: VolumeInfo,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeInfo {
    title: Option<String>,
    #[serde(default)]
    authors: Vec<String>,
    published_date: Option<String>,
    publisher: Option<String>,
    preview_link: Option<String>,
    #[serde(default)]
    industry_identifiers: Vec<IndustryIdentifier>,
}

#[derive(Debug, Deserialize)]
struct IndustryIdentifier {
    #[serde(rename = "type")]
    kind: String,
    identifier: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleBooksProvider {
    isbn: String,
}

impl GoogleBooksProvider {
    /// Match a bare ISBN-10 or ISBN-13, hyphens and spaces allowed
    pub fn matches(input: &str) -> Option<Self> {
        match_isbn(input).map(|isbn| Self { isbn })
    }

    pub fn isbn(&self) -> &str {
        &self.isbn
    }

    pub fn endpoint(&self) -> String {
        format!("{}?q=isbn:{}", GOOGLE_BOOKS_URL, self.isbn)
    }

    pub async fn fetch<T: HttpTransport>(&self, http: &T) -> Result<String, ProviderError> {
        let url = self.endpoint();
        debug!(url = %url, "Fetching Google Books volume");

        let request = HttpRequest::get(url)
            .header("User-Agent", BROWSER_USER_AGENT)
            .header("Accept", "application/json");
        let response = http.get(&request).await?;

        if !response.is_success() {
            return Err(ProviderError::Status {
                provider: "Google Books",
                status: response.status,
            });
        }

        let volumes: VolumesResponse = response.json().map_err(|e| ProviderError::Parse {
            message: e.to_string(),
        })?;
        let volume = volumes
            .items
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::NotFound {
                isbn: self.isbn.clone(),
            })?;

        Ok(synthesize_bibtex(&volume.volume_info, &self.isbn))
    }
}

/// Build a `@book` entry; `isbn` is the searched one and names the entry
/// when the volume has nothing a cite key can be made from
fn synthesize_bibtex(info: &VolumeInfo, isbn: &str) -> String {
    let year: Option<String> = info
        .published_date
        .as_deref()
        .map(|date| date.chars().take(4).collect());

    let mut key = generate_cite_key(
        info.authors.first().map(String::as_str),
        year.as_deref(),
        info.title.as_deref(),
    );
    if key.is_empty() {
        key = format!("isbn{}", isbn.to_ascii_lowercase());
    }

    let mut entry = RawEntry::new(key, "book");
    if let Some(title) = &info.title {
        entry.add_field("title", title.as_str());
    }
    if !info.authors.is_empty() {
        entry.add_field("author", info.authors.join(" and "));
    }
    if let Some(year) = year {
        entry.add_field("year", year);
    }
    if let Some(publisher) = &info.publisher {
        entry.add_field("publisher", publisher.as_str());
    }
    if let Some(link) = &info.preview_link {
        entry.add_field("url", link.as_str());
    }

    let isbn13 = info
        .industry_identifiers
        .iter()
        .find(|id| id.kind == "ISBN_13")
        .map(|id| id.identifier.as_str())
        .unwrap_or_default();
    entry.add_field("isbn", isbn13);

    format_entry(&entry)
}
