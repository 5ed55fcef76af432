//! Provider selection for free-form user input
//!
//! Providers are tried in a fixed order and the first one whose matcher
//! accepts the input is used exclusively. A failed fetch is reported, never
//! retried with the next provider.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::arxiv::ArxivProvider;
use crate::google_books::GoogleBooksProvider;
use crate::http::{HttpError, HttpTransport};

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error(transparent)]
    Http(#[from] HttpError),
    #[error("{provider} answered with status {status}")]
    Status { provider: &'static str, status: u16 },
    #[error("No volume found for ISBN {isbn}")]
    NotFound { isbn: String },
    #[error("Unexpected response: {message}")]
    Parse { message: String },
}

/// The kinds of provider, in matching order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Arxiv,
    GoogleBooks,
}

impl ProviderKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Arxiv => "arXiv",
            Self::GoogleBooks => "Google Books",
        }
    }
}

/// A provider that accepted some input, holding the identifier it extracted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provider {
    Arxiv(ArxivProvider),
    GoogleBooks(GoogleBooksProvider),
}

impl Provider {
    /// Every provider kind, in the order they are tried
    pub fn all_kinds() -> &'static [ProviderKind] {
        &[ProviderKind::Arxiv, ProviderKind::GoogleBooks]
    }

    /// Find the first provider that accepts the input
    pub fn detect(input: &str) -> Option<Self> {
        Self::all_kinds().iter().find_map(|kind| match kind {
            ProviderKind::Arxiv => ArxivProvider::matches(input).map(Self::Arxiv),
            ProviderKind::GoogleBooks => GoogleBooksProvider::matches(input).map(Self::GoogleBooks),
        })
    }

    /// The normalized identifier the provider will look up
    pub fn identifier(&self) -> &str {
        match self {
            Self::Arxiv(p) => p.id(),
            Self::GoogleBooks(p) => p.isbn(),
        }
    }

    pub fn kind(&self) -> ProviderKind {
        match self {
            Self::Arxiv(_) => ProviderKind::Arxiv,
            Self::GoogleBooks(_) => ProviderKind::GoogleBooks,
        }
    }

    /// Fetch the BibTeX text for the matched identifier
    pub async fn fetch<T: HttpTransport>(&self, http: &T) -> Result<String, ProviderError> {
        match self {
            Self::Arxiv(p) => p.fetch(http).await,
            Self::GoogleBooks(p) => p.fetch(http).await,
        }
    }
}

/// Turn user input into BibTeX text through the matching provider
///
/// Returns `Ok(None)` when the input already holds BibTeX entries or no
/// provider recognizes it, in which case the caller should treat the input
/// itself as BibTeX.
pub async fn resolve_input<T: HttpTransport>(
    input: &str,
    http: &T,
) -> Result<Option<String>, ProviderError> {
    // Pasted entries routinely carry arXiv URLs and ISBNs of their own
    if !imnote_bibtex::parse(input).entries.is_empty() {
        debug!("Input contains BibTeX entries, skipping provider lookup");
        return Ok(None);
    }

    let Some(provider) = Provider::detect(input) else {
        debug!("No provider matched, treating input as BibTeX");
        return Ok(None);
    };

    let name = provider.kind().name();
    let identifier = provider.identifier();
    match provider.fetch(http).await {
        Ok(bibtex) => {
            info!(provider = name, identifier, "Resolved input through provider");
            Ok(Some(bibtex))
        }
        Err(e) => {
            warn!(provider = name, identifier, error = %e, "Provider lookup failed");
            Err(e)
        }
    }
}
