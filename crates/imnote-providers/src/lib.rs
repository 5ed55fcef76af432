//! Identifier resolution for imnote
//!
//! Turns loosely formatted user input (an arXiv reference, an ISBN) into
//! BibTeX text by asking the matching external source:
//! - [`Provider::detect`] picks the first provider whose matcher accepts the input
//! - [`resolve_input`] fetches through that provider
//! - [`HttpTransport`] is the network seam, [`HttpClient`] the reqwest implementation

pub mod arxiv;
pub mod cite_key;
pub mod extractors;
pub mod google_books;
pub mod http;
pub mod resolver;

pub use arxiv::ArxivProvider;
pub use cite_key::generate_cite_key;
pub use extractors::{match_arxiv_id, match_isbn, normalize_isbn};
pub use google_books::GoogleBooksProvider;
pub use http::{HttpClient, HttpError, HttpRequest, HttpResponse, HttpTransport};
pub use resolver::{resolve_input, Provider, ProviderError, ProviderKind};
