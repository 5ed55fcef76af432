//! arXiv provider
//!
//! arXiv serves a ready-made BibTeX record for every paper, so the body is
//! handed back verbatim.

use tracing::debug;

use crate::extractors::match_arxiv_id;
use crate::http::{HttpRequest, HttpTransport};
use crate::resolver::ProviderError;

pub const ARXIV_BIBTEX_URL: &str = "https://arxiv.org/bibtex";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArxivProvider {
    id: String,
}

impl ArxivProvider {
    /// Match user input such as `arXiv:2301.00001` or an abs/pdf URL
    pub fn matches(input: &str) -> Option<Self> {
        match_arxiv_id(input).map(|id| Self { id })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn endpoint(&self) -> String {
        format!("{}/{}", ARXIV_BIBTEX_URL, self.id)
    }

    pub async fn fetch<T: HttpTransport>(&self, http: &T) -> Result<String, ProviderError> {
        let url = self.endpoint();
        debug!(url = %url, "Fetching arXiv BibTeX");

        let response = http.get(&HttpRequest::get(url)).await?;
        if !response.is_success() {
            return Err(ProviderError::Status {
                provider: "arXiv",
                status: response.status,
            });
        }

        Ok(response.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_prefixed_id() {
        let provider = ArxivProvider::matches("arXiv:2301.00001").unwrap();
        assert_eq!(provider.id(), "2301.00001");
        assert_eq!(provider.endpoint(), "https://arxiv.org/bibtex/2301.00001");
    }

    #[test]
    fn test_matches_pdf_url_with_version() {
        let provider = ArxivProvider::matches("https://arxiv.org/pdf/2107.12345v2").unwrap();
        assert_eq!(provider.id(), "2107.12345");
    }

    #[test]
    fn test_rejects_plain_text() {
        assert!(ArxivProvider::matches("not an id").is_none());
        assert!(ArxivProvider::matches("2301.00001").is_none());
    }
}
