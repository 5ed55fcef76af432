//! Error types for imnote-core

use imnote_bibtex::ParseError;
use imnote_providers::ProviderError;
use thiserror::Error;

/// Result type alias for generation passes
pub type Result<T> = std::result::Result<T, GenerateError>;

/// Errors that abort a whole batch
///
/// Anything that only affects one entry is recorded in the batch report
/// instead.
#[derive(Error, Debug)]
pub enum GenerateError {
    /// The input could not be parsed as BibTeX
    #[error("Could not parse BibTeX input: {0}")]
    Parse(#[from] ParseError),

    /// The matched provider could not produce BibTeX
    #[error("Lookup failed: {0}")]
    Provider(#[from] ProviderError),

    /// The requested template type is not one of the BibTeX types
    #[error("Unknown template type: {0}")]
    UnknownTemplateType(String),
}
