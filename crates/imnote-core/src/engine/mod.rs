//! Citation engine adapter
//!
//! Style semantics live in an external processor behind [`StyleProcessor`].
//! A [`CitationSession`] owns the records registered during one generation
//! pass and feeds them to the processor through [`Sys`].

mod citeproc;
mod resources;
mod session;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::record::CitationRecord;

pub use citeproc::{CiteprocCommand, CiteprocFactory};
pub use resources::{fetch_locale, fetch_style, style_url, LOCALE_URL, STYLES_URL};
pub use session::{CitationSession, SessionSys};

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Could not connect to {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("Could not start style processor '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Style processor failed: {0}")]
    Processor(String),

    #[error("Unknown citation item: {0}")]
    UnknownItem(String),
}

/// Callbacks the processor uses to pull data out of the session
pub trait Sys {
    /// Locale XML for a language; the session serves its one locale for every language
    fn retrieve_locale(&self, lang: &str) -> Option<&str>;

    fn retrieve_item(&self, id: &str) -> Option<&CitationRecord>;
}

/// A citation cluster in the shape citeproc processors expect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationCluster {
    #[serde(rename = "citationID")]
    pub citation_id: String,
    #[serde(rename = "citationItems")]
    pub items: Vec<ClusterItem>,
    pub properties: ClusterProperties,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterItem {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterProperties {
    pub index: u32,
    #[serde(rename = "noteIndex")]
    pub note_index: u32,
}

impl CitationCluster {
    /// A cluster citing one item, first in the document, in note 1
    pub fn single(id: &str) -> Self {
        Self {
            citation_id: id.to_string(),
            items: vec![ClusterItem { id: id.to_string() }],
            properties: ClusterProperties {
                index: 0,
                note_index: 1,
            },
        }
    }
}

/// A citation style processor loaded with one style
pub trait StyleProcessor {
    /// Render a cluster as HTML without adding it to the document state
    fn preview_citation_cluster(
        &mut self,
        sys: &dyn Sys,
        cluster: &CitationCluster,
    ) -> Result<String, EngineError>;

    /// Replace the list of items the bibliography covers
    fn update_items(&mut self, ids: &[String]);

    /// Bibliography entries as `(id, html)` in the style's order
    fn make_bibliography(&mut self, sys: &dyn Sys) -> Result<Vec<(String, String)>, EngineError>;
}

/// Builds a processor for a style's XML
pub trait ProcessorFactory {
    fn build(&self, style: &str) -> Result<Box<dyn StyleProcessor>, EngineError>;
}
