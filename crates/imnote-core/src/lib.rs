//! imnote-core: bibliographic entries in, templated Markdown notes out
//!
//! The pipeline runs in this order:
//! - [`normalize`] turns a parsed [`RawEntry`](imnote_bibtex::RawEntry) into a [`CitationRecord`]
//! - [`CitationSession`] drives a style processor to render inline citations and bibliographies
//! - [`template::apply`] substitutes `{{key}}` placeholders
//! - [`filename::resolve`] picks a collision-free note name
//!
//! [`Generator`] strings these together for whole batches against a [`Vault`].

pub mod config;
pub mod engine;
pub mod error;
pub mod filename;
pub mod generate;
pub mod markup;
pub mod normalize;
pub mod record;
pub mod template;
pub mod vault;

pub use config::{ConfigError, ProcessorConfig, Settings};
pub use engine::{
    CitationCluster, CitationSession, CiteprocCommand, CiteprocFactory, EngineError,
    ProcessorFactory, StyleProcessor, Sys,
};
pub use error::{GenerateError, Result};
pub use filename::resolve as resolve_file_name;
pub use generate::{CreateReport, EntryFailure, Generator, InsertReport};
pub use markup::html_to_markdown;
pub use normalize::{normalize, Normalizer};
pub use record::{CitationRecord, DateParts, Name, RecordStore};
pub use template::{apply, KeyPrecedence, Modifiers, TemplateContext};
pub use vault::{target_folder, FsVault, Vault, VaultError};
