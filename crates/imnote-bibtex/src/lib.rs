//! BibTeX parsing and formatting
//!
//! Parses BibTeX text into [`RawEntry`] values: lower-cased field names with
//! every value a field was given, plus the people in name-list fields split
//! into first and last names.
//!
//! Features:
//! - Nom-based parser that skips broken blocks and reports them
//! - `@string` substitution and `#` concatenation
//! - Name-list splitting that respects braced groups
//! - Formatting back to BibTeX source

mod entry;
mod formatter;
mod names;
pub mod parser;

pub use entry::{BibTeXEntryType, Creator, RawEntry, CREATOR_ROLES};
pub use formatter::{format_entries, format_entry};
pub use names::{parse_name, split_creators};
pub use parser::{parse, BibTeXParseError, BibTeXParseResult, ParseError};
