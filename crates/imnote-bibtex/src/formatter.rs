//! BibTeX formatting module
//!
//! Converts [`RawEntry`] structures back to BibTeX source text.

use super::entry::RawEntry;

/// Format a single BibTeX entry to string
pub fn format_entry(entry: &RawEntry) -> String {
    let mut result = String::new();

    // Entry type and cite key
    result.push('@');
    result.push_str(&entry.entry_type);
    result.push('{');
    result.push_str(&entry.key);
    result.push(',');
    result.push('\n');

    // A repeated field is written once per value
    for (key, values) in &entry.fields {
        for value in values {
            result.push_str("  ");
            result.push_str(key);
            result.push_str(" = ");
            result.push_str(&format_field_value(value));
            result.push(',');
            result.push('\n');
        }
    }

    result.push('}');
    result
}

/// Format multiple entries to a single BibTeX string
pub fn format_entries(entries: &[RawEntry]) -> String {
    entries
        .iter()
        .map(format_entry)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Format a field value, choosing appropriate delimiters
fn format_field_value(value: &str) -> String {
    // Check if the value is purely numeric
    if !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()) {
        return value.to_string();
    }

    // Braces preserve LaTeX commands and formatting
    let mut result = String::with_capacity(value.len() + 2);
    result.push('{');
    result.push_str(value);
    result.push('}');
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn test_format_simple_entry() {
        let mut entry = RawEntry::new("Smith2024", "article");
        entry.add_field("author", "John Smith");
        entry.add_field("title", "A Great Paper");
        entry.add_field("year", "2024");

        let formatted = format_entry(&entry);
        assert!(formatted.starts_with("@article{Smith2024,\n"));
        assert!(formatted.contains("  author = {John Smith},\n"));
        assert!(formatted.contains("  title = {A Great Paper},\n"));
        // Year is numeric, so no braces
        assert!(formatted.contains("  year = 2024,\n"));
        assert!(formatted.ends_with('}'));
    }

    #[test]
    fn test_empty_value_is_braced() {
        let mut entry = RawEntry::new("k", "book");
        entry.add_field("isbn", "");
        assert!(format_entry(&entry).contains("isbn = {},"));
    }

    #[test]
    fn test_formatted_entry_parses_back() {
        let mut entry = RawEntry::new("knuth1984literate", "book");
        entry.add_field("title", "Literate Programming");
        entry.add_field("author", "Donald E. Knuth");
        entry.add_field("year", "1984");

        let parsed = parse(&format_entries(&[entry.clone()]));
        assert_eq!(parsed.entries.len(), 1);
        assert_eq!(parsed.entries[0].fields, entry.fields);
        assert_eq!(parsed.entries[0].creators, entry.creators);
    }
}
