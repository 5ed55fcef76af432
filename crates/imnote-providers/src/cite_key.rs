//! Cite keys for records synthesized from metadata APIs

use imnote_bibtex::parse_name;
use unicode_normalization::UnicodeNormalization;

/// Build a cite key as `{surname}{year}{titleword}`, all lower-case ASCII
///
/// The surname comes from BibTeX name splitting, so particles stay with it
/// (`van der Berg`). Missing parts are left out and the key may be empty.
pub fn generate_cite_key(first_author: Option<&str>, year: Option<&str>, title: Option<&str>) -> String {
    let surname = first_author.and_then(|author| parse_name(author).last_name);
    let title_word = title.and_then(|t| t.split_whitespace().next());

    [surname.as_deref(), year, title_word]
        .into_iter()
        .flatten()
        .flat_map(|part| part.nfkd())
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_cite_key() {
        assert_eq!(
            generate_cite_key(Some("Donald E. Knuth"), Some("1997"), Some("The Art of Computer Programming")),
            "knuth1997the"
        );
        assert_eq!(
            generate_cite_key(Some("Smith, John"), Some("2024"), Some("Deep Learning")),
            "smith2024deep"
        );
    }

    #[test]
    fn test_particles_stay_with_surname() {
        assert_eq!(
            generate_cite_key(Some("Jan van der Berg"), Some("2020"), Some("Dikes")),
            "vanderberg2020dikes"
        );
    }

    #[test]
    fn test_diacritics_and_punctuation_are_dropped() {
        assert_eq!(
            generate_cite_key(Some("François O'Müller"), Some("2024"), Some("Études, revisited")),
            "omuller2024etudes"
        );
    }

    #[test]
    fn test_missing_parts() {
        assert_eq!(generate_cite_key(None, Some("2001"), Some("Odyssey")), "2001odyssey");
        assert_eq!(generate_cite_key(Some("  "), None, None), "");
        assert_eq!(generate_cite_key(None, None, Some("日本語")), "");
    }
}
