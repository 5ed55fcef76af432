//! Identifier recognition in free-form user input

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // arXiv: a bare "arXiv:2301.00001" token or an abs/pdf URL. The version
    // suffix is accepted but not kept, the export endpoint wants the bare id.
    static ref ARXIV_INPUT: Regex = Regex::new(
        r"(?i)(?:arxiv:\s*|arxiv\.org/\s*(?:abs|pdf)\s*/)\s*(?P<id>\d{4}\.\d{4,5})(?:v\d+)?"
    ).unwrap();

    // ISBN-10 (check digit may be X) or ISBN-13, after normalization
    static ref ISBN_INPUT: Regex = Regex::new(r"^(?:[0-9]{9}[0-9X]|[0-9]{13})$").unwrap();
}

/// Extract the arXiv identifier from user input
pub fn match_arxiv_id(input: &str) -> Option<String> {
    ARXIV_INPUT
        .captures(input)
        .and_then(|cap| cap.name("id"))
        .map(|m| m.as_str().to_string())
}

/// Normalize ISBN by removing hyphens and whitespace
pub fn normalize_isbn(input: &str) -> String {
    input
        .chars()
        .filter(|c| *c != '-' && !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

/// Extract a 10- or 13-digit ISBN from user input
///
/// The whole input must be the ISBN; no checksum is verified.
pub fn match_isbn(input: &str) -> Option<String> {
    let isbn = normalize_isbn(input);
    ISBN_INPUT.is_match(&isbn).then_some(isbn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arxiv_token() {
        assert_eq!(match_arxiv_id("arXiv:2301.00001"), Some("2301.00001".into()));
        assert_eq!(match_arxiv_id("arxiv: 2301.00001"), Some("2301.00001".into()));
    }

    #[test]
    fn test_arxiv_urls() {
        assert_eq!(
            match_arxiv_id("https://arxiv.org/abs/2301.00001"),
            Some("2301.00001".into())
        );
        assert_eq!(
            match_arxiv_id("https://arxiv.org/pdf/1706.03762v7"),
            Some("1706.03762".into())
        );
    }

    #[test]
    fn test_arxiv_rejects_plain_text() {
        assert_eq!(match_arxiv_id("not an id"), None);
        // A bare number without the arXiv marker is ambiguous
        assert_eq!(match_arxiv_id("2301.00001"), None);
    }

    #[test]
    fn test_isbn_normalization() {
        assert_eq!(normalize_isbn("978-3-16-148410-0"), "9783161484100");
        assert_eq!(normalize_isbn("0 306 40615 x"), "030640615X");
    }

    #[test]
    fn test_isbn_matching() {
        assert_eq!(match_isbn("978-3-16-148410-0"), Some("9783161484100".into()));
        assert_eq!(match_isbn("0-8044-2957-X"), Some("080442957X".into()));
        assert_eq!(match_isbn("12345"), None);
        assert_eq!(match_isbn("978-3-16-148410-0 extra"), None);
    }
}
