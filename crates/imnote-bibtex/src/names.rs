//! Name-list splitting for `author`, `editor` and friends
//!
//! BibTeX separates people with a bare `and` and writes each person as
//! either `First von Last` or `von Last, Jr, First`. Braced groups are
//! never split, so `{Barnes and Noble}` stays one corporate name.

use crate::entry::Creator;

/// Split a name-list field into creators
///
/// `and others` is dropped; it marks an abbreviated list, not a person.
pub fn split_creators(value: &str) -> Vec<Creator> {
    let mut names = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for token in split_top_level(value, char::is_whitespace) {
        if token.eq_ignore_ascii_case("and") {
            names.push(current.join(" "));
            current.clear();
        } else {
            current.push(token);
        }
    }
    names.push(current.join(" "));

    names
        .iter()
        .map(|name| name.trim())
        .filter(|name| !name.is_empty() && !name.eq_ignore_ascii_case("others"))
        .map(parse_name)
        .collect()
}

/// Parse a single person
pub fn parse_name(name: &str) -> Creator {
    let parts: Vec<String> = split_top_level(name, |c| c == ',')
        .into_iter()
        .map(|p| p.trim().to_string())
        .collect();

    match parts.as_slice() {
        [] => Creator::default(),
        [single] => parse_first_last(single),
        [last, rest @ ..] => {
            // `von Last, First` or `von Last, Jr, First`
            let first = rest.last().map(String::as_str).unwrap_or_default();
            Creator {
                first_name: non_empty(first),
                last_name: non_empty(last),
            }
        }
    }
}

fn parse_first_last(name: &str) -> Creator {
    let words = split_top_level(name, char::is_whitespace);

    if words.len() <= 1 {
        return Creator {
            first_name: None,
            last_name: words.first().and_then(|w| non_empty(w)),
        };
    }

    // The last name starts at the first lower-case particle ("van", "de"),
    // or is just the final word.
    let last_start = words[1..words.len() - 1]
        .iter()
        .position(|w| w.starts_with(|c: char| c.is_lowercase()))
        .map(|i| i + 1)
        .unwrap_or(words.len() - 1);

    Creator {
        first_name: non_empty(&words[..last_start].join(" ")),
        last_name: non_empty(&words[last_start..].join(" ")),
    }
}

/// Split on `is_sep` characters that are not inside braces
fn split_top_level(input: &str, is_sep: impl Fn(char) -> bool) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;

    for c in input.chars() {
        match c {
            '{' => {
                depth += 1;
                current.push(c);
            }
            '}' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            c if depth == 0 && is_sep(c) => {
                if !current.is_empty() {
                    parts.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }

    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

fn non_empty(s: &str) -> Option<String> {
    let cleaned: String = s.chars().filter(|c| *c != '{' && *c != '}').collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_last() {
        assert_eq!(
            parse_name("Albert Einstein"),
            Creator::new(Some("Albert"), Some("Einstein"))
        );
    }

    #[test]
    fn test_last_comma_first() {
        assert_eq!(
            parse_name("Einstein, Albert"),
            Creator::new(Some("Albert"), Some("Einstein"))
        );
    }

    #[test]
    fn test_junior_part_is_skipped() {
        assert_eq!(
            parse_name("King, Jr, Martin Luther"),
            Creator::new(Some("Martin Luther"), Some("King"))
        );
    }

    #[test]
    fn test_von_particle_joins_last_name() {
        assert_eq!(
            parse_name("Ludwig van Beethoven"),
            Creator::new(Some("Ludwig"), Some("van Beethoven"))
        );
    }

    #[test]
    fn test_single_word_is_last_name() {
        assert_eq!(parse_name("Aristotle"), Creator::new(None, Some("Aristotle")));
    }

    #[test]
    fn test_braced_corporate_name_is_not_split() {
        let creators = split_creators("{Barnes and Noble} and Jane Doe");
        assert_eq!(creators.len(), 2);
        assert_eq!(creators[0], Creator::new(None, Some("Barnes and Noble")));
        assert_eq!(creators[1], Creator::new(Some("Jane"), Some("Doe")));
    }

    #[test]
    fn test_and_others_is_dropped() {
        let creators = split_creators("Smith, John and others");
        assert_eq!(creators, vec![Creator::new(Some("John"), Some("Smith"))]);
    }

    #[test]
    fn test_empty_list() {
        assert!(split_creators("   ").is_empty());
    }
}
