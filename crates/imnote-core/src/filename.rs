//! Note file names that are safe to create and do not collide

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref UNSAFE_CHARS: Regex = Regex::new(r#"[/\\?%*:|"<>()]"#).unwrap();
}

/// Name used when a file name template renders to nothing
pub const DEFAULT_NAME: &str = "Untitled";

/// Remove characters that are not allowed in note file names
///
/// Line breaks and other whitespace runs become a single space.
pub fn sanitize(name: &str) -> String {
    UNSAFE_CHARS
        .replace_all(name, "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Pick a file name for `desired` among the folder's `existing` children
///
/// Every existing name that starts with the sanitized base counts as a
/// potential collision, so the first free name of `"{base}.md"`,
/// `"{base} 2.md"`, `"{base} 3.md"`... is returned.
pub fn resolve<S: AsRef<str>>(desired: &str, existing: &[S]) -> String {
    let base = sanitize(desired);

    let taken: Vec<&str> = existing
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| name.starts_with(&base))
        .collect();

    let candidate = |i: usize| {
        if i == 0 {
            format!("{}.md", base)
        } else {
            format!("{} {}.md", base, i + 1)
        }
    };

    // With n taken names one of the first n + 1 candidates is always free
    (0..=taken.len())
        .map(candidate)
        .find(|name| !taken.contains(&name.as_str()))
        .unwrap_or_else(|| candidate(taken.len()))
}
