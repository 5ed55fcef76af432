//! HTML fragments from the style processor to Markdown

use lazy_static::lazy_static;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;

lazy_static! {
    static ref TAG: Regex = Regex::new(r"<[^>]*>").unwrap();
    static ref SPACES: Regex = Regex::new(r"[ \t]+").unwrap();
    static ref BLANK_LINES: Regex = Regex::new(r"\n{3,}").unwrap();
}

/// Convert a processor HTML fragment to Markdown
///
/// Handles emphasis, strong, links, line breaks and block separation.
/// Unknown elements keep their text. Input that does not parse falls back
/// to the text with tags removed.
pub fn html_to_markdown(html: &str) -> String {
    match convert(html) {
        Some(markdown) => tidy(&markdown),
        None => tidy(&decode_entities(&TAG.replace_all(html, ""))),
    }
}

fn convert(html: &str) -> Option<String> {
    let mut reader = Reader::from_str(html);
    reader.trim_text(false);
    reader.check_end_names(false);

    let mut out = String::new();
    let mut links: Vec<Option<String>> = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"i" | b"em" => out.push('*'),
                b"b" | b"strong" => out.push_str("**"),
                b"a" => {
                    let href = e
                        .attributes()
                        .flatten()
                        .find(|attr| attr.key.as_ref() == b"href")
                        .map(|attr| String::from_utf8_lossy(&attr.value).to_string());
                    if href.is_some() {
                        out.push('[');
                    }
                    links.push(href);
                }
                b"br" => out.push('\n'),
                b"div" | b"p" => paragraph_break(&mut out),
                _ => {}
            },
            Ok(Event::Empty(ref e)) => {
                if e.name().as_ref() == b"br" {
                    out.push('\n');
                }
            }
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"i" | b"em" => out.push('*'),
                b"b" | b"strong" => out.push_str("**"),
                b"a" => {
                    if let Some(Some(href)) = links.pop() {
                        out.push_str("](");
                        out.push_str(&href);
                        out.push(')');
                    }
                }
                b"div" | b"p" => paragraph_break(&mut out),
                _ => {}
            },
            Ok(Event::Text(e)) => {
                let text = e.unescape_with(html_entity).ok()?;
                push_text(&mut out, &text);
            }
            Ok(Event::CData(e)) => {
                push_text(&mut out, &String::from_utf8_lossy(&e));
            }
            Ok(Event::Eof) => break,
            Err(_) => return None,
            _ => {}
        }
        buf.clear();
    }

    Some(out)
}

fn push_text(out: &mut String, text: &str) {
    for c in text.chars() {
        if c.is_whitespace() {
            if !out.ends_with([' ', '\n']) && !out.is_empty() {
                out.push(' ');
            }
        } else {
            out.push(c);
        }
    }
}

fn paragraph_break(out: &mut String) {
    if !out.is_empty() && !out.ends_with("\n\n") {
        while out.ends_with(' ') {
            out.pop();
        }
        out.push_str("\n\n");
    }
}

/// Collapse whitespace runs and trim every line
fn tidy(text: &str) -> String {
    let lines: Vec<String> = text
        .split('\n')
        .map(|line| SPACES.replace_all(line, " ").trim().to_string())
        .collect();
    BLANK_LINES
        .replace_all(&lines.join("\n"), "\n\n")
        .trim()
        .to_string()
}

/// Entities citeproc output uses beyond the five XML ones
fn html_entity(name: &str) -> Option<&'static str> {
    Some(match name {
        "nbsp" => " ",
        "ndash" => "\u{2013}",
        "mdash" => "\u{2014}",
        "hellip" => "\u{2026}",
        "lsquo" => "\u{2018}",
        "rsquo" => "\u{2019}",
        "ldquo" => "\u{201C}",
        "rdquo" => "\u{201D}",
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" => "'",
        _ => return None,
    })
}

fn decode_entities(text: &str) -> String {
    quick_xml::escape::unescape_with(text, html_entity)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| text.to_string())
}
