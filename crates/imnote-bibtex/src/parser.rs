//! BibTeX parser built on nom
//!
//! Parsing happens in two passes. A [`Scanner`] walks the input and cuts it
//! into top-level `@kind{...}` or `@kind(...)` blocks, tracking the line and
//! column each block starts at. Each block body is then parsed with nom
//! combinators. A block that fails either pass is reported in
//! [`BibTeXParseResult::errors`] and the scan resumes after it.
//!
//! Field values are whitespace-normalized the way BibTeX itself reads them:
//! every run of spaces, tabs and newlines becomes a single space.

use std::collections::HashMap;

use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{char, digit1, multispace0},
    combinator::{all_consuming, map, opt},
    multi::{separated_list0, separated_list1},
    sequence::{delimited, preceded, separated_pair, terminated, tuple},
    IResult,
};

use super::entry::RawEntry;

/// Where and why a block was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibTeXParseError {
    pub line: u32,
    pub column: u32,
    pub message: String,
}

/// Everything recovered from one BibTeX text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibTeXParseResult {
    pub entries: Vec<RawEntry>,
    pub preambles: Vec<String>,
    /// `@string` macros, keyed by lower-cased name
    pub strings: HashMap<String, String>,
    pub errors: Vec<BibTeXParseError>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("No entries found ({failed} unparseable block(s), first at line {line})")]
    NoEntries { failed: usize, line: u32 },
}

impl BibTeXParseResult {
    /// Fail when the input contained broken blocks and nothing usable
    pub fn require_entries(self) -> Result<Self, ParseError> {
        match self.errors.first() {
            Some(first) if self.entries.is_empty() => Err(ParseError::NoEntries {
                failed: self.errors.len(),
                line: first.line,
            }),
            _ => Ok(self),
        }
    }
}

/// Parse BibTeX text, collecting entries and skipping broken blocks
pub fn parse(input: &str) -> BibTeXParseResult {
    let mut result = BibTeXParseResult {
        entries: Vec::new(),
        preambles: Vec::new(),
        strings: HashMap::new(),
        errors: Vec::new(),
    };

    let mut scanner = Scanner::new(input);
    while let Some(scanned) = scanner.next_block() {
        let block = match scanned {
            Ok(block) => block,
            Err(error) => {
                result.errors.push(error);
                continue;
            }
        };

        if let Err(message) = read_block(&block, &mut result) {
            result.errors.push(BibTeXParseError {
                line: block.line,
                column: block.column,
                message,
            });
        }
    }

    result
}

/// Interpret one block, adding what it defines to `result`
fn read_block(block: &Block<'_>, result: &mut BibTeXParseResult) -> Result<(), String> {
    let strings = &result.strings;
    match block.kind.to_ascii_lowercase().as_str() {
        "comment" => Ok(()),
        "preamble" => {
            let text = finish(block, all_consuming(ws(|i| value(i, strings)))(block.body))?;
            result.preambles.push(text);
            Ok(())
        }
        "string" => {
            let (name, text) = finish(
                block,
                all_consuming(terminated(
                    |i| field(i, strings),
                    opt(ws(char(','))),
                ))(block.body),
            )?;
            result.strings.insert(name, text);
            Ok(())
        }
        _ => {
            let (key, fields) = finish(block, all_consuming(|i| entry_body(i, strings))(block.body))?;
            let mut entry = RawEntry::new(key, block.kind);
            for (name, text) in fields {
                entry.add_field(name, text);
            }
            entry.raw_bibtex = Some(block.source.to_string());
            result.entries.push(entry);
            Ok(())
        }
    }
}

/// Turn a nom failure inside a block body into a readable message
fn finish<'a, O>(block: &Block<'a>, parsed: IResult<&'a str, O>) -> Result<O, String> {
    match parsed {
        Ok((_, output)) => Ok(output),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            let near: String = e.input.trim_start().chars().take(24).collect();
            if near.is_empty() {
                Err(format!("Incomplete @{} block", block.kind))
            } else {
                Err(format!("Unexpected text in @{} block near `{}`", block.kind, near))
            }
        }
        Err(nom::Err::Incomplete(_)) => Err(format!("Incomplete @{} block", block.kind)),
    }
}

/// A top-level block cut out of the input
struct Block<'a> {
    kind: &'a str,
    /// Text between the outer delimiters
    body: &'a str,
    /// The whole block, `@` through the closing delimiter
    source: &'a str,
    line: u32,
    column: u32,
}

/// Walks the input from block to block, keeping line and column counts
struct Scanner<'a> {
    input: &'a str,
    pos: usize,
    line: u32,
    line_start: usize,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            line_start: 0,
        }
    }

    fn advance_to(&mut self, pos: usize) {
        let input = self.input;
        for (i, _) in input[self.pos..pos].match_indices('\n') {
            self.line += 1;
            self.line_start = self.pos + i + 1;
        }
        self.pos = pos;
    }

    fn column(&self) -> u32 {
        self.input[self.line_start..self.pos].chars().count() as u32 + 1
    }

    fn error(&self, message: String) -> BibTeXParseError {
        BibTeXParseError {
            line: self.line,
            column: self.column(),
            message,
        }
    }

    /// The next block, or the error that made the block at hand unreadable
    fn next_block(&mut self) -> Option<Result<Block<'a>, BibTeXParseError>> {
        let input = self.input;
        let at = self.pos + find_block_start(&input[self.pos..])?;
        self.advance_to(at);
        let text = &input[at..];

        let Ok((after_kind, kind)) = block_kind(text) else {
            let error = self.error("Expected an entry type after `@`".to_string());
            self.advance_to(at + 1);
            return Some(Err(error));
        };

        let Ok((body_text, open)) = block_open(after_kind) else {
            if kind.eq_ignore_ascii_case("comment") {
                // `@comment` without braces runs to the end of the line
                let end = text.find('\n').unwrap_or(text.len());
                self.advance_to(at + end);
                return self.next_block();
            }
            let error = self.error(format!("Expected `{{` or `(` after @{}", kind));
            self.advance_to(at + 1);
            return Some(Err(error));
        };

        let close = if open == '{' { b'}' } else { b')' };
        let Some(body_len) = find_closing(body_text, close) else {
            let error = self.error(format!("Unclosed @{} block", kind));
            self.advance_to(at + 1);
            return Some(Err(error));
        };

        let body_start = at + (text.len() - body_text.len());
        let end = body_start + body_len + 1;
        let block = Block {
            kind,
            body: &input[body_start..body_start + body_len],
            source: &input[at..end],
            line: self.line,
            column: self.column(),
        };
        self.advance_to(end);
        Some(Ok(block))
    }
}

/// Offset of the next `@` that is not inside a `%` comment line
fn find_block_start(text: &str) -> Option<usize> {
    let mut in_comment = false;
    let mut line_blank = true;

    for (i, c) in text.char_indices() {
        match c {
            '\n' => {
                in_comment = false;
                line_blank = true;
            }
            _ if in_comment => {}
            '%' if line_blank => in_comment = true,
            '@' => return Some(i),
            c if c.is_whitespace() => {}
            _ => line_blank = false,
        }
    }
    None
}

/// Byte offset of the `close` delimiter that ends a block or braced value
///
/// Braced groups nest and a backslash escapes the following character.
fn find_closing(text: &str, close: u8) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 1,
            b'{' => depth += 1,
            b'}' if depth > 0 => depth -= 1,
            b if b == close && depth == 0 => return Some(i),
            _ => {}
        }
        i += 1;
    }
    None
}

fn ws<'a, O, F>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

fn block_kind(input: &str) -> IResult<&str, &str> {
    preceded(
        tuple((char('@'), multispace0)),
        take_while1(|c: char| c.is_ascii_alphanumeric()),
    )(input)
}

fn block_open(input: &str) -> IResult<&str, char> {
    preceded(multispace0, alt((char('{'), char('('))))(input)
}

fn cite_key(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !c.is_whitespace() && !",{}()=\"#%".contains(c))(input)
}

fn field_name(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || "_-:.+".contains(c))(input)
}

/// `key, name = value, ...` with an optional trailing comma
fn entry_body<'a>(
    input: &'a str,
    strings: &HashMap<String, String>,
) -> IResult<&'a str, (&'a str, Vec<(String, String)>)> {
    let (rest, key) = ws(cite_key)(input)?;
    let (rest, fields) = preceded(
        opt(char(',')),
        separated_list0(char(','), |i| field(i, strings)),
    )(rest)?;
    let (rest, _) = ws(opt(char(',')))(rest)?;
    Ok((rest, (key, fields)))
}

/// `name = value`; the name is lower-cased
fn field<'a>(input: &'a str, strings: &HashMap<String, String>) -> IResult<&'a str, (String, String)> {
    map(
        separated_pair(ws(field_name), char('='), ws(|i| value(i, strings))),
        |(name, text)| (name.to_ascii_lowercase(), text),
    )(input)
}

/// One or more pieces joined by `#`
fn value<'a>(input: &'a str, strings: &HashMap<String, String>) -> IResult<&'a str, String> {
    map(
        separated_list1(ws(char('#')), |i| piece(i, strings)),
        |pieces| collapse_whitespace(&pieces.concat()),
    )(input)
}

fn piece<'a>(input: &'a str, strings: &HashMap<String, String>) -> IResult<&'a str, String> {
    alt((
        map(braced, str::to_string),
        map(quoted, str::to_string),
        map(digit1, str::to_string),
        map(field_name, |name| expand_macro(name, strings)),
    ))(input)
}

/// `{...}`, returning the text between the outer braces
fn braced(input: &str) -> IResult<&str, &str> {
    let (rest, _) = char('{')(input)?;
    match find_closing(rest, b'}') {
        Some(len) => Ok((&rest[len + 1..], &rest[..len])),
        None => Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Char,
        ))),
    }
}

/// `"..."`, where a quote inside braces does not end the value
fn quoted(input: &str) -> IResult<&str, &str> {
    let (rest, _) = char('"')(input)?;
    let bytes = rest.as_bytes();
    let mut depth = 0usize;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 1,
            b'{' => depth += 1,
            b'}' => depth = depth.saturating_sub(1),
            b'"' if depth == 0 => return Ok((&rest[i + 1..], &rest[..i])),
            _ => {}
        }
        i += 1;
    }

    Err(nom::Err::Error(nom::error::Error::new(
        input,
        nom::error::ErrorKind::Char,
    )))
}

/// Look up an `@string` macro, then the predefined month names
fn expand_macro(name: &str, strings: &HashMap<String, String>) -> String {
    let lower = name.to_ascii_lowercase();
    if let Some(text) = strings.get(&lower) {
        return text.clone();
    }

    const MONTHS: [(&str, &str); 12] = [
        ("jan", "January"),
        ("feb", "February"),
        ("mar", "March"),
        ("apr", "April"),
        ("may", "May"),
        ("jun", "June"),
        ("jul", "July"),
        ("aug", "August"),
        ("sep", "September"),
        ("oct", "October"),
        ("nov", "November"),
        ("dec", "December"),
    ];
    MONTHS
        .iter()
        .find(|(abbrev, _)| *abbrev == lower)
        .map(|(_, month)| month.to_string())
        .unwrap_or_else(|| name.to_string())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
