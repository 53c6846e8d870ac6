//! Registry-specific WHOIS response grammars.
//!
//! Registries agree on almost nothing beyond "one fact per line". Most use
//! `Field: value`, JPRS uses `[Field] value`, and a few are free-form text
//! with no stable grammar at all. [`ParseFormat`] names each grammar and
//! [`parse`] dispatches on it; the choice is made once per lookup from the
//! target, never by sniffing the response.

mod bracketed;
mod generic;
mod opaque;

use super::parser::{Fields, RawResponse, Record, RecordKind, ResultSet};
use crate::target::Target;

/// TLDs answered in the `[Field] value` layout.
pub const BRACKETED_TLDS: &[&str] = &["jp"];

/// TLDs whose output is returned as raw text only.
pub const OPAQUE_TLDS: &[&str] = &["uk"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseFormat {
    /// `Field: value` lines.
    Generic(RecordKind),
    /// `[Field] value` lines.
    Bracketed,
    /// No field extraction.
    Opaque,
}

impl ParseFormat {
    pub fn for_target(target: &Target) -> Self {
        match target {
            Target::Domain { tld, .. } if BRACKETED_TLDS.contains(&tld.as_str()) => {
                ParseFormat::Bracketed
            }
            Target::Domain { tld, .. } if OPAQUE_TLDS.contains(&tld.as_str()) => {
                ParseFormat::Opaque
            }
            other => ParseFormat::Generic(other.kind()),
        }
    }
}

/// Parse one server's response. Never fails: lines that don't fit the
/// grammar are dropped.
pub fn parse(format: ParseFormat, search: &str, raw: &RawResponse) -> Record {
    match format {
        ParseFormat::Generic(kind) => generic::parse(kind, search, raw),
        ParseFormat::Bracketed => bracketed::parse(search, raw),
        ParseFormat::Opaque => opaque::parse(search, raw),
    }
}

/// Parse one response per regional registry into a single result set.
pub fn parse_multi<I>(kind: RecordKind, search: &str, responses: I) -> ResultSet
where
    I: IntoIterator<Item = RawResponse>,
{
    let mut set = ResultSet::new(search, kind);
    for raw in responses {
        set.insert(generic::parse(kind, search, &raw));
    }
    set
}

/// Outcome of reading a single response line.
#[derive(Debug, PartialEq, Eq)]
enum ParsedLine {
    Field { name: String, value: String },
    Skipped,
    Terminator,
}

/// Registries open their legal boilerplate with a `--` rule or a
/// `>>> Last update` banner; nothing after it is data.
fn is_block_terminator(line: &str) -> bool {
    line.starts_with("--") || line.starts_with(">>")
}

fn parse_line<F>(line: &str, split: &F) -> ParsedLine
where
    F: Fn(&str) -> Option<(String, String)>,
{
    let line = line.trim();
    if line.is_empty() {
        return ParsedLine::Skipped;
    }
    if is_block_terminator(line) {
        return ParsedLine::Terminator;
    }

    match split(line) {
        Some((name, value)) => ParsedLine::Field { name, value },
        None => ParsedLine::Skipped,
    }
}

fn collect_fields<F>(body: &str, split: F) -> Fields
where
    F: Fn(&str) -> Option<(String, String)>,
{
    let mut fields = Fields::new();

    for line in body.lines() {
        match parse_line(line, &split) {
            ParsedLine::Field { name, value } => fields.insert(name, value),
            ParsedLine::Skipped => continue,
            ParsedLine::Terminator => break,
        }
    }

    fields
}
