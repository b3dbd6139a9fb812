//! # Text Format Codec
//!
//! Entries live in a plain text file meant to be edited by hand. One entry is
//! the run of lines from a `=` name header up to the next one:
//!
//! ```text
//! = example.com
//! ; created for the newsletter
//! 	{9c2f1f6e-8f0e-4f7e-9a57-0b4f0d7c2d11}
//! 	uri: https://example.com
//! 	login: alice
//! 	pass: <base64> aHVudGVyMg==
//! 	+ mail, work
//! ```
//!
//! ## Line Classification
//!
//! After stripping leading whitespace, each line is, in priority order:
//!
//! | Start | Meaning |
//! |-------|---------|
//! | (blank) | skipped |
//! | `=` | name header (first wins) |
//! | `+` | tags, split on commas and whitespace |
//! | `;` | comment line |
//! | `(...)` or `█...█` | decoration from display dumps, ignored |
//! | `{...}` | identifier header |
//! | anything else | `key: value` or `key=value`, split at the first separator |
//!
//! ## Recoverable Anomalies
//!
//! Parsing an entry never fails. Duplicate headers, malformed identifiers and
//! unparsable lines are logged; their text is kept as comment lines. A value
//! that is only a redaction placeholder (from feeding a safe dump back in)
//! becomes the lost-data sentinel and the entry is marked broken.
//!
//! ## Serialization
//!
//! [`dump_entry`] is governed by [`DumpOptions`]:
//!
//! - `storage`: full fidelity. Identifier header written, no field skipped,
//!   decoration omitted.
//! - `terse` (ignored in storage mode): only grouped fields are written.
//! - `conceal`: in storage mode, confidential values are transport-encoded.
//!   Outside storage mode, confidential values render redacted; clearing
//!   `conceal` reveals them.
//!
//! Storage output reparses to an identical entry, so dumping it again yields
//! the same bytes.

pub mod decode;

use crate::fields::{self, translate_field};
use crate::model::{Entry, Value, LOST_DATA, UNNAMED};
use decode::{decode_value, encode_transport, Decoded, TRANSPORT_MARKER};
use std::borrow::Cow;
use std::fmt::Write;
use tracing::warn;
use uuid::Uuid;

/// Column-0 line carrying the database header.
pub const MODELINE_PREFIX: &str = "; vim:";

/// Column-0 line carrying the database flags.
pub const FLAGS_PREFIX: &str = "; dbflags:";

/// Column that tag lines wrap at.
const TAG_WRAP_WIDTH: usize = 80;

/// Width the leading tab and `+ ` count for when wrapping tags.
const TAG_INDENT_WIDTH: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DumpOptions {
    pub storage: bool,
    pub terse: bool,
    pub conceal: bool,
}

impl Default for DumpOptions {
    fn default() -> Self {
        Self::display()
    }
}

impl DumpOptions {
    /// Full-fidelity output for writing the database file.
    pub fn storage(conceal: bool) -> Self {
        Self {
            storage: true,
            terse: false,
            conceal,
        }
    }

    /// Safe output for the terminal: confidential values redacted.
    pub fn display() -> Self {
        Self {
            storage: false,
            terse: false,
            conceal: true,
        }
    }

    /// Display output with confidential values in the clear.
    pub fn reveal() -> Self {
        Self {
            conceal: false,
            ..Self::display()
        }
    }

    pub fn terse(mut self) -> Self {
        self.terse = true;
        self
    }
}

/// A classified line of an entry block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line<'a> {
    Blank,
    Name(&'a str),
    Tags(&'a str),
    Comment(&'a str),
    Decoration,
    Id(&'a str),
    Pair { key: &'a str, value: &'a str },
    Unparsable(&'a str),
}

/// Classifies one line; leading whitespace is ignored.
pub fn classify(line: &str) -> Line<'_> {
    let line = line.trim_start();
    if line.is_empty() {
        Line::Blank
    } else if let Some(rest) = line.strip_prefix('=') {
        Line::Name(rest.trim())
    } else if let Some(rest) = line.strip_prefix('+') {
        Line::Tags(rest)
    } else if let Some(rest) = line.strip_prefix(';') {
        Line::Comment(rest)
    } else if is_enclosed(line, '(', ')') || is_enclosed(line, '█', '█') {
        Line::Decoration
    } else if is_enclosed(line, '{', '}') {
        Line::Id(line)
    } else {
        match split_pair(line) {
            Some((key, value)) => Line::Pair { key, value },
            None => Line::Unparsable(line),
        }
    }
}

fn is_enclosed(line: &str, open: char, close: char) -> bool {
    line.starts_with(open) && line.ends_with(close)
}

/// Splits at whichever comes first: `=` or `: `.
fn split_pair(line: &str) -> Option<(&str, &str)> {
    let equals = line.find('=').map(|at| (at, 1));
    let colon = line.find(": ").map(|at| (at, 2));
    let (at, len) = match (equals, colon) {
        (Some(e), Some(c)) => {
            if e.0 < c.0 {
                e
            } else {
                c
            }
        }
        (Some(e), None) => e,
        (None, Some(c)) => c,
        (None, None) => return None,
    };
    Some((line[..at].trim_end(), &line[at + len..]))
}

/// Splits a tag line body into tags.
pub fn split_tags(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|tag| !tag.is_empty())
}

/// Parses the identifier header form `{uuid}`.
pub fn parse_id(line: &str) -> Option<Uuid> {
    let inner = line.strip_prefix('{')?.strip_suffix('}')?;
    Uuid::parse_str(inner.trim()).ok()
}

/// Parses one entry block.
///
/// `first_line` is the 1-based line number of the block's first line and is
/// used for diagnostics only.
pub fn parse_entry(block: &str, first_line: usize) -> Entry {
    let mut entry = Entry {
        lineno: Some(first_line),
        ..Default::default()
    };

    for (offset, raw) in block.lines().enumerate() {
        let lineno = first_line + offset;
        match classify(raw) {
            Line::Blank | Line::Decoration => {}
            Line::Name(name) => {
                if entry.name.is_empty() {
                    entry.name = name.to_string();
                } else {
                    warn!(line = lineno, "ignoring multiple name headers");
                }
            }
            Line::Tags(text) => entry.add_tags(split_tags(text)),
            Line::Comment(text) => push_comment(&mut entry, text),
            Line::Id(text) => match parse_id(text) {
                Some(_) if entry.uuid.is_some() => {
                    warn!(line = lineno, "ignoring multiple UUID headers");
                    push_comment(&mut entry, text);
                }
                Some(id) => entry.uuid = Some(id),
                None => {
                    warn!(line = lineno, id = text, "ignoring badly formed UUID");
                    push_comment(&mut entry, text);
                }
            },
            Line::Pair { key, value } => {
                let field = translate_field(key);
                let text = match decode_value(field, value) {
                    Decoded::Text(text) => text,
                    Decoded::Lost => {
                        warn!(line = lineno, field, "lost private data");
                        entry.broken = true;
                        LOST_DATA.to_string()
                    }
                    Decoded::Undecodable(text) => {
                        warn!(line = lineno, field, "could not decode transport encoding");
                        text
                    }
                };
                entry.push_value(field, Value::for_field(field, text));
            }
            Line::Unparsable(text) => {
                warn!(line = lineno, text, "could not parse line");
                push_comment(&mut entry, text);
            }
        }
    }

    if entry.name.is_empty() {
        entry.name = UNNAMED.to_string();
    }

    entry
}

fn push_comment(entry: &mut Entry, text: &str) {
    entry.comment.push_str(text);
    entry.comment.push('\n');
}

/// Serializes one entry.
pub fn dump_entry(entry: &Entry, opts: DumpOptions) -> String {
    let terse = opts.terse && !opts.storage;
    let mut out = String::new();

    if !opts.storage {
        if let Some(itemno) = entry.itemno {
            let _ = writeln!(out, "(item {})", itemno);
        } else if let Some(lineno) = entry.lineno {
            let _ = writeln!(out, "(line {})", lineno);
        }
    }

    let _ = writeln!(out, "= {}", entry.name);

    for line in entry.comment.lines() {
        let comment = format!(";{}", line);
        // indented so a reload keeps it out of the header and flags
        if comment.starts_with(MODELINE_PREFIX) || comment.starts_with(FLAGS_PREFIX) {
            out.push('\t');
        }
        out.push_str(&comment);
        out.push('\n');
    }

    if opts.storage {
        if let Some(id) = entry.uuid {
            let _ = writeln!(out, "\t{{{}}}", id);
        }
    }

    for field in fields::sort_fields(entry.attributes.keys().map(String::as_str), terse) {
        for value in &entry.attributes[field] {
            let _ = writeln!(out, "\t{}: {}", field, render_value(value, opts));
        }
    }

    let tags: Vec<&str> = entry.tags.iter().map(String::as_str).collect();
    for line in wrap_tags(&tags) {
        let _ = writeln!(out, "\t+ {}", line);
    }

    out
}

fn render_value(value: &Value, opts: DumpOptions) -> Cow<'_, str> {
    let raw = value.reveal();
    if opts.storage {
        if opts.conceal && value.is_confidential() && !raw.starts_with(TRANSPORT_MARKER) {
            Cow::Owned(encode_transport(raw))
        } else {
            Cow::Borrowed(raw)
        }
    } else if opts.conceal {
        Cow::Owned(value.to_string())
    } else {
        Cow::Borrowed(raw)
    }
}

/// Greedily packs sorted tags into comma-joined lines.
pub fn wrap_tags(tags: &[&str]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line: Vec<&str> = Vec::new();
    let mut width = TAG_INDENT_WIDTH;

    for &tag in tags {
        if !line.is_empty() && width + tag.len() + 2 > TAG_WRAP_WIDTH {
            lines.push(line.join(", "));
            line.clear();
            width = TAG_INDENT_WIDTH;
        }
        line.push(tag);
        width += tag.len() + 2;
    }

    if !line.is_empty() {
        lines.push(line.join(", "));
    }

    lines
}
