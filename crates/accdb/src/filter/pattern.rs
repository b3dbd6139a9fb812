//! Pattern dialects.
//!
//! A pattern token is dispatched on its leading sigil:
//!
//! | Form | Matches when |
//! |------|--------------|
//! | `*` | always |
//! | `#N` | the item number is `N` |
//! | `+GLOB` | any tag matches |
//! | `@FIELD=GLOB` | any value of `FIELD` matches |
//! | `@FIELD~REGEX` | any value of `FIELD` contains a match |
//! | `@GLOB` (with `*`) | any field name matches |
//! | `@FIELD` | `FIELD` is present |
//! | `~REGEX` | the name contains a match |
//! | anything else | the name starts with it (as a glob) |
//!
//! Globs and regexes are case-insensitive and compiled once, when the pattern
//! is built.

use crate::error::FilterSyntaxError;
use crate::fields::translate_field;
use crate::model::Entry;
use glob::MatchOptions;
use regex::{Regex, RegexBuilder};

const GLOB_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// A case-insensitive shell glob (`*`, `?`, `[...]`), anchored at both ends.
#[derive(Debug, Clone)]
pub enum Glob {
    Pattern(glob::Pattern),
    /// Text that is not a valid glob is compared literally.
    Literal(String),
}

impl Glob {
    /// Runs of `*` are folded into one first; `glob` only accepts `**` as a
    /// whole path component.
    pub fn new(source: &str) -> Self {
        let source = collapse_stars(source);
        match glob::Pattern::new(&source) {
            Ok(pattern) => Glob::Pattern(pattern),
            Err(_) => Glob::Literal(source.to_lowercase()),
        }
    }

    pub fn matches(&self, text: &str) -> bool {
        match self {
            Glob::Pattern(pattern) => pattern.matches_with(text, GLOB_OPTIONS),
            Glob::Literal(literal) => text.to_lowercase() == *literal,
        }
    }
}

fn collapse_stars(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    for c in source.chars() {
        if c == '*' && out.ends_with('*') {
            continue;
        }
        out.push(c);
    }
    out
}

/// One compiled pattern token.
#[derive(Debug, Clone)]
pub enum Pattern {
    Any,
    /// `None` when the number did not parse; never matches.
    SequenceNumber(Option<usize>),
    TagGlob(Glob),
    FieldGlob { field: String, glob: Glob },
    FieldRegex { field: String, regex: Regex },
    FieldNameGlob(Glob),
    FieldPresence(String),
    NameRegex(Regex),
    NamePrefixGlob(Glob),
}

impl Pattern {
    pub fn compile(text: &str) -> Result<Self, FilterSyntaxError> {
        let pattern = if text == "*" {
            Pattern::Any
        } else if let Some(number) = text.strip_prefix('#') {
            Pattern::SequenceNumber(number.parse().ok())
        } else if let Some(glob) = text.strip_prefix('+') {
            Pattern::TagGlob(Glob::new(glob))
        } else if let Some(rest) = text.strip_prefix('@') {
            compile_field_pattern(rest)?
        } else if let Some(regex) = text.strip_prefix('~') {
            Pattern::NameRegex(compile_regex(regex)?)
        } else {
            Pattern::NamePrefixGlob(Glob::new(&format!("{}*", text.trim_end_matches('*'))))
        };
        Ok(pattern)
    }

    pub fn matches(&self, entry: &Entry) -> bool {
        match self {
            Pattern::Any => true,
            Pattern::SequenceNumber(number) => number.is_some() && entry.itemno == *number,
            Pattern::TagGlob(glob) => entry.tags.iter().any(|tag| glob.matches(tag)),
            Pattern::FieldGlob { field, glob } => entry
                .attributes
                .get(field)
                .is_some_and(|values| values.iter().any(|v| glob.matches(v.reveal()))),
            Pattern::FieldRegex { field, regex } => entry
                .attributes
                .get(field)
                .is_some_and(|values| values.iter().any(|v| regex.is_match(v.reveal()))),
            Pattern::FieldNameGlob(glob) => entry.attributes.keys().any(|name| glob.matches(name)),
            Pattern::FieldPresence(field) => entry.attributes.contains_key(field),
            Pattern::NameRegex(regex) => regex.is_match(&entry.name),
            Pattern::NamePrefixGlob(glob) => glob.matches(&entry.name),
        }
    }
}

fn compile_field_pattern(rest: &str) -> Result<Pattern, FilterSyntaxError> {
    if let Some((field, glob)) = rest.split_once('=') {
        Ok(Pattern::FieldGlob {
            field: translate_field(field).to_string(),
            glob: Glob::new(glob),
        })
    } else if let Some((field, regex)) = rest.split_once('~') {
        Ok(Pattern::FieldRegex {
            field: translate_field(field).to_string(),
            regex: compile_regex(regex)?,
        })
    } else if rest.contains('*') {
        Ok(Pattern::FieldNameGlob(Glob::new(rest)))
    } else {
        Ok(Pattern::FieldPresence(translate_field(rest).to_string()))
    }
}

fn compile_regex(source: &str) -> Result<Regex, FilterSyntaxError> {
    RegexBuilder::new(source)
        .case_insensitive(true)
        .build()
        .map_err(|e| FilterSyntaxError::InvalidRegex {
            pattern: source.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> Entry {
        let mut entry = Entry::new("Mail.Example.org");
        entry.itemno = Some(3);
        entry.add_attribute("hostname", "imap.example.org");
        entry.add_attribute("login", "alice");
        entry.add_attribute("pass", "Hunter2");
        entry.add_attribute("!2fa.oath-psk", "ABCD");
        entry.add_tags(["Work", "mail"]);
        entry
    }

    fn matches(text: &str) -> bool {
        Pattern::compile(text).unwrap().matches(&entry())
    }

    #[test]
    fn glob_semantics() {
        let glob = Glob::new("a?c*[xy]");
        assert!(glob.matches("abcdefx"));
        assert!(glob.matches("ABCY"));
        assert!(!glob.matches("abz"));
        assert!(Glob::new("*").matches("a/b"));
    }

    #[test]
    fn repeated_stars_act_as_one() {
        let glob = Glob::new("a**b");
        assert!(matches!(glob, Glob::Pattern(_)));
        assert!(glob.matches("axyzb"));
        assert!(glob.matches("ab"));
        assert!(!glob.matches("axyz"));
    }

    #[test]
    fn name_prefix_with_trailing_star() {
        assert!(matches("mail*"));
        assert!(matches("Mail.*.org"));
        assert!(matches("+wo**"));
        assert!(matches("@!2fa**"));
    }

    #[test]
    fn invalid_glob_compares_literally() {
        let glob = Glob::new("[abc");
        assert!(glob.matches("[ABC"));
        assert!(!glob.matches("a"));
    }

    #[test]
    fn star_matches_everything() {
        assert!(matches("*"));
    }

    #[test]
    fn sequence_number() {
        assert!(matches("#3"));
        assert!(!matches("#4"));
        assert!(!matches("#three"));
        assert!(!matches("#"));
    }

    #[test]
    fn tag_glob() {
        assert!(matches("+work"));
        assert!(matches("+ma*"));
        assert!(!matches("+home"));
    }

    #[test]
    fn field_glob_uses_canonical_name() {
        assert!(matches("@host=imap.*"));
        assert!(matches("@machine=*.ORG"));
        assert!(!matches("@host=smtp.*"));
        assert!(!matches("@uri=*"));
    }

    #[test]
    fn field_glob_sees_confidential_text() {
        assert!(matches("@pass=hunter?"));
    }

    #[test]
    fn field_regex_searches() {
        assert!(matches("@user~^ali"));
        assert!(matches("@login~IC"));
        assert!(!matches("@login~^bob"));
    }

    #[test]
    fn field_name_glob() {
        assert!(matches("@!2fa*"));
        assert!(matches("@*psk"));
        assert!(!matches("@*totp*"));
    }

    #[test]
    fn field_presence() {
        assert!(matches("@hostname"));
        assert!(matches("@pass"));
        assert!(!matches("@email"));
    }

    #[test]
    fn name_regex_searches() {
        assert!(matches("~example"));
        assert!(matches("~\\.ORG$"));
        assert!(!matches("~^example"));
    }

    #[test]
    fn bare_token_is_name_prefix() {
        assert!(matches("mail"));
        assert!(matches("MAIL.ex"));
        assert!(matches("m*org"));
        assert!(!matches("example"));
    }

    #[test]
    fn invalid_regex_is_a_syntax_error() {
        let err = Pattern::compile("~(unclosed").unwrap_err();
        assert!(matches!(err, FilterSyntaxError::InvalidRegex { .. }));
    }
}
