//! # Filter Query Language
//!
//! Entries are selected with small prefix-notation expressions:
//!
//! ```text
//! mail                          name starts with "mail"
//! (AND +work @pass)             tagged work and has a password
//! (OR ~bank (NOT @login))       name contains "bank", or no login
//! (PATTERN +work)               same as the bare pattern +work
//! ```
//!
//! Operator keywords are case-insensitive. `AND` and `OR` take one or more
//! arguments, `NOT` and `PATTERN` exactly one. Several filters given side by
//! side (e.g. separate command line words) are combined with `AND`, see
//! [`Filter::from_args`]. The pattern dialects are listed in [`pattern`].
//!
//! Compilation and evaluation are separate stages: [`Filter::compile`] turns
//! text into a [`Filter`] tree, failing fast with a [`FilterSyntaxError`]
//! before any entry is looked at; [`Filter::matches`] evaluates the tree
//! against one entry, short-circuiting `AND` and `OR`.

pub mod pattern;
pub mod tokenize;

use crate::error::FilterSyntaxError;
use crate::model::Entry;
use pattern::Pattern;
use std::fmt;
use std::str::FromStr;
use tokenize::split_filter;
use tracing::debug;

/// A compiled filter expression.
#[derive(Debug, Clone)]
pub enum Filter {
    Pattern { source: String, pattern: Pattern },
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Not(Box<Filter>),
}

impl Filter {
    pub fn compile(text: &str) -> Result<Self, FilterSyntaxError> {
        let tokens = split_filter(text)?;
        debug!(filter = text, ?tokens, "parsing filter");

        match tokens.as_slice() {
            [] => Err(FilterSyntaxError::Empty),
            [token] if token.contains(|c: char| c.is_whitespace() || c == '(' || c == ')') => {
                Self::compile(token)
            }
            [token] => Self::pattern(token),
            [op, args @ ..] => {
                if op.eq_ignore_ascii_case("AND") {
                    Ok(Filter::And(compile_all(args)?))
                } else if op.eq_ignore_ascii_case("OR") {
                    Ok(Filter::Or(compile_all(args)?))
                } else if op.eq_ignore_ascii_case("NOT") {
                    let arg = single_arg("NOT", args)?;
                    Ok(Filter::Not(Box::new(Self::compile(arg)?)))
                } else if op.eq_ignore_ascii_case("PATTERN") {
                    Self::pattern(single_arg("PATTERN", args)?)
                } else {
                    Err(FilterSyntaxError::UnknownOperator {
                        op: op.to_string(),
                        filter: text.to_string(),
                    })
                }
            }
        }
    }

    /// Combines independent filter words with `AND`. No words matches everything.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self, FilterSyntaxError> {
        match args {
            [] => Self::compile("*"),
            [only] => Self::compile(only.as_ref()),
            many => {
                let filters = many
                    .iter()
                    .map(|arg| Self::compile(arg.as_ref()))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Filter::And(filters))
            }
        }
    }

    fn pattern(source: &str) -> Result<Self, FilterSyntaxError> {
        Ok(Filter::Pattern {
            source: source.to_string(),
            pattern: Pattern::compile(source)?,
        })
    }

    pub fn matches(&self, entry: &Entry) -> bool {
        match self {
            Filter::Pattern { pattern, .. } => pattern.matches(entry),
            Filter::And(filters) => filters.iter().all(|f| f.matches(entry)),
            Filter::Or(filters) => filters.iter().any(|f| f.matches(entry)),
            Filter::Not(filter) => !filter.matches(entry),
        }
    }
}

fn compile_all(args: &[&str]) -> Result<Vec<Filter>, FilterSyntaxError> {
    args.iter().map(|arg| Filter::compile(arg)).collect()
}

fn single_arg<'a>(op: &'static str, args: &[&'a str]) -> Result<&'a str, FilterSyntaxError> {
    match args {
        [arg] => Ok(*arg),
        _ => Err(FilterSyntaxError::WrongArity {
            op,
            expected: 1,
            got: args.len(),
        }),
    }
}

impl FromStr for Filter {
    type Err = FilterSyntaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::compile(s)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Pattern { source, .. } => write!(f, "(PATTERN {})", source),
            Filter::And(filters) => write_group(f, "AND", filters),
            Filter::Or(filters) => write_group(f, "OR", filters),
            Filter::Not(filter) => write!(f, "(NOT {})", filter),
        }
    }
}

fn write_group(f: &mut fmt::Formatter<'_>, op: &str, filters: &[Filter]) -> fmt::Result {
    write!(f, "({}", op)?;
    for filter in filters {
        write!(f, " {}", filter)?;
    }
    f.write_str(")")
}
