//! Item number ranges.
//!
//! Commands that act on specific entries take item numbers written as a list
//! of single numbers and inclusive ranges, separated by commas or whitespace:
//! `1-3,5 7` selects items 1, 2, 3, 5 and 7, in that order.

use crate::error::{AccdbError, Result};

/// Expands a range list into item numbers, keeping the written order.
pub fn expand_range(text: &str) -> Result<Vec<usize>> {
    let mut items = Vec::new();
    for part in text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
    {
        match part.split_once('-') {
            Some((from, to)) => {
                let from = parse_item(from, text)?;
                let to = parse_item(to, text)?;
                items.extend(from..=to);
            }
            None => items.push(parse_item(part, text)?),
        }
    }
    Ok(items)
}

/// Expands every argument and concatenates the results.
pub fn expand_ranges<S: AsRef<str>>(args: &[S]) -> Result<Vec<usize>> {
    let mut items = Vec::new();
    for arg in args {
        items.extend(expand_range(arg.as_ref())?);
    }
    Ok(items)
}

fn parse_item(number: &str, text: &str) -> Result<usize> {
    number
        .trim()
        .parse()
        .map_err(|_| AccdbError::InvalidRange(text.to_string()))
}
