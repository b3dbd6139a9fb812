//! Entries addressed by item number.

use crate::commands::CmdResult;
use crate::database::Database;
use crate::error::{AccdbError, Result};
use crate::psk::{decode_psk, encode_psk};
use crate::selection::expand_ranges;

/// Looks up the entries named by range arguments such as `1-3,5`.
///
/// Tombstoned entries are still addressable here. Whether values are shown
/// revealed is up to the caller's rendering.
pub fn run<S: AsRef<str>>(db: &Database, ranges: &[S]) -> Result<CmdResult> {
    let entries = expand_ranges(ranges)?
        .into_iter()
        .map(|itemno| db.find_by_itemno(itemno).cloned())
        .collect::<Result<Vec<_>>>()?;
    Ok(CmdResult::default().with_listed_entries(entries))
}

/// Prints the OATH preshared key of each entry in canonical base32, one per
/// line.
pub fn key<S: AsRef<str>>(db: &Database, ranges: &[S]) -> Result<CmdResult> {
    let mut text = String::new();
    for itemno in expand_ranges(ranges)? {
        let entry = db.find_by_itemno(itemno)?;
        let psk = entry.oath_psk().ok_or(AccdbError::NoKey(itemno))?;
        text.push_str(&encode_psk(&decode_psk(&psk)?));
        text.push('\n');
    }
    Ok(CmdResult::default().with_text(text))
}
