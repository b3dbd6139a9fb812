use crate::commands::{count_entries, CmdMessage, CmdResult};
use crate::database::Database;
use crate::error::Result;
use crate::filter::Filter;

/// Runs a filter query.
///
/// Every argument is one filter; several are combined with `AND`, none
/// matches everything. Tombstoned entries are never listed. The closing
/// message names the compiled filter, e.g.
/// `(2 entries matching '(PATTERN +work)')`.
pub fn run<S: AsRef<str>>(db: &Database, args: &[S]) -> Result<CmdResult> {
    let filter = Filter::from_args(args)?;

    let entries: Vec<_> = db
        .find(&filter)
        .filter(|entry| !entry.is_deleted())
        .cloned()
        .collect();

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::info(format!(
        "({} matching '{}')",
        count_entries(entries.len()),
        filter
    )));
    Ok(result.with_listed_entries(entries))
}
