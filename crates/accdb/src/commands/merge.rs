use crate::codec::{dump_entry, DumpOptions};
use crate::commands::{count_entries, CmdMessage, CmdResult};
use crate::database::Database;
use crate::error::Result;

/// Merges entries from `input` into `db`.
///
/// Entries with a known identifier replace the stored version, others are
/// added. Broken entries (confidential data lost, typically from feeding a
/// safe dump back in) are skipped with a warning carrying their text, so they
/// can be repaired by hand. The applied entries come back in `text` in
/// storage form.
pub fn run(db: &mut Database, input: &str) -> Result<CmdResult> {
    let report = db.merge(input)?;
    let mut result = CmdResult::default();

    for entry in &report.skipped {
        result.add_message(CmdMessage::warning(format!(
            "(warning: skipped broken entry)\n{}",
            dump_entry(entry, DumpOptions::storage(false))
        )));
    }

    let mut text = String::new();
    for entry in &report.applied {
        text.push_str(&dump_entry(entry, DumpOptions::storage(false)));
        text.push('\n');
    }

    result.add_message(CmdMessage::success(format!(
        "Merged {}",
        count_entries(report.applied.len())
    )));
    Ok(result.with_text(text).with_listed_entries(report.applied))
}
