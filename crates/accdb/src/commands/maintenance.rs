use crate::commands::{count_entries, CmdMessage, CmdResult};
use crate::database::Database;
use crate::error::Result;

/// Sorts entries by name. Item numbers keep addressing the same entries.
pub fn sort(db: &mut Database) -> Result<CmdResult> {
    db.sort();
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Sorted {}",
        count_entries(db.len())
    )));
    Ok(result)
}

/// Marks the database for rewriting, normalizing its layout on close.
pub fn touch(db: &mut Database) -> Result<CmdResult> {
    db.touch();
    Ok(CmdResult::default())
}

/// Every tag in use, one per line, sorted.
pub fn lstags(db: &Database) -> Result<CmdResult> {
    let text: String = db.tags().into_iter().map(|tag| tag + "\n").collect();
    Ok(CmdResult::default().with_text(text))
}
