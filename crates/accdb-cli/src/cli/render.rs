//! Text rendering of command results.
//!
//! Everything here returns strings; printing happens in `commands.rs`.

use accdb::codec::{dump_entry, DumpOptions};
use accdb::commands::{CmdMessage, MessageLevel};
use accdb::Entry;
use console::style;

/// How a list of entries is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryView {
    /// Display dump, confidential values redacted.
    Safe,
    /// Display dump, confidential values in the clear.
    Revealed,
    /// One `itemno │ name` line per entry.
    Names,
    /// Storage form with values in the clear, fit for feeding back to merge.
    Full,
}

pub fn render_entries(entries: &[Entry], view: EntryView) -> String {
    let mut out = String::new();
    for entry in entries {
        match view {
            EntryView::Names => {
                out.push_str(&format!("{:5} │ {}\n", entry.itemno.unwrap_or(0), entry.name));
            }
            EntryView::Safe | EntryView::Revealed | EntryView::Full => {
                out.push_str(&dump_entry(entry, dump_options(view)));
                out.push('\n');
            }
        }
    }
    out
}

fn dump_options(view: EntryView) -> DumpOptions {
    match view {
        EntryView::Revealed => DumpOptions::reveal(),
        EntryView::Full => DumpOptions::storage(false),
        EntryView::Safe | EntryView::Names => DumpOptions::display(),
    }
}

pub fn render_message(message: &CmdMessage) -> String {
    let content = message.content.as_str();
    match message.level {
        MessageLevel::Info => style(content).dim().to_string(),
        MessageLevel::Success => style(content).green().to_string(),
        MessageLevel::Warning => style(content).yellow().to_string(),
        MessageLevel::Error => style(content).red().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries() -> Vec<Entry> {
        let mut entry = Entry::new("site");
        entry.itemno = Some(7);
        entry.add_attribute("pass", "hunter2");
        vec![entry]
    }

    #[test]
    fn test_names_view() {
        assert_eq!(render_entries(&entries(), EntryView::Names), "    7 │ site\n");
    }

    #[test]
    fn test_safe_view_redacts() {
        let out = render_entries(&entries(), EntryView::Safe);
        assert_eq!(out, "(item 7)\n= site\n\tpass: <private[7]>\n\n");
    }

    #[test]
    fn test_revealed_view() {
        let out = render_entries(&entries(), EntryView::Revealed);
        assert!(out.contains("\tpass: hunter2\n"));
    }

    #[test]
    fn test_full_view_has_no_annotations() {
        let out = render_entries(&entries(), EntryView::Full);
        assert_eq!(out, "= site\n\tpass: hunter2\n\n");
    }

    #[test]
    fn test_message_keeps_content() {
        console::set_colors_enabled(false);
        let rendered = render_message(&CmdMessage::warning("careful"));
        assert_eq!(rendered, "careful");
    }
}
