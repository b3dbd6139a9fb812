//! # Command Layer
//!
//! The operations exposed by the `accdb` command line, as plain functions over
//! a [`Database`](crate::database::Database) handle. The caller owns the one
//! database instance and passes it in; nothing here holds global state.
//!
//! ## What Commands Do NOT Do
//!
//! - **Terminal output**: no printing. Results come back as [`CmdResult`].
//! - **Argument parsing**: the CLI turns words into filters and ranges first,
//!   or hands them over as strings.
//! - **Persistence**: commands only mark the database dirty; flushing happens
//!   when the caller closes its session.
//!
//! ## Structured Returns
//!
//! [`CmdResult`] carries:
//! - `listed_entries`: entries for the UI to render in whatever form fits
//!   the command (summary, list line, full dump)
//! - `text`: preformatted output (dumps, tag lists, keys), printed verbatim
//! - `messages`: status lines with a [`MessageLevel`]
//!
//! ## Command Modules
//!
//! - [`grep`]: filter queries (`grep`, `ls`, `rgrep`)
//! - [`show`]: entries by item number (`show`, `reveal`) and their keys (`key`)
//! - [`dump`]: whole-database exports and text conversion (`dump`, `convert`)
//! - [`merge`]: apply entries from external text
//! - [`maintenance`]: `sort`, `touch`, `lstags`

use crate::model::Entry;
use serde::Serialize;

pub mod dump;
pub mod grep;
pub mod maintenance;
pub mod merge;
pub mod show;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub listed_entries: Vec<Entry>,
    pub text: String,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_listed_entries(mut self, entries: Vec<Entry>) -> Self {
        self.listed_entries = entries;
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }
}

/// `"1 entry"`, `"3 entries"`.
pub(crate) fn count_entries(count: usize) -> String {
    format!("{} {}", count, if count == 1 { "entry" } else { "entries" })
}
