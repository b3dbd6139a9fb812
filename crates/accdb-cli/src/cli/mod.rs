//! # CLI Behavior
//!
//! This is one possible client for the accdb library. It is the only place
//! that knows about terminal I/O, exit codes and output formatting.
//!
//! ## Invocation
//!
//! `accdb` with no command lists every live entry (`accdb ls`). Filters are
//! passed as separate words and combined with `AND`:
//!
//! ```text
//! accdb grep +work '@login~^alice'
//! accdb ls '(OR mail ~bank)'
//! accdb show 1-3,7
//! ```
//!
//! ## Where Things Go
//!
//! - Entry output, dumps, tag lists and keys go to stdout.
//! - Status lines (match counts, merge warnings, the read-only notice) and
//!   log output go to stderr, so piping stdout stays clean.
//!
//! ## Module Structure
//!
//! - `setup`: argument parsing via clap
//! - `commands`: session wiring and dispatch
//! - `render`: turning `CmdResult`s into text

mod commands;
mod render;
pub mod setup;

pub use commands::run;
