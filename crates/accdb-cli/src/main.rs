//! # accdb CLI
//!
//! The binary is intentionally thin: the CLI lives in `src/cli/`, and this file
//! only invokes `cli::run()` and handles process termination.
//!
//! ## Workspace Structure
//!
//! - `crates/accdb/`: storage and query engine, UI-agnostic
//! - `crates/accdb-cli/`: this command line client
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/accdb-cli/src/cli/)                      │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Session wiring + dispatch (commands.rs)                  │
//! │  - Terminal rendering (render.rs)                           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (crates/accdb/src/commands/*)                │
//! │  - One function per operation, returns `CmdResult`          │
//! │  - No knowledge of stdout/stderr or process exits           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each invocation runs exactly one command: open the database (or its
//! read-only cache), run, render, then close, which writes the file back
//! only when the command changed something.
//!
//! ## Testing Approach
//!
//! - **Library**: unit tests next to each module plus file-level
//!   integration tests in `crates/accdb/tests/`.
//! - **CLI**: end-to-end runs of the binary against temporary database files
//!   (`tests/cli_e2e.rs`).

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
