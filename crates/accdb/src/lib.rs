//! # accdb Architecture
//!
//! accdb keeps account records (logins, passwords, URIs, OATH keys) in one
//! plain text file that stays pleasant to edit by hand. This crate is the
//! storage and query engine; the `accdb` binary is a thin client over it.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (accdb-cli)                                            │
//! │  - Parses arguments, renders results, owns stdout/stderr    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Commands (commands/*.rs), Session (session.rs)             │
//! │  - One function per user-facing operation                   │
//! │  - Return structured CmdResult values, never print          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Database (database.rs), Filter (filter/)                   │
//! │  - Ordered entries, identifier index, merge, persistence    │
//! │  - Query language compiled to a tree, evaluated per entry   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Codec (codec/), Model (model.rs), Fields (fields.rs)       │
//! │  - Text format parse/dump, plain vs. confidential values    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Data Flow
//!
//! File text is cut into entry blocks at `=` name headers, each block is
//! parsed by the codec into an [`model::Entry`], and the entries are added to a
//! [`database::Database`], which assigns identifiers and item numbers. Queries
//! compile filter text into a [`filter::Filter`] and walk the database in its
//! current order. Output goes back through the codec, or through
//! [`model::EntryRecord`] for JSON and YAML.
//!
//! ## Confidential Values
//!
//! Every attribute value knows whether it is confidential (`pass` and any
//! field starting with `!`). Confidential values format as `<private[N]>`
//! unless explicitly revealed, and are base64-wrapped on disk when the
//! database carries the `conceal` flag. This is concealment from casual
//! view, not encryption.
//!
//! ## Module Overview
//!
//! - [`fields`]: canonical field names, field groups, emission order
//! - [`model`]: `Entry`, `Value`, structured export record
//! - [`codec`]: entry text format
//! - [`filter`]: query language
//! - [`database`]: the entry collection and its file
//! - [`psk`]: OATH preshared key decoding
//! - [`selection`]: item number ranges
//! - [`config`]: layered configuration
//! - [`session`]: open/close lifecycle with cache fallback
//! - [`commands`]: user-facing operations
//! - [`error`]: error types

pub mod codec;
pub mod commands;
pub mod config;
pub mod database;
pub mod error;
pub mod fields;
pub mod filter;
pub mod model;
pub mod psk;
pub mod selection;
pub mod session;

pub use database::{Database, FlushOutcome};
pub use error::{AccdbError, FilterSyntaxError, Result};
pub use filter::Filter;
pub use model::{Entry, Value, ValueKind};
