use thiserror::Error;
use uuid::Uuid;

/// Structural problems in a filter expression.
///
/// These are raised while compiling, before any entry is scanned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterSyntaxError {
    #[error("unclosed '(' (depth {depth})")]
    UnclosedParen { depth: usize },

    #[error("too many ')'s (depth {depth})")]
    ExtraCloseParen { depth: isize },

    #[error("unknown operator {op:?} in ({filter})")]
    UnknownOperator { op: String, filter: String },

    #[error("wrong number of arguments for '{op}' (expected {expected}, got {got})")]
    WrongArity {
        op: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("empty filter")]
    Empty,

    #[error("invalid regex {pattern:?}: {reason}")]
    InvalidRegex { pattern: String, reason: String },
}

#[derive(Error, Debug)]
pub enum AccdbError {
    #[error("Duplicate UUID {0}")]
    DuplicateId(Uuid),

    #[error("Entry not found: {0}")]
    EntryNotFound(Uuid),

    #[error("Entry is missing UUID")]
    MissingId,

    #[error("Item {item} out of range (database has {count} items)")]
    ItemOutOfRange { item: usize, count: usize },

    #[error("Syntax error in filter: {0}")]
    Filter(#[from] FilterSyntaxError),

    #[error("Invalid item range: {0:?}")]
    InvalidRange(String),

    #[error("Invalid preshared key: {0}")]
    InvalidKey(String),

    #[error("No OATH preshared key for item {0}")]
    NoKey(usize),

    #[error("Unsupported export format: {0:?}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Config error: {0}")]
    Config(#[from] confique::Error),
}

pub type Result<T> = std::result::Result<T, AccdbError>;
