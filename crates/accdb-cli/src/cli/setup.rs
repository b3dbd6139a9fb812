use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Returns the version string, including the git hash for non-release builds.
/// Format for releases: "v0.3.0"
/// Format for dev builds: "v0.3.0 (dev: abc1234)"
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            format!("v{}", VERSION)
        } else {
            format!("v{} (dev: {})", VERSION, GIT_HASH)
        }
    })
}

#[derive(Parser, Debug)]
#[command(
    name = "accdb",
    bin_name = "accdb",
    version = get_version(),
    disable_help_subcommand = true
)]
#[command(about = "Account database kept in a plain text file", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Database file (overrides $ACCDB and the config file)
    #[arg(short, long, global = true, value_name = "PATH", help_heading = "Options")]
    pub file: Option<PathBuf>,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Search for entries
    #[command(alias = "g", display_order = 1)]
    Grep {
        /// Filters, combined with AND (default: everything)
        filter: Vec<String>,
    },

    /// Search for entries and list their names
    #[command(display_order = 2)]
    Ls {
        /// Filters, combined with AND (default: everything)
        filter: Vec<String>,
    },

    /// Search for entries and export their full contents
    #[command(display_order = 3)]
    Rgrep {
        /// Filters, combined with AND (default: everything)
        filter: Vec<String>,
    },

    /// Display entries (safe)
    #[command(alias = "s", display_order = 10)]
    Show {
        /// Item numbers or ranges (e.g. 3 1-2,5)
        #[arg(required = true, num_args = 1..)]
        items: Vec<String>,
    },

    /// Display entries, including sensitive information
    #[command(alias = "re", display_order = 11)]
    Reveal {
        /// Item numbers or ranges (e.g. 3 1-2,5)
        #[arg(required = true, num_args = 1..)]
        items: Vec<String>,
    },

    /// Print the OATH preshared key of entries in base32
    #[command(display_order = 12)]
    Key {
        /// Item numbers or ranges (e.g. 3 1-2,5)
        #[arg(required = true, num_args = 1..)]
        items: Vec<String>,
    },

    /// Dump the database to stdout (storage, safe, json, yaml)
    #[command(display_order = 20)]
    Dump {
        #[arg(default_value = "storage")]
        format: String,
    },

    /// Read entries from stdin and dump them to stdout
    #[command(display_order = 21)]
    Convert {
        #[arg(default_value = "storage")]
        format: String,
    },

    /// Read entries from stdin and merge them into the database
    #[command(display_order = 22)]
    Merge,

    /// Sort and rewrite the database
    #[command(display_order = 30)]
    Sort,

    /// Rewrite the database file
    #[command(alias = "w", display_order = 31)]
    Touch,

    /// List all tags used by the database's entries
    #[command(display_order = 32)]
    Lstags,
}

pub fn parse_cli() -> Cli {
    Cli::parse()
}
