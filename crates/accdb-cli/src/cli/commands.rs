//! # CLI Layer
//!
//! The only place in the codebase that:
//! - Knows about stdout, stderr and stdin
//! - Installs the log subscriber
//! - Decides what a run prints
//!
//! ## Responsibilities
//!
//! 1. **Argument Parsing**: `setup.rs` turns the shell words into a [`Cli`]
//! 2. **Context Setup**: load configuration, open the session
//! 3. **Dispatch**: call into `accdb::commands`
//! 4. **Output**: render the returned `CmdResult`
//! 5. **Teardown**: close the session, reporting discarded changes

use super::render::{render_entries, render_message, EntryView};
use super::setup::{parse_cli, Cli, Commands};
use accdb::commands::{self, dump::DumpFormat, CmdResult};
use accdb::config::AccdbConfig;
use accdb::session::Session;
use accdb::{Database, FlushOutcome};
use anyhow::Result;
use console::Term;
use std::io::{self, Read};
use tracing::debug;
use tracing_subscriber::EnvFilter;

pub fn run() -> Result<()> {
    let cli = parse_cli();
    init_logging(cli.verbose);

    let config = load_config(&cli)?;
    let command = cli.command.unwrap_or(Commands::Ls { filter: Vec::new() });

    // convert works on stdin alone
    if let Commands::Convert { format } = &command {
        return convert(format);
    }

    let mut session = Session::from_config(&config)?;
    if session.using_cache() {
        eprintln!("(Using read-only cache.)");
    }

    let outcome = dispatch(&mut session.db, command);
    let closed = session.close();
    outcome?;

    if closed?.flush == FlushOutcome::Discarded {
        eprintln!("(Discarding changes, database read-only)");
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn load_config(cli: &Cli) -> Result<AccdbConfig> {
    let mut config = AccdbConfig::load()?;
    if let Some(file) = &cli.file {
        config.db_path = file.to_string_lossy().into_owned();
    }
    debug!(db_path = %config.db_path, cache_path = %config.cache_path, "configuration");
    Ok(config)
}

fn dispatch(db: &mut Database, command: Commands) -> Result<()> {
    match command {
        Commands::Grep { filter } => {
            let result = commands::grep::run(db, &filter)?;
            print_result(&result, Some(EntryView::Safe));
        }
        Commands::Ls { filter } => {
            let result = commands::grep::run(db, &filter)?;
            print_result(&result, Some(EntryView::Names));
        }
        Commands::Rgrep { filter } => {
            let result = commands::grep::run(db, &filter)?;
            if !Term::stdout().is_term() {
                if let Some(modeline) = db.modeline() {
                    println!("{}", modeline);
                }
            }
            print_result(&result, Some(EntryView::Full));
        }
        Commands::Show { items } => {
            print_result(&commands::show::run(db, &items)?, Some(EntryView::Safe));
        }
        Commands::Reveal { items } => {
            print_result(&commands::show::run(db, &items)?, Some(EntryView::Revealed));
        }
        Commands::Key { items } => {
            print_result(&commands::show::key(db, &items)?, None);
        }
        Commands::Dump { format } => {
            let format: DumpFormat = format.parse()?;
            print_result(&commands::dump::run(db, format)?, None);
        }
        Commands::Convert { format } => convert(&format)?,
        Commands::Merge => {
            let input = read_stdin()?;
            print_result(&commands::merge::run(db, &input)?, None);
        }
        Commands::Sort => print_result(&commands::maintenance::sort(db)?, None),
        Commands::Touch => print_result(&commands::maintenance::touch(db)?, None),
        Commands::Lstags => print_result(&commands::maintenance::lstags(db)?, None),
    }
    Ok(())
}

fn convert(format: &str) -> Result<()> {
    let result = commands::dump::convert(&read_stdin()?, format.parse()?)?;
    print_result(&result, None);
    Ok(())
}

/// Prints entries (when a view is given) and text to stdout, messages to stderr.
fn print_result(result: &CmdResult, view: Option<EntryView>) {
    if let Some(view) = view {
        print!("{}", render_entries(&result.listed_entries, view));
    }
    print!("{}", result.text);
    for message in &result.messages {
        eprintln!("{}", render_message(message));
    }
}

fn read_stdin() -> Result<String> {
    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;
    Ok(input)
}
