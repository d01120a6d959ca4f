//! QuickNote interactive CLI.
//!
//! # Responsibility
//! - Parse process flags and bootstrap logging.
//! - Load `notes.txt` from the working directory and hand control to the menu.

mod menu;

use clap::Parser;
use log::{error, info};
use menu::Menu;
use quicknote_core::{
    default_log_level, init_logging, NoteStore, DEFAULT_NOTES_FILE, SAVE_OPERATION_DESCRIPTION,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "quicknote", about = "Keep short text notes in notes.txt", version)]
struct Cli {
    /// Log level: trace|debug|info|warn|error (defaults by build mode)
    #[arg(long)]
    log_level: Option<String>,
    /// Absolute directory for rolling log files; logging is off when omitted
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_ref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("Logging disabled: {err}");
        }
    }
    info!(
        "event=cli_start module=cli status=ok version={}",
        quicknote_core::core_version()
    );

    let stdin = io::stdin();
    let mut menu = Menu::new(NoteStore::new(), DEFAULT_NOTES_FILE, stdin.lock(), io::stdout());

    // Only a broken terminal ends up here; the menu cannot continue without it.
    if let Err(err) = run_session(&mut menu) {
        error!("event=cli_exit module=cli status=error error={}", err);
        eprintln!("Terminal I/O failed: {err}");
        std::process::exit(1);
    }
}

fn run_session<R: BufRead, W: Write>(menu: &mut Menu<R, W>) -> io::Result<()> {
    menu.load_at_startup()?;
    println!("Save operation: {SAVE_OPERATION_DESCRIPTION}");
    menu.run()
}
