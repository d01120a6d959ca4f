//! Interactive menu loop.
//!
//! # Responsibility
//! - Read one choice per input line and dispatch to `NoteStore` operations.
//! - Turn every error into a user-facing message; nothing here is fatal.
//!
//! # Invariants
//! - End of input behaves like choice `0`.
//! - Exiting cancels and joins reminders that have not fired yet.

use log::{info, warn};
use quicknote_core::{
    spawn_reminder, AddError, NoteListing, NoteStore, ReminderHandle, StoreError,
    DEFAULT_REMINDER_DELAY,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

type SinkFactory = Box<dyn Fn() -> Box<dyn Write + Send>>;

/// Menu choices in display order.
const MENU_ITEMS: [&str; 7] = [
    "1. Add note",
    "2. Show all notes",
    "3. Delete note by number",
    "4. Save to file",
    "5. Load from file",
    "6. Start reminder",
    "0. Exit",
];

enum Flow {
    Continue,
    Exit,
}

/// Line-driven menu over any input/output pair.
pub struct Menu<R, W> {
    input: R,
    output: W,
    store: NoteStore,
    notes_path: PathBuf,
    reminder_delay: Duration,
    reminder_sink: SinkFactory,
    reminders: Vec<ReminderHandle>,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    /// Creates a menu whose reminders print to stdout after the default delay.
    pub fn new(store: NoteStore, notes_path: impl Into<PathBuf>, input: R, output: W) -> Self {
        Self {
            input,
            output,
            store,
            notes_path: notes_path.into(),
            reminder_delay: DEFAULT_REMINDER_DELAY,
            reminder_sink: Box::new(|| -> Box<dyn Write + Send> { Box::new(io::stdout()) }),
            reminders: Vec::new(),
        }
    }

    /// Overrides reminder delay and destination.
    pub fn with_reminder<F>(mut self, delay: Duration, make_sink: F) -> Self
    where
        F: Fn() -> Box<dyn Write + Send> + 'static,
    {
        self.reminder_delay = delay;
        self.reminder_sink = Box::new(make_sink);
        self
    }

    /// Runs until choice `0` or end of input.
    ///
    /// # Errors
    /// - Only failures writing to `output` are returned.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            self.print_menu()?;
            let Some(line) = self.prompt("Choose an action: ")? else {
                return self.exit();
            };

            let choice = match line.trim().parse::<i64>() {
                Ok(choice) => choice,
                Err(_) => {
                    writeln!(self.output, "Invalid input. Please enter a number.")?;
                    continue;
                }
            };

            let flow = match choice {
                1 => self.add_note()?,
                2 => self.show_notes()?,
                3 => self.delete_note()?,
                4 => self.save_notes()?,
                5 => {
                    self.load_notes(true)?;
                    Flow::Continue
                }
                6 => self.start_reminder()?,
                0 => return self.exit(),
                _ => {
                    writeln!(self.output, "Invalid choice. Please try again.")?;
                    Flow::Continue
                }
            };
            if let Flow::Exit = flow {
                return self.exit();
            }
            writeln!(self.output)?;
        }
    }

    /// Startup load: like choice `5`, but silent when the file does not exist yet.
    pub fn load_at_startup(&mut self) -> io::Result<()> {
        self.load_notes(false)
    }

    /// Replaces in-memory notes with the file contents and prints skipped lines.
    fn load_notes(&mut self, announce_missing: bool) -> io::Result<()> {
        match self.store.load(&self.notes_path) {
            Ok(report) if report.source_missing => {
                if !announce_missing {
                    return Ok(());
                }
                writeln!(
                    self.output,
                    "No notes file at {}, nothing loaded.",
                    self.notes_path.display()
                )?;
            }
            Ok(report) => {
                for warning in &report.warnings {
                    writeln!(self.output, "Warning: {warning}")?;
                }
                writeln!(
                    self.output,
                    "Notes loaded from {} ({} notes).",
                    self.notes_path.display(),
                    report.loaded
                )?;
            }
            Err(err) => writeln!(self.output, "Error loading file: {err}")?,
        }
        Ok(())
    }

    fn print_menu(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n--- Note Manager ---")?;
        for item in MENU_ITEMS {
            writeln!(self.output, "{item}")?;
        }
        Ok(())
    }

    /// Prints `label` and reads one line; `None` at end of input.
    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }

    fn add_note(&mut self) -> io::Result<Flow> {
        let Some(text) = self.prompt("Enter note text: ")? else {
            return Ok(Flow::Exit);
        };
        let message = match self.store.add(&text) {
            Ok(_) => "Note added!".to_string(),
            Err(AddError::EmptyText) => "Note text cannot be empty.".to_string(),
            Err(err) => format!("Note not added: {err}."),
        };
        writeln!(self.output, "{message}")?;
        Ok(Flow::Continue)
    }

    fn show_notes(&mut self) -> io::Result<Flow> {
        match self.store.list() {
            NoteListing::Empty => writeln!(self.output, "Note list is empty.")?,
            NoteListing::Entries(entries) => {
                writeln!(self.output, "\n--- All notes ---")?;
                for (position, note) in entries {
                    writeln!(self.output, "{position}. {note}")?;
                }
            }
        }
        Ok(Flow::Continue)
    }

    fn delete_note(&mut self) -> io::Result<Flow> {
        if self.store.is_empty() {
            writeln!(self.output, "Note list is empty. Nothing to delete.")?;
            return Ok(Flow::Continue);
        }

        let Some(line) = self.prompt("Enter note number to delete: ")? else {
            return Ok(Flow::Exit);
        };
        let Ok(number) = line.trim().parse::<i64>() else {
            writeln!(self.output, "Invalid input. Please enter a number.")?;
            return Ok(Flow::Continue);
        };

        let position = usize::try_from(number).unwrap_or(0);
        match self.store.delete_at(position) {
            Ok(_) => writeln!(self.output, "Note deleted!")?,
            Err(StoreError::InvalidPosition { .. }) => {
                writeln!(self.output, "Invalid note number.")?
            }
            Err(err) => writeln!(self.output, "Note not deleted: {err}")?,
        }
        Ok(Flow::Continue)
    }

    fn save_notes(&mut self) -> io::Result<Flow> {
        match self.store.save(&self.notes_path) {
            Ok(_) => writeln!(self.output, "Saved to {}", self.notes_path.display())?,
            Err(err) => writeln!(self.output, "Error saving file: {err}")?,
        }
        Ok(Flow::Continue)
    }

    fn start_reminder(&mut self) -> io::Result<Flow> {
        self.reminders.retain(|handle| !handle.is_finished());

        writeln!(self.output, "Starting reminder...")?;
        let sink = (self.reminder_sink)();
        match spawn_reminder(self.store.count_handle(), self.reminder_delay, sink) {
            Ok(handle) => self.reminders.push(handle),
            Err(err) => writeln!(self.output, "Could not start reminder: {err}")?,
        }
        Ok(Flow::Continue)
    }

    fn exit(&mut self) -> io::Result<()> {
        for handle in self.reminders.drain(..) {
            handle.cancel();
            if handle.join().is_err() {
                warn!("event=reminder module=cli status=error error_code=reminder_panicked");
            }
        }
        info!(
            "event=cli_exit module=cli status=ok notes={}",
            self.store.len()
        );
        writeln!(self.output, "Exiting.")?;
        self.output.flush()
    }
}
