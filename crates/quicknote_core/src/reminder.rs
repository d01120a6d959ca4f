//! Deferred note-count reminder.
//!
//! # Responsibility
//! - Run a fire-and-forget background task that reports the note count after
//!   a fixed delay.
//!
//! # Invariants
//! - The task never mutates the store; it only reads `NoteCountHandle`.
//! - Cancellation before the deadline prints nothing.
//! - Dropping `ReminderHandle` detaches the task; it still fires on time.

use crate::store::note_store::NoteCountHandle;
use log::{info, warn};
use std::io::Write;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

pub const DEFAULT_REMINDER_DELAY: Duration = Duration::from_secs(2);

const REMINDER_THREAD_NAME: &str = "quicknote-reminder";

/// How a reminder task ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderOutcome {
    /// Deadline reached; `count` is the value that was reported.
    Fired { count: usize },
    /// Cancelled before the deadline.
    Cancelled,
}

/// Owner-side handle for one running reminder.
#[derive(Debug)]
pub struct ReminderHandle {
    cancel_tx: Sender<()>,
    thread: JoinHandle<ReminderOutcome>,
}

impl ReminderHandle {
    /// Requests early exit. No-op when the task already finished.
    pub fn cancel(&self) {
        let _ = self.cancel_tx.send(());
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Waits for the task; `Err` carries the panic payload if it panicked.
    pub fn join(self) -> std::thread::Result<ReminderOutcome> {
        self.thread.join()
    }
}

/// Spawns a reminder that writes the note count to `sink` after `delay`.
///
/// # Errors
/// - Returns the OS error when the thread cannot be spawned.
pub fn spawn_reminder<W>(
    counter: NoteCountHandle,
    delay: Duration,
    mut sink: W,
) -> std::io::Result<ReminderHandle>
where
    W: Write + Send + 'static,
{
    let (cancel_tx, cancel_rx) = mpsc::channel::<()>();
    let deadline = Instant::now() + delay;

    let thread = std::thread::Builder::new()
        .name(REMINDER_THREAD_NAME.to_string())
        .spawn(move || {
            match cancel_rx.recv_timeout(delay) {
                Ok(()) => {
                    info!("event=reminder module=reminder status=interrupted");
                    return ReminderOutcome::Cancelled;
                }
                Err(RecvTimeoutError::Timeout) => {}
                // Handle dropped: keep the original deadline.
                Err(RecvTimeoutError::Disconnected) => {
                    std::thread::sleep(deadline.saturating_duration_since(Instant::now()));
                }
            }

            let count = counter.get();
            if let Err(err) = write_reminder(&mut sink, count) {
                warn!(
                    "event=reminder module=reminder status=error error_code=write_failed error={}",
                    err
                );
            }
            info!(
                "event=reminder module=reminder status=ok count={}",
                count
            );
            ReminderOutcome::Fired { count }
        })?;

    info!(
        "event=reminder module=reminder status=start delay_ms={}",
        delay.as_millis()
    );
    Ok(ReminderHandle { cancel_tx, thread })
}

fn write_reminder<W: Write>(sink: &mut W, count: usize) -> std::io::Result<()> {
    let noun = if count == 1 { "note" } else { "notes" };
    writeln!(sink, "Reminder: you have {count} {noun}!")?;
    writeln!(sink, "Reminder check finished.")?;
    sink.flush()
}
