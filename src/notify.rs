//! Birthday notification sinks.

use crate::model::BirthdayNotice;
use std::io::{self, Write};
use std::sync::Mutex;

/// Receives one call per birthday the maintenance worker advances.
///
/// Implementations must not block for long: the worker delivers notices on
/// its own thread between maintenance steps.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: &BirthdayNotice) -> io::Result<()>;
}

/// Prints each notice as a line on standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: &BirthdayNotice) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", notice.message())?;
        stdout.flush()
    }
}

/// Keeps every notice in memory. Useful for tests and embedding.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    received: Mutex<Vec<BirthdayNotice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies of the notices received so far, in delivery order.
    pub fn received(&self) -> Vec<BirthdayNotice> {
        self.received
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: &BirthdayNotice) -> io::Result<()> {
        self.received
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(notice.clone());
        Ok(())
    }
}
