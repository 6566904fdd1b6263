//! The diary facade.
//!
//! [`Diary`] wires a clock, an [`EntryStore`], a notifier and a
//! [`MaintenanceWorker`] together. The worker starts when the diary is built
//! and is stopped and joined by [`Diary::shutdown`] or when the diary is
//! dropped.

use crate::clock::Clock;
use crate::errors::AppResult;
use crate::export;
use crate::model::{Birthday, Event, Person};
use crate::notify::Notifier;
use crate::report;
use crate::store::{EntryStore, Snapshot};
use crate::worker::{self, MaintenanceWorker, Schedule, WorkerState};
use chrono::{DateTime, NaiveDate, Utc};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

/// A running diary: the entry store plus its background maintenance.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, Utc};
/// use diary::clock::SystemClock;
/// use diary::notify::RecordingNotifier;
/// use diary::worker::Schedule;
/// use diary::Diary;
/// use std::sync::Arc;
///
/// let mut diary = Diary::new(
///     Arc::new(SystemClock),
///     Arc::new(RecordingNotifier::new()),
///     Schedule::default(),
/// )?;
/// diary.add_event(Utc::now() + Duration::hours(48), "Meeting with friends");
/// assert_eq!(diary.events_today().len(), 1);
/// diary.shutdown()?;
/// # Ok::<(), diary::AppError>(())
/// ```
pub struct Diary {
    store: Arc<EntryStore>,
    notifier: Arc<dyn Notifier>,
    worker: MaintenanceWorker,
}

impl Diary {
    /// Builds an empty diary and starts its maintenance worker.
    pub fn new(
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn Notifier>,
        schedule: Schedule,
    ) -> AppResult<Self> {
        let store = Arc::new(EntryStore::new(clock));
        let worker = MaintenanceWorker::spawn(Arc::clone(&store), Arc::clone(&notifier), schedule)?;
        Ok(Self {
            store,
            notifier,
            worker,
        })
    }

    /// Shared handle to the underlying store.
    pub fn store(&self) -> &Arc<EntryStore> {
        &self.store
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.store.clock().now()
    }

    pub fn today(&self) -> NaiveDate {
        self.store.clock().today()
    }

    pub fn add_event(&self, expires: DateTime<Utc>, description: impl Into<String>) -> Event {
        self.store.add_event(expires, description)
    }

    pub fn add_birthday(
        &self,
        date: DateTime<Utc>,
        person: Person,
        age: i64,
    ) -> AppResult<Birthday> {
        self.store.add_birthday(date, person, age)
    }

    pub fn snapshot(&self) -> Snapshot {
        self.store.snapshot()
    }

    pub fn events_on(&self, day: NaiveDate) -> Vec<Event> {
        self.store.events_on(day)
    }

    pub fn events_today(&self) -> Vec<Event> {
        self.store.events_today()
    }

    /// Runs an expiry sweep now instead of waiting for the worker.
    pub fn sweep_now(&self) -> usize {
        worker::sweep_expired_events(&self.store)
    }

    /// Runs a birthday check now instead of waiting for the worker.
    pub fn check_birthdays_now(&self) -> usize {
        worker::check_birthdays(&self.store, self.notifier.as_ref())
    }

    /// Writes today's events to `out`.
    pub fn print_today<W: Write>(&self, out: &mut W) -> AppResult<()> {
        report::write_events(out, &self.events_today())
    }

    /// Appends a snapshot of both collections to the file at `path`.
    pub fn export_to(&self, path: &Path) -> AppResult<()> {
        export::append_snapshot(path, &self.snapshot())
    }

    pub fn worker_state(&self) -> WorkerState {
        self.worker.state()
    }

    /// Stops the maintenance worker and waits for it to exit.
    ///
    /// The store stays readable and writable afterwards, but nothing expires
    /// or ages on its own any more.
    pub fn shutdown(&mut self) -> AppResult<()> {
        self.worker.stop()
    }
}
