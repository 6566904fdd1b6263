//! Background maintenance.
//!
//! A [`MaintenanceWorker`] owns one named thread that periodically sweeps
//! expired events out of the [`EntryStore`] and advances birthdays that have
//! come round, handing a notice for each to a [`Notifier`].
//!
//! The thread is never detached. It is started by [`MaintenanceWorker::spawn`]
//! and stopped by [`MaintenanceWorker::stop`] or by dropping the handle; both
//! wake the thread out of its wait and join it, so shutdown does not wait out
//! the remaining interval.

use crate::constants::{
    DEFAULT_BIRTHDAY_CHECK_INTERVAL, DEFAULT_EVENT_SWEEP_INTERVAL, WORKER_THREAD_NAME,
};
use crate::errors::{AppError, AppResult};
use crate::notify::Notifier;
use crate::store::EntryStore;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, info_span, warn};

/// How often each maintenance step runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub event_sweep_interval: Duration,
    pub birthday_check_interval: Duration,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            event_sweep_interval: DEFAULT_EVENT_SWEEP_INTERVAL,
            birthday_check_interval: DEFAULT_BIRTHDAY_CHECK_INTERVAL,
        }
    }
}

/// Lifecycle of a worker. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Running,
    Stopped,
}

/// Stop flag paired with a condvar so a waiting worker wakes immediately.
#[derive(Debug, Default)]
struct StopSignal {
    requested: Mutex<bool>,
    wakeup: Condvar,
}

impl StopSignal {
    fn request(&self) {
        *self.requested.lock().unwrap_or_else(|e| e.into_inner()) = true;
        self.wakeup.notify_all();
    }

    fn is_requested(&self) -> bool {
        *self.requested.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Blocks until `deadline` passes or a stop is requested.
    ///
    /// Returns `true` if a stop was requested.
    fn wait_until(&self, deadline: Instant) -> bool {
        let mut requested = self.requested.lock().unwrap_or_else(|e| e.into_inner());
        loop {
            if *requested {
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            // Spurious wakeups just go round the loop again.
            requested = self
                .wakeup
                .wait_timeout(requested, deadline - now)
                .unwrap_or_else(|e| e.into_inner())
                .0;
        }
    }
}

/// Handle to the running maintenance thread.
///
/// # Examples
///
/// ```
/// use diary::clock::SystemClock;
/// use diary::notify::RecordingNotifier;
/// use diary::store::EntryStore;
/// use diary::worker::{MaintenanceWorker, Schedule, WorkerState};
/// use std::sync::Arc;
///
/// let store = Arc::new(EntryStore::new(Arc::new(SystemClock)));
/// let mut worker = MaintenanceWorker::spawn(
///     Arc::clone(&store),
///     Arc::new(RecordingNotifier::new()),
///     Schedule::default(),
/// )?;
/// assert_eq!(worker.state(), WorkerState::Running);
///
/// worker.stop()?;
/// assert_eq!(worker.state(), WorkerState::Stopped);
/// # Ok::<(), diary::AppError>(())
/// ```
#[derive(Debug)]
pub struct MaintenanceWorker {
    signal: Arc<StopSignal>,
    handle: Option<JoinHandle<()>>,
}

impl MaintenanceWorker {
    /// Starts the maintenance thread. Both steps run once right away.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Worker` if the operating system refuses to create
    /// the thread.
    pub fn spawn(
        store: Arc<EntryStore>,
        notifier: Arc<dyn Notifier>,
        schedule: Schedule,
    ) -> AppResult<Self> {
        let signal = Arc::new(StopSignal::default());
        let thread_signal = Arc::clone(&signal);

        let handle = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || run(&store, notifier.as_ref(), schedule, &thread_signal))
            .map_err(|e| AppError::Worker(format!("Failed to start maintenance thread: {}", e)))?;

        info!(
            sweep_interval = ?schedule.event_sweep_interval,
            check_interval = ?schedule.birthday_check_interval,
            "Maintenance worker started"
        );

        Ok(Self {
            signal,
            handle: Some(handle),
        })
    }

    pub fn state(&self) -> WorkerState {
        match &self.handle {
            Some(handle) if !handle.is_finished() => WorkerState::Running,
            _ => WorkerState::Stopped,
        }
    }

    /// Requests a stop and waits for the thread to exit.
    ///
    /// A maintenance step already underway finishes first. Once this returns
    /// the worker makes no further changes to the store. Calling it again is
    /// a no-op.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Worker` if the thread terminated by panicking.
    pub fn stop(&mut self) -> AppResult<()> {
        self.signal.request();
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };

        handle
            .join()
            .map_err(|_| AppError::Worker("Maintenance thread panicked".to_string()))?;
        info!("Maintenance worker stopped");
        Ok(())
    }
}

impl Drop for MaintenanceWorker {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            error!(error = %e, "Maintenance worker did not shut down cleanly");
        }
    }
}

fn run(store: &EntryStore, notifier: &dyn Notifier, schedule: Schedule, signal: &StopSignal) {
    let span = info_span!("maintenance_worker");
    let _guard = span.enter();

    let mut next_sweep = Instant::now();
    let mut next_check = Instant::now();

    while !signal.is_requested() {
        let now = Instant::now();
        if now >= next_sweep {
            guarded("event_sweep", || {
                sweep_expired_events(store);
            });
            next_sweep = now + schedule.event_sweep_interval;
        }
        if now >= next_check {
            guarded("birthday_check", || {
                check_birthdays(store, notifier);
            });
            next_check = now + schedule.birthday_check_interval;
        }

        if signal.wait_until(next_sweep.min(next_check)) {
            break;
        }
    }

    debug!("Maintenance loop exited");
}

/// Runs one step, containing any panic so the loop carries on and the step
/// is retried at its next scheduled time.
fn guarded(step: &'static str, f: impl FnOnce()) {
    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(f)) {
        let reason = panic_reason(payload.as_ref());
        error!(step, reason = %reason, "Maintenance step failed; retrying next cycle");
    }
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

/// One expiry sweep at the store clock's current time.
pub fn sweep_expired_events(store: &EntryStore) -> usize {
    let removed = store.remove_expired_events(store.clock().now());
    if removed > 0 {
        info!(removed, "Expired events swept");
    }
    removed
}

/// One birthday check at the store clock's current time.
///
/// Notices are delivered after the birthday lock is released. A notifier
/// that fails or panics on one notice is logged and the rest of the batch is
/// still delivered.
pub fn check_birthdays(store: &EntryStore, notifier: &dyn Notifier) -> usize {
    let notices = store.advance_birthdays(store.clock().now());
    for notice in &notices {
        info!(name = %notice.person.name, age = notice.age, "Birthday reached");
        match panic::catch_unwind(AssertUnwindSafe(|| notifier.notify(notice))) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(error = %e, "Failed to deliver birthday notification"),
            Err(payload) => error!(
                reason = %panic_reason(payload.as_ref()),
                "Notifier panicked while delivering a birthday notification"
            ),
        }
    }
    notices.len()
}
