//! The concurrent entry store.
//!
//! Events and birthdays live in two independent collections, each behind its
//! own mutex, so event traffic never waits on birthday traffic and vice versa.
//! No method holds both locks at once. Readers only ever receive copies.

use crate::clock::{falls_on, Clock};
use crate::errors::{AppResult, EntryError};
use crate::model::{Birthday, BirthdayNotice, Event, Person};
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// Events keyed by expiry. Equal expiries share a bucket in insertion order.
type EventMap = BTreeMap<DateTime<Utc>, Vec<Event>>;
/// Birthdays keyed by date. The key doubles as the dedup identity.
type BirthdayMap = BTreeMap<DateTime<Utc>, Birthday>;

/// Point-in-time copies of both collections.
///
/// Each half is consistent on its own; the two halves are not taken
/// atomically with respect to each other.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// Ordered by expiry.
    pub events: Vec<Event>,
    /// Ordered by date.
    pub birthdays: Vec<Birthday>,
}

/// Holds the diary's events and birthdays.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use diary::clock::{Clock, ManualClock};
/// use diary::model::Person;
/// use diary::store::EntryStore;
/// use std::sync::Arc;
///
/// let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()));
/// let store = EntryStore::new(clock.clone());
///
/// store.add_event(clock.now() + Duration::hours(48), "Meeting with friends");
/// assert_eq!(store.event_count(), 1);
///
/// let date = Utc.with_ymd_and_hms(1994, 5, 2, 0, 0, 0).unwrap();
/// assert!(store.try_add_birthday(date, Person::new("John", "Doe", "Sr."), 30));
/// assert!(!store.try_add_birthday(date, Person::new("Jane", "Doe", "Jr."), 25));
/// ```
pub struct EntryStore {
    clock: Arc<dyn Clock>,
    events: Mutex<EventMap>,
    birthdays: Mutex<BirthdayMap>,
}

impl EntryStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            events: Mutex::new(BTreeMap::new()),
            birthdays: Mutex::new(BTreeMap::new()),
        }
    }

    /// The clock this store stamps and filters with.
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    // A panic while a guard was held only ever interrupts a single insert or
    // remove on a BTreeMap, which leaves the map itself well-formed.
    fn lock_events(&self) -> MutexGuard<'_, EventMap> {
        self.events.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_birthdays(&self) -> MutexGuard<'_, BirthdayMap> {
        self.birthdays.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Adds an event expiring at `expires`, stamped with the current time.
    ///
    /// Always succeeds. An expiry in the past is accepted and the event is
    /// removed by the next sweep.
    pub fn add_event(&self, expires: DateTime<Utc>, description: impl Into<String>) -> Event {
        let event = Event {
            created: self.clock.now(),
            expires,
            description: description.into(),
        };

        // Built fully before the lock is taken; readers see all of it or none.
        self.lock_events()
            .entry(expires)
            .or_default()
            .push(event.clone());

        debug!(expires = %event.expires, "Event added");
        event
    }

    /// Adds a birthday.
    ///
    /// # Errors
    ///
    /// Returns without mutating the store:
    /// - `EntryError::NegativeAge` if `age` is below zero
    /// - `EntryError::EmptyNameField` if any name field is blank
    /// - `EntryError::DuplicateDate` if a birthday with the same date exists
    pub fn add_birthday(
        &self,
        date: DateTime<Utc>,
        person: Person,
        age: i64,
    ) -> AppResult<Birthday> {
        if age < 0 {
            return Err(EntryError::NegativeAge(age).into());
        }
        let age = u32::try_from(age).map_err(|_| EntryError::NegativeAge(age))?;
        if let Some(field) = person.first_empty_field() {
            return Err(EntryError::EmptyNameField { field }.into());
        }

        let birthday = Birthday::new(date, person, age);

        let mut birthdays = self.lock_birthdays();
        if birthdays.contains_key(&date) {
            return Err(EntryError::DuplicateDate { date }.into());
        }
        birthdays.insert(date, birthday.clone());
        drop(birthdays);

        debug!(date = %date, "Birthday added");
        Ok(birthday)
    }

    /// Flag form of [`add_birthday`](Self::add_birthday).
    pub fn try_add_birthday(&self, date: DateTime<Utc>, person: Person, age: i64) -> bool {
        self.add_birthday(date, person, age).is_ok()
    }

    /// Removes every event whose expiry is strictly before `now`.
    ///
    /// Returns how many were removed. Calling it again with the same `now`
    /// removes nothing.
    pub fn remove_expired_events(&self, now: DateTime<Utc>) -> usize {
        let expired = {
            let mut events = self.lock_events();
            let live = events.split_off(&now);
            std::mem::replace(&mut *events, live)
        };

        let removed = expired.values().map(Vec::len).sum();
        if removed > 0 {
            debug!(removed, "Removed expired events");
        }
        removed
    }

    /// Increments the age of every birthday due on `now`'s day.
    ///
    /// Entries keep their date; each records the year it was last
    /// celebrated so later cycles on the same day leave it alone. The
    /// returned notices are produced under the birthday lock but the caller
    /// delivers them after it is released.
    pub fn advance_birthdays(&self, now: DateTime<Utc>) -> Vec<BirthdayNotice> {
        let today = now.date_naive();
        let mut birthdays = self.lock_birthdays();

        birthdays
            .values_mut()
            .filter(|birthday| birthday.is_due_on(today))
            .map(|birthday| {
                birthday.celebrate(today);
                debug!(date = %birthday.date, age = birthday.age, "Birthday advanced");
                BirthdayNotice {
                    person: birthday.person.clone(),
                    age: birthday.age,
                    date: birthday.date,
                }
            })
            .collect()
    }

    /// Copies of all events, ordered by expiry.
    pub fn events_snapshot(&self) -> Vec<Event> {
        self.lock_events().values().flatten().cloned().collect()
    }

    /// Copies of all birthdays, ordered by date.
    pub fn birthdays_snapshot(&self) -> Vec<Birthday> {
        self.lock_birthdays().values().cloned().collect()
    }

    /// Copies of both collections.
    pub fn snapshot(&self) -> Snapshot {
        let events = self.events_snapshot();
        let birthdays = self.birthdays_snapshot();
        Snapshot { events, birthdays }
    }

    /// Events created during `day` (UTC).
    pub fn events_on(&self, day: NaiveDate) -> Vec<Event> {
        self.events_snapshot()
            .into_iter()
            .filter(|event| falls_on(event.created, day))
            .collect()
    }

    /// Events created during the clock's current day.
    pub fn events_today(&self) -> Vec<Event> {
        self.events_on(self.clock.today())
    }

    pub fn event_count(&self) -> usize {
        self.lock_events().values().map(Vec::len).sum()
    }

    pub fn birthday_count(&self) -> usize {
        self.lock_birthdays().len()
    }
}
