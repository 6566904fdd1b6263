use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use diary::clock::{Clock, ManualClock};
use diary::model::Person;
use diary::notify::RecordingNotifier;
use diary::worker::{Schedule, WorkerState};
use diary::{Diary, EntryStore};
use std::error::Error;
use std::fs;
use std::sync::Arc;
use std::thread;
use std::time::{Duration as StdDuration, Instant};
use tempfile::tempdir;

fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

fn fast_schedule() -> Schedule {
    Schedule {
        event_sweep_interval: StdDuration::from_millis(10),
        birthday_check_interval: StdDuration::from_millis(10),
    }
}

fn wait_for(condition: impl Fn() -> bool) -> bool {
    let deadline = Instant::now() + StdDuration::from_secs(5);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(StdDuration::from_millis(5));
    }
    condition()
}

fn john() -> Person {
    Person::new("John", "Doe", "Sr.")
}

#[test]
fn test_worker_expires_events_as_clock_moves() -> Result<(), Box<dyn Error>> {
    let clock = Arc::new(ManualClock::new(at(2025, 3, 1, 8)));
    let notifier = Arc::new(RecordingNotifier::new());
    let mut diary = Diary::new(clock.clone(), notifier, fast_schedule())?;

    diary.add_event(at(2025, 3, 1, 10), "standup");
    diary.add_event(at(2025, 3, 3, 10), "dentist");
    assert_eq!(diary.store().event_count(), 2);

    clock.set(at(2025, 3, 2, 0));
    assert!(wait_for(|| diary.store().event_count() == 1));
    let remaining = diary.store().events_snapshot();
    assert_eq!(remaining[0].description, "dentist");

    clock.set(at(2025, 3, 4, 0));
    assert!(wait_for(|| diary.store().event_count() == 0));

    diary.shutdown()?;
    assert_eq!(diary.worker_state(), WorkerState::Stopped);
    Ok(())
}

#[test]
fn test_worker_announces_birthday_exactly_once() -> Result<(), Box<dyn Error>> {
    let clock = Arc::new(ManualClock::new(at(2025, 6, 9, 9)));
    let notifier = Arc::new(RecordingNotifier::new());
    let mut diary = Diary::new(clock.clone(), notifier.clone(), fast_schedule())?;

    diary.add_birthday(at(1990, 6, 10, 0), john(), 34)?;

    clock.set(at(2025, 6, 10, 9));
    assert!(wait_for(|| notifier.received().len() == 1));

    // Many more checks on the same day must not age the entry again.
    thread::sleep(StdDuration::from_millis(100));
    assert_eq!(notifier.received().len(), 1);

    let birthdays = diary.store().birthdays_snapshot();
    assert_eq!(birthdays.len(), 1);
    assert_eq!(birthdays[0].age, 35);
    assert_eq!(birthdays[0].date, at(1990, 6, 10, 0));
    assert_eq!(birthdays[0].last_celebrated, Some(2025));

    let notice = &notifier.received()[0];
    assert_eq!(notice.message(), "Happy birthday, John! Now 35 years old.");

    // A year later the same entry comes round again.
    clock.set(at(2026, 6, 10, 12));
    assert!(wait_for(|| notifier.received().len() == 2));
    assert!(wait_for(|| diary.store().birthdays_snapshot()[0].age == 36));

    diary.shutdown()?;
    Ok(())
}

#[test]
fn test_nothing_changes_after_shutdown() -> Result<(), Box<dyn Error>> {
    let clock = Arc::new(ManualClock::new(at(2025, 1, 1, 0)));
    let notifier = Arc::new(RecordingNotifier::new());
    let mut diary = Diary::new(clock.clone(), notifier.clone(), fast_schedule())?;
    diary.shutdown()?;

    diary.add_event(at(2025, 1, 2, 0), "later");
    diary.add_birthday(at(2000, 1, 5, 0), john(), 24)?;

    clock.set(at(2025, 1, 5, 12));
    thread::sleep(StdDuration::from_millis(100));

    assert_eq!(diary.store().event_count(), 1);
    assert_eq!(diary.store().birthdays_snapshot()[0].age, 24);
    assert!(notifier.received().is_empty());

    // Explicit maintenance still works once the worker is gone.
    assert_eq!(diary.sweep_now(), 1);
    assert_eq!(diary.check_birthdays_now(), 1);
    assert_eq!(notifier.received().len(), 1);
    Ok(())
}

#[test]
fn test_concurrent_writers_while_worker_runs() -> Result<(), Box<dyn Error>> {
    let clock = Arc::new(ManualClock::new(at(2025, 5, 1, 12)));
    let notifier = Arc::new(RecordingNotifier::new());
    let mut diary = Diary::new(clock.clone(), notifier, fast_schedule())?;
    let store = Arc::clone(diary.store());

    let writers: Vec<_> = (0..4i64)
        .map(|w| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..50i64 {
                    let expires = at(2025, 5, 2, 0) + Duration::minutes(w * 100 + i);
                    store.add_event(expires, format!("w{} e{}", w, i));
                    let date = at(1950, 1, 1, 0) + Duration::days(w * 100 + i);
                    store.add_birthday(date, Person::new("A", "B", "C"), 1).unwrap();
                }
            })
        })
        .collect();
    for writer in writers {
        writer.join().expect("writer panicked");
    }

    assert_eq!(store.event_count(), 200);
    assert_eq!(store.birthday_count(), 200);

    let snapshot = diary.snapshot();
    let mut dates: Vec<_> = snapshot.birthdays.iter().map(|b| b.date).collect();
    dates.dedup();
    assert_eq!(dates.len(), 200);
    assert!(snapshot.events.windows(2).all(|w| w[0].expires <= w[1].expires));

    clock.set(at(2025, 5, 10, 0));
    assert!(wait_for(|| store.event_count() == 0));

    diary.shutdown()?;
    Ok(())
}

#[test]
fn test_sweep_is_idempotent() {
    let clock = Arc::new(ManualClock::new(at(2025, 2, 1, 0)));
    let store = EntryStore::new(clock.clone());
    store.add_event(at(2025, 1, 31, 0), "gone");
    store.add_event(at(2025, 2, 1, 0), "boundary");

    let now = clock.now();
    assert_eq!(store.remove_expired_events(now), 1);
    assert_eq!(store.remove_expired_events(now), 0);
    assert_eq!(store.events_snapshot()[0].description, "boundary");
}

#[test]
fn test_ages_never_decrease_over_a_decade() {
    let clock = Arc::new(ManualClock::new(at(2020, 1, 1, 0)));
    let store = EntryStore::new(clock.clone());
    store.add_birthday(at(2019, 7, 4, 0), john(), 1).unwrap();
    store.add_birthday(at(2019, 2, 28, 0), Person::new("Jane", "Roe", "Jr."), 0).unwrap();

    let mut previous: Vec<u32> = store.birthdays_snapshot().iter().map(|b| b.age).collect();
    previous.sort_unstable();
    let mut day = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
    while day < end {
        let noon = day.and_hms_opt(12, 0, 0).unwrap().and_utc();
        store.advance_birthdays(noon);
        store.advance_birthdays(noon);

        let mut ages: Vec<u32> = store.birthdays_snapshot().iter().map(|b| b.age).collect();
        ages.sort_unstable();
        assert!(ages.iter().zip(&previous).all(|(now, before)| now >= before));
        previous = ages;
        day = day.succ_opt().unwrap();
    }

    // One increment per year for each entry.
    assert_eq!(previous, vec![10, 11]);
}

#[test]
fn test_export_appends_snapshots() -> Result<(), Box<dyn Error>> {
    let temp_dir = tempdir()?;
    let output = temp_dir.path().join("output.txt");

    let clock = Arc::new(ManualClock::new(at(2025, 4, 1, 9)));
    let notifier = Arc::new(RecordingNotifier::new());
    let mut diary = Diary::new(clock, notifier, Schedule::default())?;

    diary.add_event(at(2025, 4, 3, 9), "Meeting with friends");
    diary.export_to(&output)?;
    diary.add_birthday(at(1994, 5, 2, 0), john(), 30)?;
    diary.export_to(&output)?;
    diary.shutdown()?;

    let content = fs::read_to_string(&output)?;
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], lines[1]);
    assert!(lines[0].starts_with("event | 2025-04-01 09:00:00 | 2025-04-03 09:00:00"));
    assert_eq!(lines[2], "birthday | John Doe Sr. | 1994-05-02 00:00:00 | 30");
    Ok(())
}
