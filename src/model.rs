//! Diary entry types.
//!
//! Entries are plain values. The store hands out clones, so nothing outside
//! the store ever holds a reference into a live collection.

use chrono::{DateTime, Datelike, NaiveDate, Utc};

/// A person a birthday belongs to. Compared by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Person {
    pub name: String,
    pub surname: String,
    pub fatherland: String,
}

impl Person {
    pub fn new(
        name: impl Into<String>,
        surname: impl Into<String>,
        fatherland: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            surname: surname.into(),
            fatherland: fatherland.into(),
        }
    }

    /// Name, surname and fatherland joined by single spaces.
    pub fn full_name(&self) -> String {
        format!("{} {} {}", self.name, self.surname, self.fatherland)
    }

    /// Returns the label of the first blank name field, if any.
    pub(crate) fn first_empty_field(&self) -> Option<&'static str> {
        [
            ("name", &self.name),
            ("surname", &self.surname),
            ("fatherland", &self.fatherland),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(label, _)| label)
    }
}

/// A time-bounded diary entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Stamped by the store when the event is added.
    pub created: DateTime<Utc>,
    pub expires: DateTime<Utc>,
    pub description: String,
}

impl Event {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires < now
    }
}

/// A recurring dated entry tracking a person's age.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Birthday {
    /// Date of birth; also the dedup key. Never changes once stored.
    pub date: DateTime<Utc>,
    pub person: Person,
    pub age: u32,
    /// Calendar year of the last increment.
    pub last_celebrated: Option<i32>,
}

impl Birthday {
    pub fn new(date: DateTime<Utc>, person: Person, age: u32) -> Self {
        Self {
            date,
            person,
            age,
            last_celebrated: None,
        }
    }

    /// The day this birthday falls on in `year`.
    ///
    /// Feb 29 falls on Feb 28 in common years.
    pub fn anniversary_in(&self, year: i32) -> Option<NaiveDate> {
        let born = self.date.date_naive();
        NaiveDate::from_ymd_opt(year, born.month(), born.day()).or_else(|| {
            (born.month() == 2 && born.day() == 29)
                .then(|| NaiveDate::from_ymd_opt(year, 2, 28))
                .flatten()
        })
    }

    /// A birthday is due when `today` is its anniversary, the stored date is
    /// not later than `today`, and it has not already been celebrated this
    /// year.
    pub fn is_due_on(&self, today: NaiveDate) -> bool {
        self.date.date_naive() <= today
            && self.last_celebrated != Some(today.year())
            && self.anniversary_in(today.year()) == Some(today)
    }

    /// Increments the age and marks the year of `today` as celebrated.
    pub(crate) fn celebrate(&mut self, today: NaiveDate) {
        self.age = self.age.saturating_add(1);
        self.last_celebrated = Some(today.year());
    }
}

/// Emitted by the maintenance worker for every birthday it advances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BirthdayNotice {
    pub person: Person,
    /// The age after the increment.
    pub age: u32,
    /// Date of birth of the entry that fired.
    pub date: DateTime<Utc>,
}

impl BirthdayNotice {
    /// The console line announcing this birthday.
    pub fn message(&self) -> String {
        format!(
            "Happy birthday, {}! Now {} years old.",
            self.person.name, self.age
        )
    }
}
