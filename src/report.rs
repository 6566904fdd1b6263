//! Line formatting for events and birthdays.
//!
//! Everything here works on copies obtained from the store, so formatting and
//! writing never happen under a store lock.

use crate::constants::{
    EXPORT_BIRTHDAY_TAG, EXPORT_EVENT_TAG, EXPORT_FIELD_SEPARATOR, TIMESTAMP_FORMAT,
};
use crate::errors::AppResult;
use crate::model::{Birthday, Event};
use crate::store::Snapshot;
use chrono::{DateTime, Utc};
use std::io::Write;

/// Renders a timestamp as `YYYY-MM-DD HH:MM:SS` (UTC).
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// `event | <created> | <expires> | <description>`
pub fn format_event(event: &Event) -> String {
    let fields: [&str; 4] = [
        EXPORT_EVENT_TAG,
        &format_timestamp(event.created),
        &format_timestamp(event.expires),
        &event.description,
    ];
    fields.join(EXPORT_FIELD_SEPARATOR)
}

/// `birthday | <full name> | <date> | <age>`
pub fn format_birthday(birthday: &Birthday) -> String {
    let fields: [&str; 4] = [
        EXPORT_BIRTHDAY_TAG,
        &birthday.person.full_name(),
        &format_timestamp(birthday.date),
        &birthday.age.to_string(),
    ];
    fields.join(EXPORT_FIELD_SEPARATOR)
}

pub fn write_events<W: Write>(out: &mut W, events: &[Event]) -> AppResult<()> {
    for event in events {
        writeln!(out, "{}", format_event(event))?;
    }
    Ok(())
}

pub fn write_birthdays<W: Write>(out: &mut W, birthdays: &[Birthday]) -> AppResult<()> {
    for birthday in birthdays {
        writeln!(out, "{}", format_birthday(birthday))?;
    }
    Ok(())
}

/// Writes the events block followed by the birthdays block.
pub fn write_snapshot<W: Write>(out: &mut W, snapshot: &Snapshot) -> AppResult<()> {
    write_events(out, &snapshot.events)?;
    write_birthdays(out, &snapshot.birthdays)
}
