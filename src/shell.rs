//! Line-oriented interactive shell.
//!
//! Reads one command per line and calls into a [`Diary`]. Works over any
//! `BufRead`/`Write` pair so it can be driven from stdin or from a test.

use crate::constants::{DATE_FORMAT_ISO, TIME_FORMAT};
use crate::diary::Diary;
use crate::errors::{AppError, AppResult};
use crate::model::Person;
use crate::report;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

const HELP: &str = "\
Commands:
  event <YYYY-MM-DD> <HH:MM:SS> <description>    add an event expiring at the given UTC time
  event-in <hours> <description>                 add an event expiring in <hours> hours
  birthday <YYYY-MM-DD> <name> <surname> <fatherland> <age>
                                                 add a birthday
  today                                          list events created today
  events                                         list all events
  birthdays                                      list all birthdays
  save [path]                                    append everything to the export file
  sweep                                          remove expired events now
  check                                          check birthdays now
  help                                           show this help
  quit | exit                                    leave";

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddEvent {
        expires: DateTime<Utc>,
        description: String,
    },
    AddEventIn {
        hours: i64,
        description: String,
    },
    AddBirthday {
        date: DateTime<Utc>,
        person: Person,
        age: i64,
    },
    Today,
    Events,
    Birthdays,
    Save(Option<PathBuf>),
    Sweep,
    Check,
    Help,
    Quit,
}

/// Splits off the first whitespace-delimited word; the rest keeps its inner
/// spacing.
fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim_start();
    match input.find(char::is_whitespace) {
        Some(at) => (&input[..at], input[at..].trim_start()),
        None => (input, ""),
    }
}

fn parse_date(raw: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT_ISO)
        .map_err(|e| AppError::Command(format!("invalid date '{}': {}", raw, e)))
}

fn parse_time(raw: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(raw, TIME_FORMAT)
        .map_err(|e| AppError::Command(format!("invalid time '{}': {}", raw, e)))
}

fn parse_int(raw: &str, what: &str) -> AppResult<i64> {
    raw.parse()
        .map_err(|_| AppError::Command(format!("invalid {} '{}'", what, raw)))
}

fn missing(usage: &str) -> AppError {
    AppError::Command(format!("usage: {}", usage))
}

/// Parses one input line. Returns `Ok(None)` for a blank line.
pub fn parse_command(line: &str) -> AppResult<Option<Command>> {
    let (name, rest) = split_word(line.trim_end());
    let command = match name {
        "" => return Ok(None),
        "event" => {
            let (date, rest) = split_word(rest);
            let (time, description) = split_word(rest);
            if date.is_empty() || time.is_empty() {
                return Err(missing("event <YYYY-MM-DD> <HH:MM:SS> <description>"));
            }
            let expires = NaiveDateTime::new(parse_date(date)?, parse_time(time)?).and_utc();
            Command::AddEvent {
                expires,
                description: description.to_string(),
            }
        }
        "event-in" => {
            let (hours, description) = split_word(rest);
            if hours.is_empty() {
                return Err(missing("event-in <hours> <description>"));
            }
            Command::AddEventIn {
                hours: parse_int(hours, "hours")?,
                description: description.to_string(),
            }
        }
        "birthday" => {
            let fields: Vec<&str> = rest.split_whitespace().collect();
            let &[date, name, surname, fatherland, age] = fields.as_slice() else {
                return Err(missing(
                    "birthday <YYYY-MM-DD> <name> <surname> <fatherland> <age>",
                ));
            };
            Command::AddBirthday {
                date: NaiveDateTime::new(parse_date(date)?, NaiveTime::MIN).and_utc(),
                person: Person::new(name, surname, fatherland),
                age: parse_int(age, "age")?,
            }
        }
        "today" => Command::Today,
        "events" => Command::Events,
        "birthdays" => Command::Birthdays,
        "save" => Command::Save((!rest.is_empty()).then(|| PathBuf::from(rest))),
        "sweep" => Command::Sweep,
        "check" => Command::Check,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => {
            return Err(AppError::Command(format!(
                "unknown command '{}', try 'help'",
                other
            )))
        }
    };
    Ok(Some(command))
}

/// Runs `command` against `diary`, writing any response to `out`.
///
/// Returns `false` once the shell should stop.
pub fn execute<W: Write>(
    diary: &Diary,
    command: Command,
    default_output: &Path,
    out: &mut W,
) -> AppResult<bool> {
    match command {
        Command::AddEvent {
            expires,
            description,
        } => {
            let event = diary.add_event(expires, description);
            writeln!(
                out,
                "Added event expiring {}",
                report::format_timestamp(event.expires)
            )?;
        }
        Command::AddEventIn { hours, description } => {
            let expires = diary
                .now()
                .checked_add_signed(Duration::hours(hours))
                .ok_or_else(|| AppError::Command(format!("{} hours is out of range", hours)))?;
            let event = diary.add_event(expires, description);
            writeln!(
                out,
                "Added event expiring {}",
                report::format_timestamp(event.expires)
            )?;
        }
        Command::AddBirthday { date, person, age } => {
            let birthday = diary.add_birthday(date, person, age)?;
            writeln!(out, "Added birthday for {}", birthday.person.full_name())?;
        }
        Command::Today => {
            let events = diary.events_today();
            if events.is_empty() {
                writeln!(out, "No events today.")?;
            }
            report::write_events(out, &events)?;
        }
        Command::Events => report::write_events(out, &diary.store().events_snapshot())?,
        Command::Birthdays => report::write_birthdays(out, &diary.store().birthdays_snapshot())?,
        Command::Save(path) => {
            let path = path.as_deref().unwrap_or(default_output);
            diary.export_to(path)?;
            writeln!(out, "Saved to {}", path.display())?;
        }
        Command::Sweep => {
            let removed = diary.sweep_now();
            writeln!(out, "Removed {} expired event(s)", removed)?;
        }
        Command::Check => {
            let reached = diary.check_birthdays_now();
            writeln!(out, "{} birthday(s) reached", reached)?;
        }
        Command::Help => writeln!(out, "{}", HELP)?,
        Command::Quit => return Ok(false),
    }
    Ok(true)
}

/// Reads commands from `input` until `quit` or end of input.
///
/// Command failures are reported as `error: ...` lines and the loop keeps
/// going; only failures to read input or write output end the shell.
pub fn run<R: BufRead, W: Write>(
    diary: &Diary,
    input: R,
    out: &mut W,
    default_output: &Path,
) -> AppResult<()> {
    for line in input.lines() {
        let line = line?;
        let outcome = parse_command(&line).and_then(|command| match command {
            Some(command) => {
                debug!(?command, "Executing shell command");
                execute(diary, command, default_output, out)
            }
            None => Ok(true),
        });

        match outcome {
            Ok(true) => {}
            Ok(false) => break,
            Err(AppError::Io(e)) => return Err(AppError::Io(e)),
            Err(e) => writeln!(out, "error: {}", e)?,
        }
        out.flush()?;
    }
    Ok(())
}
