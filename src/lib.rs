/*!
# Diary

Diary keeps two kinds of personal entries: time-bounded events and recurring
birthdays. A background worker expires events once they are over and ages
birthdays when they come round, announcing each one.

## Core Features

- Add events with an expiry time; they disappear on their own once expired
- Add birthdays with a person and an age; duplicates by date are rejected
- List today's events, all events, all birthdays
- Append a snapshot of everything to a flat text file

## Architecture

- `clock`: time source abstraction, swappable for tests
- `model`: `Person`, `Event`, `Birthday` and `BirthdayNotice`
- `store`: the concurrent entry store, one lock per collection
- `worker`: the background maintenance thread and its schedule
- `notify`: where birthday notices go
- `report` / `export`: formatting and the append-only export file
- `diary`: ties the store and worker together and owns the worker's lifecycle
- `shell`: line-oriented command loop
- `cli` / `config`: command-line flags and environment configuration
- `errors`: error handling infrastructure

## Usage Example

```rust,no_run
use chrono::{Duration, Utc};
use diary::clock::SystemClock;
use diary::model::Person;
use diary::notify::ConsoleNotifier;
use diary::{Config, Diary};
use std::sync::Arc;

fn main() -> diary::AppResult<()> {
    let config = Config::load()?;
    let mut diary = Diary::new(Arc::new(SystemClock), Arc::new(ConsoleNotifier), config.schedule)?;

    diary.add_event(Utc::now() + Duration::hours(48), "Meeting with friends");
    diary.add_birthday(
        Utc::now() + Duration::days(365),
        Person::new("John", "Doe", "Sr."),
        30,
    )?;

    diary.print_today(&mut std::io::stdout())?;
    diary.export_to(&config.output_path)?;
    diary.shutdown()
}
```
*/

/// Command-line interface for parsing and handling user arguments
pub mod cli;
/// Time source abstraction
pub mod clock;
/// Configuration loading and management
pub mod config;
/// Application-wide constants
pub mod constants;
/// Store and worker wired together
pub mod diary;
/// Error types and utilities for error handling
pub mod errors;
/// Append-only export file
pub mod export;
/// Entry types
pub mod model;
/// Birthday notification sinks
pub mod notify;
/// Line formatting for entries
pub mod report;
/// Interactive command loop
pub mod shell;
/// The concurrent entry store
pub mod store;
/// Background maintenance
pub mod worker;

// Re-export important types for convenience
pub use cli::CliArgs;
pub use config::Config;
pub use diary::Diary;
pub use errors::{AppError, AppResult};
pub use store::{EntryStore, Snapshot};
