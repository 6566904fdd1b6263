//! Constants used throughout the application.
//!
//! This module contains all constants used in the diary application, organized
//! into logical groups so they can be found and referenced consistently.

use std::time::Duration;

// Application Metadata
/// The name of the application.
pub const APP_NAME: &str = "diary";
/// The description of the application used in CLI help text.
pub const APP_DESCRIPTION: &str = "A personal diary of events and birthdays";

// Logging
/// Log format identifier for plain text.
pub const LOG_FORMAT_TEXT: &str = "text";
/// Log format identifier for JSON.
pub const LOG_FORMAT_JSON: &str = "json";
/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";
/// Name for the root tracing span covering an application invocation.
pub const TRACING_ROOT_SPAN_NAME: &str = "app_invocation";

// Configuration Keys & Environment Variables
/// Environment variable for the export file path.
pub const ENV_VAR_DIARY_OUTPUT: &str = "DIARY_OUTPUT";
/// Environment variable for the event sweep interval, in seconds.
pub const ENV_VAR_EVENT_SWEEP_SECS: &str = "DIARY_EVENT_SWEEP_SECS";
/// Environment variable for the birthday check interval, in seconds.
pub const ENV_VAR_BIRTHDAY_CHECK_SECS: &str = "DIARY_BIRTHDAY_CHECK_SECS";
/// Default export file, relative to the working directory.
pub const DEFAULT_OUTPUT_FILE: &str = "output.txt";

// Maintenance Cadence
/// Default interval between expired-event sweeps.
pub const DEFAULT_EVENT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);
/// Default interval between birthday checks.
pub const DEFAULT_BIRTHDAY_CHECK_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);
/// Name given to the background maintenance thread.
pub const WORKER_THREAD_NAME: &str = "diary-maintenance";

// File System Parameters
/// Default POSIX permissions for newly created export files (owner read/write).
#[cfg(unix)]
pub const DEFAULT_FILE_PERMISSIONS: u32 = 0o600;

// Date/Time Formatting
/// Fixed timestamp format used for console output and the export file.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// Date format accepted by the shell (YYYY-MM-DD).
pub const DATE_FORMAT_ISO: &str = "%Y-%m-%d";
/// Time format accepted by the shell (HH:MM:SS).
pub const TIME_FORMAT: &str = "%H:%M:%S";

// Export Format
/// Separator between fields of an exported line.
pub const EXPORT_FIELD_SEPARATOR: &str = " | ";
/// Leading tag of an exported event line.
pub const EXPORT_EVENT_TAG: &str = "event";
/// Leading tag of an exported birthday line.
pub const EXPORT_BIRTHDAY_TAG: &str = "birthday";
