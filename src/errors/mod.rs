//! Error handling utilities for the diary application.
//!
//! This module provides the central error type `AppError` which represents all
//! possible error conditions that might occur in the application, as well as the
//! convenience type alias `AppResult` for functions that can return these errors.

use chrono::{DateTime, Utc};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Represents the reasons a new diary entry can be rejected by the store.
///
/// Rejections are synchronous and leave the store untouched.
///
/// # Examples
///
/// ```
/// use diary::errors::EntryError;
///
/// let error = EntryError::NegativeAge(-3);
/// assert!(format!("{}", error).contains("-3"));
///
/// let error = EntryError::EmptyNameField { field: "surname" };
/// assert!(format!("{}", error).contains("surname"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryError {
    /// The supplied age was below zero.
    #[error("Age cannot be negative: {0}")]
    NegativeAge(i64),

    /// One of the person's name fields was empty.
    #[error("Person {field} cannot be empty")]
    EmptyNameField {
        /// Which of the name fields was empty
        field: &'static str,
    },

    /// A birthday with the identical date is already stored.
    #[error("A birthday dated {date} already exists")]
    DuplicateDate {
        /// The colliding date
        date: DateTime<Utc>,
    },
}

/// Represents errors that can occur when appending a snapshot to the export file.
///
/// # Examples
///
/// ```
/// use diary::errors::ExportError;
/// use std::path::PathBuf;
///
/// let error = ExportError::FileBusy {
///     path: PathBuf::from("/tmp/output.txt"),
/// };
///
/// assert!(format!("{}", error).contains("another process"));
/// ```
#[derive(Debug, Error)]
pub enum ExportError {
    /// The export file is locked by another writer.
    #[error("Export file is currently being written by another process: {path}")]
    FileBusy {
        /// The path to the locked file
        path: PathBuf,
    },

    /// The export file could not be created or opened for appending.
    #[error("Failed to open export file {path}: {source}. Please check the path and its permissions.")]
    OpenFailed {
        /// The path that could not be opened
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Writing to an opened export file failed.
    #[error("Failed to write export file {path}: {source}")]
    WriteFailed {
        /// The path being written
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// Represents all possible errors that can occur in the diary application.
///
/// This enum is the central error type used across the application, with variants
/// for different error categories.
///
/// # Examples
///
/// Creating a configuration error:
/// ```
/// use diary::errors::AppError;
///
/// let error = AppError::Config("Sweep interval must be positive".to_string());
/// assert_eq!(format!("{}", error), "Configuration error: Sweep interval must be positive");
/// ```
///
/// Converting from an entry rejection:
/// ```
/// use diary::errors::{AppError, EntryError};
///
/// let app_error: AppError = EntryError::NegativeAge(-1).into();
/// assert!(matches!(app_error, AppError::Entry(EntryError::NegativeAge(-1))));
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Errors related to configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input/output errors from console or filesystem operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A new entry was rejected by the store.
    #[error("Entry rejected: {0}")]
    Entry(#[from] EntryError),

    /// Writing the export file failed.
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// A shell command could not be parsed.
    #[error("Invalid command: {0}")]
    Command(String),

    /// The background worker could not be started or joined.
    #[error("Maintenance worker error: {0}")]
    Worker(String),
}

/// A type alias for `Result<T, AppError>` to simplify function signatures.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_app_error_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let app_error: AppError = io_error.into();

        match app_error {
            AppError::Io(inner) => assert_eq!(inner.kind(), io::ErrorKind::NotFound),
            _ => panic!("Expected AppError::Io variant"),
        }
    }

    #[test]
    fn test_app_error_display() {
        let config_error = AppError::Config("bad interval".to_string());
        assert_eq!(format!("{}", config_error), "Configuration error: bad interval");

        let command_error = AppError::Command("unknown command 'foo'".to_string());
        assert_eq!(
            format!("{}", command_error),
            "Invalid command: unknown command 'foo'"
        );

        let worker_error = AppError::Worker("thread panicked".to_string());
        assert_eq!(
            format!("{}", worker_error),
            "Maintenance worker error: thread panicked"
        );
    }

    #[test]
    fn test_duplicate_date_display() {
        let date = Utc.with_ymd_and_hms(2020, 5, 17, 9, 30, 0).unwrap();
        let error: AppError = EntryError::DuplicateDate { date }.into();
        let message = format!("{}", error);
        assert!(message.starts_with("Entry rejected:"));
        assert!(message.contains("2020-05-17"));
    }

    #[test]
    fn test_export_error_keeps_source() {
        use std::error::Error as _;

        let error = ExportError::OpenFailed {
            path: PathBuf::from("/nonexistent/output.txt"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        };
        assert!(format!("{}", error).contains("/nonexistent/output.txt"));
        assert!(error.source().is_some());
    }
}
