//! Configuration management for the diary application.
//!
//! Settings are loaded from environment variables with sensible defaults and
//! can be overridden afterwards by command-line flags.
//!
//! # Environment Variables
//!
//! - `DIARY_OUTPUT`: Path of the export file (defaults to `output.txt`)
//! - `DIARY_EVENT_SWEEP_SECS`: Seconds between expired-event sweeps (defaults to 60)
//! - `DIARY_BIRTHDAY_CHECK_SECS`: Seconds between birthday checks (defaults to 86400)

use crate::constants::{
    DEFAULT_OUTPUT_FILE, ENV_VAR_BIRTHDAY_CHECK_SECS, ENV_VAR_DIARY_OUTPUT,
    ENV_VAR_EVENT_SWEEP_SECS,
};
use crate::errors::{AppError, AppResult};
use crate::worker::Schedule;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the diary application.
///
/// # Examples
///
/// ```
/// use diary::Config;
/// use diary::worker::Schedule;
/// use std::path::PathBuf;
///
/// let config = Config {
///     output_path: PathBuf::from("/tmp/diary.txt"),
///     schedule: Schedule::default(),
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// File the `save` command appends snapshots to.
    pub output_path: PathBuf,

    /// Maintenance cadence for the background worker.
    pub schedule: Schedule,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            output_path: PathBuf::from(DEFAULT_OUTPUT_FILE),
            schedule: Schedule::default(),
        }
    }
}

impl Config {
    /// Reads an interval in whole seconds from `var`, or `default` if unset.
    fn interval_from_env(var: &str, default: Duration) -> AppResult<Duration> {
        match env::var(var) {
            Ok(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    AppError::Config(format!(
                        "{} must be a whole number of seconds, got '{}'",
                        var, raw
                    ))
                })?;
                Ok(Duration::from_secs(secs))
            }
            Err(_) => Ok(default),
        }
    }

    /// Loads configuration from environment variables with sensible defaults.
    ///
    /// The output path is expanded with `shellexpand`, so `~` and `$VAR`
    /// references are resolved.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if:
    /// - an interval variable is not a whole number of seconds
    /// - the output path cannot be expanded
    /// - the resulting configuration fails [`validate`](Self::validate)
    pub fn load() -> AppResult<Self> {
        let defaults = Schedule::default();
        let schedule = Schedule {
            event_sweep_interval: Self::interval_from_env(
                ENV_VAR_EVENT_SWEEP_SECS,
                defaults.event_sweep_interval,
            )?,
            birthday_check_interval: Self::interval_from_env(
                ENV_VAR_BIRTHDAY_CHECK_SECS,
                defaults.birthday_check_interval,
            )?,
        };

        let output_raw =
            env::var(ENV_VAR_DIARY_OUTPUT).unwrap_or_else(|_| DEFAULT_OUTPUT_FILE.to_string());
        let output_path = expand_path(&output_raw)?;

        let config = Config {
            output_path,
            schedule,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the output path is empty or either
    /// interval is zero.
    pub fn validate(&self) -> AppResult<()> {
        if self.output_path.as_os_str().is_empty() {
            return Err(AppError::Config("Output path is empty".to_string()));
        }
        if self.schedule.event_sweep_interval.is_zero() {
            return Err(AppError::Config(
                "Event sweep interval must be greater than zero".to_string(),
            ));
        }
        if self.schedule.birthday_check_interval.is_zero() {
            return Err(AppError::Config(
                "Birthday check interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Expands `~` and environment variable references in a path.
pub fn expand_path(raw: &str) -> AppResult<PathBuf> {
    let expanded = shellexpand::full(raw)
        .map_err(|e| AppError::Config(format!("Failed to expand path: {}", e)))?;
    Ok(PathBuf::from(expanded.into_owned()))
}
