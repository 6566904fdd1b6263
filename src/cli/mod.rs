use crate::config::{expand_path, Config};
use crate::constants::{APP_DESCRIPTION, APP_NAME, DEFAULT_LOG_LEVEL, LOG_FORMAT_JSON, LOG_FORMAT_TEXT};
use crate::errors::AppResult;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// A personal diary of events and birthdays
#[derive(Parser, Debug)]
#[clap(name = APP_NAME, about = APP_DESCRIPTION)]
#[clap(author, version, long_about = None)]
pub struct CliArgs {
    /// File the `save` command appends to (overrides DIARY_OUTPUT)
    #[clap(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Seconds between expired-event sweeps (overrides DIARY_EVENT_SWEEP_SECS)
    #[clap(long, value_name = "SECS")]
    pub event_sweep_secs: Option<u64>,

    /// Seconds between birthday checks (overrides DIARY_BIRTHDAY_CHECK_SECS)
    #[clap(long, value_name = "SECS")]
    pub birthday_check_secs: Option<u64>,

    /// Log output format
    #[clap(long, default_value = LOG_FORMAT_TEXT, value_parser = [LOG_FORMAT_TEXT, LOG_FORMAT_JSON])]
    pub log_format: String,

    /// Log level filter used when RUST_LOG is not set
    #[clap(long, default_value = DEFAULT_LOG_LEVEL)]
    pub log_level: String,

    /// Print verbose output
    #[clap(short = 'v', long)]
    pub verbose: bool,
}

impl CliArgs {
    /// Parse command-line arguments
    pub fn parse() -> Self {
        CliArgs::parse_from(std::env::args())
    }

    /// The effective log filter: `debug` when verbose, otherwise `--log-level`.
    pub fn log_filter(&self) -> &str {
        if self.verbose {
            "debug"
        } else {
            &self.log_level
        }
    }

    /// Applies any flags given on the command line on top of `config` and
    /// re-validates it.
    pub fn apply_to(&self, config: &mut Config) -> AppResult<()> {
        if let Some(output) = &self.output {
            config.output_path = expand_path(&output.to_string_lossy())?;
        }
        if let Some(secs) = self.event_sweep_secs {
            config.schedule.event_sweep_interval = Duration::from_secs(secs);
        }
        if let Some(secs) = self.birthday_check_secs {
            config.schedule.birthday_check_interval = Duration::from_secs(secs);
        }
        config.validate()
    }
}
