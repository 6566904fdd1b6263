/*!
# Diary - events and birthdays at the command line

Starts a diary with a background maintenance worker and reads commands from
standard input until `quit` or end of input. Type `help` for the command list.

## Usage

```
diary [OPTIONS]

Options:
  -o, --output <OUTPUT>               File the `save` command appends to
      --event-sweep-secs <SECS>       Seconds between expired-event sweeps
      --birthday-check-secs <SECS>    Seconds between birthday checks
      --log-format <LOG_FORMAT>       Log output format [default: text] [possible values: text, json]
      --log-level <LOG_LEVEL>         Log level filter used when RUST_LOG is not set [default: info]
  -v, --verbose                       Print verbose output
  -h, --help                          Print help
  -V, --version                       Print version
```

## Configuration

- `DIARY_OUTPUT`: export file (defaults to `output.txt`)
- `DIARY_EVENT_SWEEP_SECS`: seconds between expired-event sweeps (defaults to 60)
- `DIARY_BIRTHDAY_CHECK_SECS`: seconds between birthday checks (defaults to 86400)
- `RUST_LOG`: log filter, takes precedence over `--log-level`
*/

use diary::clock::SystemClock;
use diary::constants::{LOG_FORMAT_JSON, TRACING_ROOT_SPAN_NAME};
use diary::notify::ConsoleNotifier;
use diary::{shell, AppResult, CliArgs, Config, Diary};
use std::io;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, error, info, info_span};
use tracing_subscriber::EnvFilter;

/// Sets up the global `tracing` subscriber. Logs go to stderr so they never
/// mix with shell output.
fn init_tracing(args: &CliArgs) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_filter()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);

    if args.log_format == LOG_FORMAT_JSON {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn run(args: &CliArgs) -> AppResult<()> {
    let mut config = Config::load()?;
    args.apply_to(&mut config)?;
    debug!(?config, "Configuration loaded");

    let mut diary = Diary::new(
        Arc::new(SystemClock),
        Arc::new(ConsoleNotifier),
        config.schedule,
    )?;

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let outcome = shell::run(&diary, stdin.lock(), &mut stdout, &config.output_path);

    // The worker is joined even when the shell failed.
    diary.shutdown()?;
    outcome
}

fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing(&args);

    let correlation_id = uuid::Uuid::new_v4();
    let span = info_span!(TRACING_ROOT_SPAN_NAME, %correlation_id);
    let _guard = span.enter();

    info!("Starting diary");
    match run(&args) {
        Ok(()) => {
            info!("Diary closed");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Diary exited with an error");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
