//! Append-only export of diary snapshots to a flat text file.

use crate::errors::{AppResult, ExportError};
use crate::report;
use crate::store::Snapshot;
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;
use tracing::{debug, info};

/// Opens `path` for appending, creating it if necessary.
///
/// New files are created readable and writable by the owner only.
fn open_for_append(path: &Path) -> Result<File, ExportError> {
    let mut options = OpenOptions::new();
    options.create(true).append(true);
    #[cfg(unix)]
    options.mode(crate::constants::DEFAULT_FILE_PERMISSIONS);

    options.open(path).map_err(|source| ExportError::OpenFailed {
        path: path.to_path_buf(),
        source,
    })
}

/// Appends the events block and then the birthdays block of `snapshot` to
/// the file at `path`.
///
/// An exclusive advisory lock is held on the file while writing so two
/// diaries exporting to the same file do not interleave their lines.
///
/// # Errors
///
/// - `ExportError::OpenFailed` if the file cannot be created or opened
/// - `ExportError::FileBusy` if another process holds the lock
/// - `ExportError::WriteFailed` if writing or flushing fails
///
/// # Examples
///
/// ```no_run
/// use diary::export::append_snapshot;
/// use diary::store::Snapshot;
/// use std::path::Path;
///
/// append_snapshot(Path::new("output.txt"), &Snapshot::default())?;
/// # Ok::<(), diary::AppError>(())
/// ```
pub fn append_snapshot(path: &Path, snapshot: &Snapshot) -> AppResult<()> {
    let file = open_for_append(path)?;

    file.try_lock_exclusive().map_err(|e| {
        if e.raw_os_error() == fs2::lock_contended_error().raw_os_error() {
            ExportError::FileBusy {
                path: path.to_path_buf(),
            }
        } else {
            ExportError::WriteFailed {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    debug!(path = %path.display(), "Acquired export file lock");

    let result = write_locked(&file, snapshot);
    if let Err(e) = FileExt::unlock(&file) {
        debug!(path = %path.display(), error = %e, "Failed to release export file lock");
    }
    result.map_err(|source| ExportError::WriteFailed {
        path: path.to_path_buf(),
        source,
    })?;

    info!(
        path = %path.display(),
        events = snapshot.events.len(),
        birthdays = snapshot.birthdays.len(),
        "Snapshot exported"
    );
    Ok(())
}

fn write_locked(file: &File, snapshot: &Snapshot) -> io::Result<()> {
    let mut writer = BufWriter::new(file);
    for event in &snapshot.events {
        writeln!(writer, "{}", report::format_event(event))?;
    }
    for birthday in &snapshot.birthdays {
        writeln!(writer, "{}", report::format_birthday(birthday))?;
    }
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use crate::model::{Birthday, Event, Person};
    use chrono::{TimeZone, Utc};
    use std::fs;
    use tempfile::tempdir;

    fn snapshot() -> Snapshot {
        Snapshot {
            events: vec![Event {
                created: Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
                expires: Utc.with_ymd_and_hms(2024, 5, 3, 9, 0, 0).unwrap(),
                description: "Meeting with friends".to_string(),
            }],
            birthdays: vec![Birthday::new(
                Utc.with_ymd_and_hms(1994, 5, 2, 0, 0, 0).unwrap(),
                Person::new("John", "Doe", "Sr."),
                30,
            )],
        }
    }

    #[test]
    fn test_append_snapshot_creates_and_appends() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("output.txt");

        append_snapshot(&path, &snapshot()).unwrap();
        append_snapshot(&path, &snapshot()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines,
            [
                "event | 2024-05-01 09:00:00 | 2024-05-03 09:00:00 | Meeting with friends",
                "birthday | John Doe Sr. | 1994-05-02 00:00:00 | 30",
                "event | 2024-05-01 09:00:00 | 2024-05-03 09:00:00 | Meeting with friends",
                "birthday | John Doe Sr. | 1994-05-02 00:00:00 | 30",
            ]
        );
    }

    #[test]
    fn test_empty_snapshot_still_creates_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.txt");

        append_snapshot(&path, &Snapshot::default()).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[cfg(unix)]
    #[test]
    fn test_new_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("output.txt");
        append_snapshot(&path, &snapshot()).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o077, 0);
    }

    #[test]
    fn test_unopenable_path_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("output.txt");

        let result = append_snapshot(&path, &snapshot());
        assert!(matches!(
            result,
            Err(AppError::Export(ExportError::OpenFailed { .. }))
        ));
    }

    #[test]
    fn test_locked_file_is_busy() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("output.txt");
        let holder = open_for_append(&path).unwrap();
        holder.lock_exclusive().unwrap();

        let result = append_snapshot(&path, &snapshot());
        assert!(matches!(
            result,
            Err(AppError::Export(ExportError::FileBusy { .. }))
        ));

        FileExt::unlock(&holder).unwrap();
        append_snapshot(&path, &snapshot()).unwrap();
    }
}
