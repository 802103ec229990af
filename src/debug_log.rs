//! Render debug event file (`--render-debug-log`).
//!
//! Layout passes, diagram submissions, worker messages and frame draws are
//! appended with a millisecond offset from when the file was opened. Timing
//! scopes are `tracing` spans on the `perf` target instead; see `main`.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

const HEADER: &str = "splitmark render debug log start";

static ACTIVE: Mutex<Option<EventLog>> = Mutex::new(None);

/// An open event file.
#[derive(Debug)]
pub struct EventLog {
    opened: Instant,
    writer: BufWriter<File>,
}

impl EventLog {
    /// Create (or truncate) the file at `path` and write the header line.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    pub fn create(path: &Path) -> io::Result<Self> {
        let mut writer = BufWriter::new(File::create(path)?);
        writeln!(writer, "{HEADER}")?;
        writer.flush()?;
        Ok(Self {
            opened: Instant::now(),
            writer,
        })
    }

    fn append(&mut self, name: &str, detail: &str) -> io::Result<()> {
        let at_ms = self.opened.elapsed().as_secs_f64() * 1000.0;
        writeln!(self.writer, "[{at_ms:>10.3} ms] {name}: {detail}")?;
        self.writer.flush()
    }
}

fn active() -> MutexGuard<'static, Option<EventLog>> {
    ACTIVE.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Route [`record`] into `log`, or stop recording with `None`.
pub fn install(log: Option<EventLog>) {
    *active() = log;
}

pub fn is_active() -> bool {
    active().is_some()
}

/// Append one event when a log is installed. Write failures drop the log.
pub fn record(name: &str, detail: impl AsRef<str>) {
    let mut slot = active();
    let Some(log) = slot.as_mut() else {
        return;
    };
    if let Err(err) = log.append(name, detail.as_ref()) {
        tracing::debug!(error = %err, "render debug log closed after write failure");
        *slot = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_installed_log_records_events_until_removed() {
        let file = NamedTempFile::new().unwrap();
        install(Some(EventLog::create(file.path()).unwrap()));
        assert!(is_active());

        record("layout.pass", "width=80 lines=12");
        install(None);
        assert!(!is_active());
        record("ignored", "after removal");

        // Other tests may record into the slot while it is installed.
        let content = std::fs::read_to_string(file.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], HEADER);
        let event = lines
            .iter()
            .find(|line| line.ends_with("layout.pass: width=80 lines=12"))
            .unwrap();
        assert!(event.starts_with('['));
        assert!(!content.contains("after removal"));
    }

    #[test]
    fn test_create_fails_for_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = EventLog::create(&dir.path().join("missing").join("log.txt")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
