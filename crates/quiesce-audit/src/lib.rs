//! Structured, leveled audit sink.
//!
//! Every quiesce component emits its decisions through an [`AuditSink`]: one
//! formatted, timestamped line per event, written to standard output and, when
//! the caller has configured a log destination, appended to that file with a
//! synchronous flush per event. Events are mirrored onto `tracing` at the
//! matching level so the sink composes with whatever subscriber the embedding
//! process installs.
//!
//! An ERROR-level event never terminates the process; it accompanies a typed
//! failure returned by the emitting operation, and the caller decides whether
//! that failure aborts the enclosing sequence.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

/// Severity of an audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuditLevel {
    /// Informational; never blocks subsequent steps.
    Info,
    /// Unexpected but tolerated; never blocks subsequent steps.
    Warning,
    /// A failure surfaced to the invoking layer.
    Error,
}

impl fmt::Display for AuditLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        };
        f.write_str(name)
    }
}

/// One audit event.
#[derive(Debug, Clone)]
pub struct AuditEvent {
    /// When the event was emitted.
    pub timestamp: DateTime<Utc>,
    /// Event severity.
    pub level: AuditLevel,
    /// Human-readable message.
    pub message: String,
}

impl AuditEvent {
    /// Render the event as one log line.
    #[must_use]
    pub fn format_line(&self) -> String {
        format!(
            "{} [{}] {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S%.3f"),
            self.level,
            self.message
        )
    }
}

struct SinkInner {
    log_file: Option<Mutex<File>>,
    quiet: bool,
}

/// Process-wide append-only audit sink.
///
/// Cheap to clone; clones share the same log destination. Appends are guarded
/// by a mutex so the sink stays safe if the caller converges independent
/// targets in parallel.
#[derive(Clone)]
pub struct AuditSink {
    inner: Arc<SinkInner>,
}

impl AuditSink {
    /// A sink that writes to standard output only.
    #[must_use]
    pub fn stdout() -> Self {
        Self {
            inner: Arc::new(SinkInner {
                log_file: None,
                quiet: false,
            }),
        }
    }

    /// A sink for tests: events go to `tracing` only.
    #[must_use]
    pub fn discard() -> Self {
        Self {
            inner: Arc::new(SinkInner {
                log_file: None,
                quiet: true,
            }),
        }
    }

    /// A sink that also appends every line to the given log file.
    ///
    /// The file is created if missing and always opened in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened for appending.
    pub fn with_log_file(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())?;
        Ok(Self {
            inner: Arc::new(SinkInner {
                log_file: Some(Mutex::new(file)),
                quiet: false,
            }),
        })
    }

    /// Emit one event.
    ///
    /// The event is flushed to the log destination before this returns; a
    /// failed append is reported on stderr rather than silently dropped.
    pub fn emit(&self, level: AuditLevel, message: impl Into<String>) {
        let event = AuditEvent {
            timestamp: Utc::now(),
            level,
            message: message.into(),
        };
        let line = event.format_line();

        match level {
            AuditLevel::Info => tracing::info!("{}", event.message),
            AuditLevel::Warning => tracing::warn!("{}", event.message),
            AuditLevel::Error => tracing::error!("{}", event.message),
        }

        if !self.inner.quiet {
            println!("{line}");
        }

        if let Some(file) = &self.inner.log_file {
            let mut file = file.lock();
            if let Err(err) = writeln!(file, "{line}").and_then(|()| file.flush()) {
                eprintln!("audit log append failed: {err}");
            }
        }
    }

    /// Emit an INFO event.
    pub fn info(&self, message: impl Into<String>) {
        self.emit(AuditLevel::Info, message);
    }

    /// Emit a WARNING event.
    pub fn warning(&self, message: impl Into<String>) {
        self.emit(AuditLevel::Warning, message);
    }

    /// Emit an ERROR event.
    ///
    /// Emitting at this level does not abort anything by itself; the
    /// operation that called this returns the matching typed failure.
    pub fn error(&self, message: impl Into<String>) {
        self.emit(AuditLevel::Error, message);
    }
}

impl fmt::Debug for AuditSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuditSink")
            .field("log_file", &self.inner.log_file.is_some())
            .finish()
    }
}
