//! Debug logging channel for gulp-load-plugins
//!
//! Every message goes through a [`DebugLog`]. A disabled log is a no-op: it
//! performs no I/O and never calls the sink. An enabled log prefixes each
//! message with [`LOG_PREFIX`] and writes it to:
//! - stderr (timestamped, unless turned off with [`DebugLog::without_stderr`])
//! - an optional log file (appended, one line per message)
//! - an optional caller-supplied sink

use colored::Colorize;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Prefix put in front of every debug message
pub const LOG_PREFIX: &str = "gulp-load-plugins";

/// Receives every formatted message (`"gulp-load-plugins: ..."`)
pub type LogSink = Arc<dyn Fn(&str) + Send + Sync>;

/// Debug side channel, disabled unless explicitly turned on
#[derive(Clone)]
pub struct DebugLog {
    enabled: bool,
    stderr: bool,
    log_file: Option<PathBuf>,
    sink: Option<LogSink>,
}

impl Default for DebugLog {
    fn default() -> Self {
        Self::disabled()
    }
}

impl fmt::Debug for DebugLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebugLog")
            .field("enabled", &self.enabled)
            .field("stderr", &self.stderr)
            .field("log_file", &self.log_file)
            .field("sink", &self.sink.is_some())
            .finish()
    }
}

impl DebugLog {
    /// A log that drops every message
    pub fn disabled() -> Self {
        Self::new(false)
    }

    /// Create a log writing to stderr when `enabled`
    pub fn new(enabled: bool) -> Self {
        DebugLog {
            enabled,
            stderr: true,
            log_file: None,
            sink: None,
        }
    }

    /// Also append messages to `path`
    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    /// Hand every message to `sink` in addition to the other outputs
    pub fn with_sink<F>(mut self, sink: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.sink = Some(Arc::new(sink));
        self
    }

    /// Stop writing to stderr (the log file and sink still receive messages)
    pub fn without_stderr(mut self) -> Self {
        self.stderr = false;
        self
    }

    /// Turn the channel on or off, keeping the configured outputs
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }

    /// Log a message; does nothing when the channel is disabled
    pub fn info(&self, message: &str) {
        if !self.enabled {
            return;
        }

        let line = format!("{}: {}", LOG_PREFIX, message);

        if self.stderr {
            let timestamp = chrono::Local::now().format("%H:%M:%S");
            eprintln!(
                "[{}] {}: {}",
                timestamp.to_string().dimmed(),
                LOG_PREFIX.cyan(),
                message
            );
        }

        if let Some(ref path) = self.log_file {
            write_to_log(path, &line);
        }

        if let Some(ref sink) = self.sink {
            sink(&line);
        }
    }
}

/// Append a timestamped line to the log file, ignoring write failures
fn write_to_log(path: &Path, line: &str) {
    if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        let _ = writeln!(file, "[{}] {}", timestamp, line);
    }
}
