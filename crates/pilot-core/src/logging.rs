//! Run logging
//!
//! A run writes its log into its own output area. The configuration engine
//! only talks to a [`LogSink`]; how the sink formats and where it writes is
//! up to the [`SinkFactory`] handed to the context.

use crate::{Error, Result};
use pilot_fs::{NormalizedPath, PilotPath};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{File, OpenOptions};
use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::Dispatch;
use tracing_subscriber::{EnvFilter, fmt as tfmt, prelude::*};

/// Minimum level a run log records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verbosity {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
    Critical,
}

impl Verbosity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verbosity::Debug => "DEBUG",
            Verbosity::Info => "INFO",
            Verbosity::Warning => "WARNING",
            Verbosity::Error => "ERROR",
            Verbosity::Critical => "CRITICAL",
        }
    }

    /// `EnvFilter` directive for this verbosity.
    fn directive(&self) -> &'static str {
        match self {
            Verbosity::Debug => "debug",
            Verbosity::Info => "info",
            Verbosity::Warning => "warn",
            Verbosity::Error | Verbosity::Critical => "error",
        }
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verbosity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(Verbosity::Debug),
            "INFO" => Ok(Verbosity::Info),
            "WARNING" | "WARN" => Ok(Verbosity::Warning),
            "ERROR" => Ok(Verbosity::Error),
            "CRITICAL" => Ok(Verbosity::Critical),
            _ => Err(Error::Sink {
                message: format!("unknown verbosity '{s}'"),
            }),
        }
    }
}

/// Destination of a run's log messages.
pub trait LogSink: Send + Sync {
    fn debug(&self, message: &str);
    fn info(&self, message: &str);
    fn warning(&self, message: &str);
    fn error(&self, message: &str);
}

/// Builds the sink for a run from its output area and verbosity.
pub type SinkFactory =
    Arc<dyn Fn(&NormalizedPath, Verbosity) -> Result<Box<dyn LogSink>> + Send + Sync>;

/// Factory producing a [`TracingSink`] per run.
pub fn tracing_sink_factory() -> SinkFactory {
    Arc::new(|dir, verbosity| Ok(Box::new(TracingSink::open(dir, verbosity)?) as Box<dyn LogSink>))
}

/// Sink writing to `<dir>/pilot.log` through a private tracing dispatcher.
///
/// The dispatcher is only entered while a message is emitted, so no global
/// subscriber is installed and several runs can log side by side.
#[derive(Debug, Clone)]
pub struct TracingSink {
    dispatch: Dispatch,
    path: NormalizedPath,
}

impl TracingSink {
    pub fn open(dir: &NormalizedPath, verbosity: Verbosity) -> Result<Self> {
        let path = dir.join(PilotPath::RunLog.as_str());
        let file: File = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.to_native())
            .map_err(|e| pilot_fs::Error::io(path.to_native(), e))?;

        let filter = EnvFilter::try_new(verbosity.directive()).map_err(|e| Error::Sink {
            message: e.to_string(),
        })?;
        let fmt_layer = tfmt::layer()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_target(false)
            .with_level(true);

        let subscriber = tracing_subscriber::registry().with(filter).with(fmt_layer);

        Ok(Self {
            dispatch: Dispatch::new(subscriber),
            path,
        })
    }

    /// The log file.
    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }

    fn emit(&self, level: Verbosity, message: &str) {
        tracing::dispatcher::with_default(&self.dispatch, || match level {
            Verbosity::Debug => tracing::debug!("{message}"),
            Verbosity::Info => tracing::info!("{message}"),
            Verbosity::Warning => tracing::warn!("{message}"),
            Verbosity::Error | Verbosity::Critical => tracing::error!("{message}"),
        });
    }
}

impl LogSink for TracingSink {
    fn debug(&self, message: &str) {
        self.emit(Verbosity::Debug, message);
    }

    fn info(&self, message: &str) {
        self.emit(Verbosity::Info, message);
    }

    fn warning(&self, message: &str) {
        self.emit(Verbosity::Warning, message);
    }

    fn error(&self, message: &str) {
        self.emit(Verbosity::Error, message);
    }
}

/// One recorded message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub level: Verbosity,
    pub message: String,
}

/// Sink keeping every message in memory.
///
/// Clones share the same record list, so a test can keep one handle and
/// hand the factory to a context.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<LogRecord>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Factory returning handles onto this sink's records.
    pub fn factory(&self) -> SinkFactory {
        let sink = self.clone();
        Arc::new(move |_, _| Ok(Box::new(sink.clone()) as Box<dyn LogSink>))
    }

    pub fn records(&self) -> Vec<LogRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Messages recorded at `level`.
    pub fn messages(&self, level: Verbosity) -> Vec<String> {
        self.records()
            .into_iter()
            .filter(|r| r.level == level)
            .map(|r| r.message)
            .collect()
    }

    fn push(&self, level: Verbosity, message: &str) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(LogRecord {
                level,
                message: message.to_string(),
            });
    }
}

impl LogSink for MemorySink {
    fn debug(&self, message: &str) {
        self.push(Verbosity::Debug, message);
    }

    fn info(&self, message: &str) {
        self.push(Verbosity::Info, message);
    }

    fn warning(&self, message: &str) {
        self.push(Verbosity::Warning, message);
    }

    fn error(&self, message: &str) {
        self.push(Verbosity::Error, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    #[rstest]
    #[case("debug", Verbosity::Debug)]
    #[case("INFO", Verbosity::Info)]
    #[case("warn", Verbosity::Warning)]
    #[case("Critical", Verbosity::Critical)]
    fn parses_verbosity(#[case] input: &str, #[case] expected: Verbosity) {
        assert_eq!(input.parse::<Verbosity>().unwrap(), expected);
    }

    #[test]
    fn rejects_unknown_verbosity() {
        assert!("loud".parse::<Verbosity>().is_err());
    }

    #[test]
    fn tracing_sink_writes_run_log() {
        let temp = TempDir::new().unwrap();
        let dir = NormalizedPath::new(temp.path());

        let sink = TracingSink::open(&dir, Verbosity::Info).unwrap();
        sink.info("Initialized a new config.");
        sink.debug("hidden detail");
        sink.error("something broke");

        let log = std::fs::read_to_string(sink.path().to_native()).unwrap();
        assert!(log.contains("Initialized a new config."));
        assert!(log.contains("something broke"));
        assert!(!log.contains("hidden detail"));
    }

    #[test]
    fn memory_sink_clones_share_records() {
        let sink = MemorySink::new();
        let handle = (sink.factory())(&NormalizedPath::new("."), Verbosity::Debug).unwrap();

        handle.warning("careful");

        assert_eq!(sink.messages(Verbosity::Warning), vec!["careful"]);
    }
}
