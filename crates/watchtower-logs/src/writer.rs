//! Stream log writer
//!
//! Every append is an independent open-write-close cycle: no file handle
//! survives between calls. Appends to the same stream from this process are
//! serialized by a per-stream lock; writers in other processes are not.

use chrono::{DateTime, FixedOffset};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};
use watchtower_core::{constants, is_valid_stream_name, Error, Result, TimeFormat, ValidConfig};

/// Appends timestamped entries to per-stream log files
#[derive(Debug)]
pub struct LogWriter {
    log_dir: PathBuf,
    time_format: TimeFormat,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl LogWriter {
    /// Create a new log writer
    pub fn new(log_dir: PathBuf, time_format: TimeFormat) -> Self {
        Self {
            log_dir,
            time_format,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &ValidConfig) -> Self {
        Self::new(config.log_directory.clone(), config.time_format.clone())
    }

    /// Get the log directory
    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn time_format(&self) -> &TimeFormat {
        &self.time_format
    }

    /// Resolve the file for a stream, rejecting names that escape the log directory
    pub fn stream_path(&self, stream: &str) -> Result<PathBuf> {
        if !is_valid_stream_name(stream) {
            return Err(Error::InvalidStreamName(stream.to_string()));
        }
        Ok(constants::stream_path(&self.log_dir, stream))
    }

    /// Render one entry: `<time> - <message>` followed by a blank line
    pub fn format_entry(&self, message: &str, time: &DateTime<FixedOffset>) -> String {
        format!(
            "{}{}{}{}",
            self.time_format.format(time),
            constants::ENTRY_SEPARATOR,
            message,
            constants::ENTRY_TERMINATOR
        )
    }

    /// Append an entry to a stream's file
    ///
    /// Undeclared streams are accepted; their file is created on first write
    /// as long as the log directory exists.
    pub fn append(
        &self,
        stream: &str,
        message: &str,
        time: &DateTime<FixedOffset>,
    ) -> Result<PathBuf> {
        let path = self.stream_path(stream)?;
        let entry = self.format_entry(message, time);

        let lock = self.stream_lock(stream);
        let _guard = lock.lock();

        let write = || -> std::io::Result<()> {
            let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
            file.write_all(entry.as_bytes())?;
            file.flush()
        };

        write().map_err(|source| {
            warn!("Failed to write to stream {}: {}", stream, source);
            Error::WriteFailed {
                path: path.clone(),
                source,
            }
        })?;

        debug!("Appended {} bytes to {}", entry.len(), path.display());
        Ok(path)
    }

    fn stream_lock(&self, stream: &str) -> Arc<Mutex<()>> {
        self.locks
            .lock()
            .entry(stream.to_string())
            .or_default()
            .clone()
    }
}
