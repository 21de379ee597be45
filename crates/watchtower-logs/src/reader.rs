//! Log reader for tail operations

use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use watchtower_core::{constants, Result};

/// Reads back a stream file
pub struct LogReader {
    path: PathBuf,
}

impl LogReader {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Reader for a stream inside a log directory
    pub fn for_stream(log_dir: &Path, stream: &str) -> Self {
        Self::new(constants::stream_path(log_dir, stream))
    }

    /// Read the last N non-blank lines from the log file
    pub fn tail(&self, n: usize) -> Result<Vec<String>> {
        if !self.path.exists() || n == 0 {
            return Ok(vec![]);
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);

        let mut lines: VecDeque<String> = VecDeque::with_capacity(n + 1);

        for line_result in reader.lines() {
            let line = line_result?;
            if line.is_empty() {
                continue;
            }
            lines.push_back(line);
            if lines.len() > n {
                lines.pop_front();
            }
        }

        Ok(lines.into_iter().collect())
    }

    /// Read the last N entries, split on the blank-line terminator
    ///
    /// A message that itself contains a blank line reads back as two entries.
    pub fn entries(&self, n: usize) -> Result<Vec<String>> {
        if !self.path.exists() || n == 0 {
            return Ok(vec![]);
        }

        let content = std::fs::read_to_string(&self.path)?;
        let all: Vec<&str> = content
            .split(constants::ENTRY_TERMINATOR)
            .filter(|e| !e.trim().is_empty())
            .collect();

        let skip = all.len().saturating_sub(n);
        Ok(all[skip..].iter().map(|e| e.to_string()).collect())
    }

    /// Check if the log file exists
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Get the file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get file size
    pub fn size(&self) -> Result<u64> {
        if !self.path.exists() {
            return Ok(0);
        }
        Ok(std::fs::metadata(&self.path)?.len())
    }
}
