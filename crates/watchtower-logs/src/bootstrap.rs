//! Log store bootstrap
//!
//! Makes sure the log directory and one file per declared stream exist.
//! Existing files are never opened for writing, so re-running is harmless.

use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};
use watchtower_core::{constants, Error, Result, ValidConfig};

/// What a bootstrap run changed on disk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootstrapReport {
    /// The log directory did not exist and was created
    pub created_dir: bool,
    /// Stream files created by this run
    pub created: Vec<PathBuf>,
    /// Stream files that were already present and left untouched
    pub existing: Vec<PathBuf>,
}

impl BootstrapReport {
    /// Whether the run left the store exactly as it found it
    pub fn is_noop(&self) -> bool {
        !self.created_dir && self.created.is_empty()
    }
}

/// Ensure the log directory and every declared stream file exist
///
/// Stops at the first failure; files created before it are kept.
pub fn ensure_store(config: &ValidConfig) -> Result<BootstrapReport> {
    let dir = &config.log_directory;
    let mut report = BootstrapReport::default();

    if !dir.is_dir() {
        fs::create_dir_all(dir).map_err(|source| {
            error!("Failed to create log directory {}: {}", dir.display(), source);
            Error::DirectoryCreateFailed {
                path: dir.clone(),
                source,
            }
        })?;
        info!("Created log directory: {}", dir.display());
        report.created_dir = true;
    }

    for stream in &config.streams {
        let path = constants::stream_path(dir, stream);

        if path.exists() {
            debug!("Stream file already exists: {}", path.display());
            report.existing.push(path);
            continue;
        }

        if create_empty(&path, dir)? {
            debug!("Created stream file: {}", path.display());
            report.created.push(path);
        } else {
            report.existing.push(path);
        }
    }

    info!(
        "Log store ready at {} ({} created, {} existing)",
        dir.display(),
        report.created.len(),
        report.existing.len()
    );
    Ok(report)
}

/// Create an empty file; `Ok(false)` if another writer created it first
fn create_empty(path: &Path, dir: &Path) -> Result<bool> {
    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
        Err(source) => {
            error!("Failed to create stream file {}: {}", path.display(), source);
            Err(Error::FileCreateFailed {
                path: path.to_path_buf(),
                dir: dir.to_path_buf(),
                source,
            })
        }
    }
}

/// On-disk state of a declared stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamStatus {
    pub name: String,
    pub path: PathBuf,
    pub exists: bool,
    pub size: u64,
}

/// Inspect every declared stream without touching the store
pub fn store_status(config: &ValidConfig) -> Vec<StreamStatus> {
    config
        .streams
        .iter()
        .map(|name| {
            let path = constants::stream_path(&config.log_directory, name);
            let metadata = fs::metadata(&path).ok();
            StreamStatus {
                name: name.clone(),
                exists: metadata.as_ref().map(|m| m.is_file()).unwrap_or(false),
                size: metadata.map(|m| m.len()).unwrap_or(0),
                path,
            }
        })
        .collect()
}
