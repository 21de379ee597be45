//! Error types for WatchTower

use std::path::PathBuf;

/// WatchTower error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("No WatchTower configuration located under '{0}'. Please see documentation.")]
    MissingConfig(String),

    #[error("Invalid streams in configuration: {0}")]
    InvalidStreams(String),

    #[error("Invalid notify recipients in configuration: {0}")]
    InvalidRecipients(String),

    #[error("Invalid configuration field '{field}': {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("Invalid time format '{0}'")]
    InvalidTimeFormat(String),

    #[error(
        "Failed to create log directory at {}. Please create it manually and grant write permission: {source}",
        path.display()
    )]
    DirectoryCreateFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "Failed to create log file {}. Please grant write permission on the log directory ({}) and try again: {source}",
        path.display(),
        dir.display()
    )]
    FileCreateFailed {
        path: PathBuf,
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write log entry to {}: {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid stream name: '{0}'")]
    InvalidStreamName(String),

    #[error("WatchTower is not initialized")]
    NotInitialized,

    #[error(
        "WatchTower initialization already failed; fix the configuration and create a new instance"
    )]
    AlreadyFailed,

    #[error("Config file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

/// Result type alias for WatchTower
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse grouping used by hosts to decide how to surface a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Configuration is absent or malformed; fatal at startup
    Config,
    /// Log directory or stream files could not be created; fatal at startup
    Store,
    /// A single log append failed
    Write,
    /// Operation not allowed in the facade's current lifecycle state
    State,
    /// Anything raised while reading config sources
    Io,
}

impl Error {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::ConfigError(msg.into())
    }

    pub fn invalid_field<S: Into<String>>(field: &'static str, reason: S) -> Self {
        Error::InvalidField {
            field,
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingConfig(_)
            | Error::InvalidStreams(_)
            | Error::InvalidRecipients(_)
            | Error::InvalidField { .. }
            | Error::InvalidTimeFormat(_) => ErrorKind::Config,
            Error::DirectoryCreateFailed { .. } | Error::FileCreateFailed { .. } => {
                ErrorKind::Store
            }
            Error::WriteFailed { .. } | Error::InvalidStreamName(_) => ErrorKind::Write,
            Error::NotInitialized | Error::AlreadyFailed => ErrorKind::State,
            Error::ConfigNotFound(_)
            | Error::ConfigError(_)
            | Error::IoError(_)
            | Error::JsonError(_)
            | Error::TomlError(_)
            | Error::YamlError(_) => ErrorKind::Io,
        }
    }

    /// Whether this error must abort startup
    pub fn is_fatal(&self) -> bool {
        matches!(self.kind(), ErrorKind::Config | ErrorKind::Store | ErrorKind::Io)
    }
}
