//! Error types for the notification system

use std::path::PathBuf;

/// Notification error type
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Mail transport error: {0}")]
    TransportError(String),

    #[error("{} exited with {status}: {stderr}", program.display())]
    SendmailFailed {
        program: PathBuf,
        status: String,
        stderr: String,
    },

    #[error("Invalid mail header value: {0:?}")]
    InvalidHeader(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type alias for notification operations
pub type Result<T> = std::result::Result<T, NotifyError>;

impl NotifyError {
    pub fn transport<S: Into<String>>(msg: S) -> Self {
        NotifyError::TransportError(msg.into())
    }
}
