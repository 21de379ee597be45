//! Constants and default values for WatchTower

use std::path::{Path, PathBuf};

/// Default WatchTower home directory name
pub const WATCHTOWER_DIR: &str = ".watchtower";

/// Key the WatchTower section lives under in a host config
pub const CONFIG_KEY: &str = "watchtower";

/// Default config file name inside the home directory
pub const DEFAULT_CONFIG_FILE: &str = "watchtower.toml";

/// Config file names to search for in a working directory (in priority order)
pub const CONFIG_FILES: &[&str] = &[
    "watchtower.toml",
    "watchtower.yaml",
    "watchtower.yml",
    "watchtower.json",
];

/// Extension appended to every stream file
pub const LOG_EXTENSION: &str = "log";

/// Separator between the timestamp and the message in a log entry
pub const ENTRY_SEPARATOR: &str = " - ";

/// Terminator written after every log entry (leaves a blank line)
pub const ENTRY_TERMINATOR: &str = "\n\n";

/// Time format used when the config does not name one
pub const DEFAULT_TIME_FORMAT: &str = "Y-m-d H:i:s";

/// Local part of the notification sender address
pub const SENDER_LOCAL_PART: &str = "watchtower";

/// Display name of the notification sender
pub const SENDER_NAME: &str = "WatchTower Logger";

/// Prefix of notification subjects and headings
pub const NOTIFICATION_TITLE: &str = "WatchTower Notification";

/// Get the WatchTower home directory
pub fn watchtower_home() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(WATCHTOWER_DIR))
        .unwrap_or_else(|| PathBuf::from(WATCHTOWER_DIR))
}

/// Get the default config file path
pub fn default_config_path() -> PathBuf {
    watchtower_home().join(DEFAULT_CONFIG_FILE)
}

/// Get the file path for a stream inside a log directory
pub fn stream_path(log_dir: &Path, stream: &str) -> PathBuf {
    log_dir.join(format!("{}.{}", stream, LOG_EXTENSION))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watchtower_home() {
        let home = watchtower_home();
        assert!(home.to_string_lossy().contains(".watchtower"));
    }

    #[test]
    fn test_default_config_path() {
        let path = default_config_path();
        assert!(path.to_string_lossy().ends_with("watchtower.toml"));
    }

    #[test]
    fn test_stream_path() {
        let path = stream_path(Path::new("/var/log/app"), "errors");
        assert_eq!(path, PathBuf::from("/var/log/app/errors.log"));
    }
}
