//! Configuration sources for WatchTower
//!
//! A host hands WatchTower its settings through a [`ConfigProvider`]. The
//! bundled [`ConfigFile`] provider reads TOML, YAML or JSON documents and
//! exposes their top-level sections by key, untyped; shape checks happen once
//! in [`crate::validate`].

use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::constants::CONFIG_FILES;
use crate::error::{Error, Result};

/// Supplies loosely-typed configuration sections by key
pub trait ConfigProvider: Send + Sync {
    /// Look up a configuration section; `None` when absent
    fn get_config(&self, key: &str) -> Option<Value>;
}

/// A JSON object acts as an in-memory provider keyed by its top-level fields
impl ConfigProvider for Value {
    fn get_config(&self, key: &str) -> Option<Value> {
        self.get(key).cloned()
    }
}

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
    Json,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(ConfigFormat::Toml),
            "yaml" | "yml" => Some(ConfigFormat::Yaml),
            "json" => Some(ConfigFormat::Json),
            _ => None,
        }
    }

    /// Detect format from file path
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

/// A parsed configuration document
#[derive(Debug, Clone)]
pub struct ConfigFile {
    root: Value,
    path: Option<PathBuf>,
}

impl ConfigFile {
    /// Load config from file, automatically detecting format from extension
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }

        let format = ConfigFormat::from_path(path).ok_or_else(|| {
            Error::ConfigError(format!(
                "Unsupported config file extension: {}. Expected .toml, .yaml, .yml, or .json",
                path.display()
            ))
        })?;

        let content = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&content, format)?;
        config.path = Some(path.to_path_buf());

        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse config content with specified format
    pub fn parse(content: &str, format: ConfigFormat) -> Result<Self> {
        let root: Value = match format {
            ConfigFormat::Toml => toml::from_str(content)?,
            ConfigFormat::Yaml => serde_yaml::from_str(content)?,
            ConfigFormat::Json => serde_json::from_str(content)?,
        };

        Ok(Self { root, path: None })
    }

    /// First recognised config file present in a directory
    pub fn find(dir: &Path) -> Option<PathBuf> {
        CONFIG_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
    }

    /// Find and load a config file from a directory
    pub fn find_and_load(dir: &Path) -> Result<Self> {
        if let Some(path) = Self::find(dir) {
            return Self::load(&path);
        }
        Err(Error::ConfigError(format!(
            "No config file found in {}. Expected one of: {:?}",
            dir.display(),
            CONFIG_FILES
        )))
    }

    /// Path the document was loaded from, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl ConfigProvider for ConfigFile {
    fn get_config(&self, key: &str) -> Option<Value> {
        self.root.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_config_format_detection() {
        assert_eq!(ConfigFormat::from_extension("toml"), Some(ConfigFormat::Toml));
        assert_eq!(ConfigFormat::from_extension("YAML"), Some(ConfigFormat::Yaml));
        assert_eq!(ConfigFormat::from_extension("yml"), Some(ConfigFormat::Yaml));
        assert_eq!(ConfigFormat::from_extension("json"), Some(ConfigFormat::Json));
        assert_eq!(ConfigFormat::from_extension("ini"), None);
    }

    #[test]
    fn test_load_toml_section() {
        let content = r#"
[watchtower]
log_directory = "/var/log/app"
streams = ["errors", "alerts"]
notify_recipients = ["ops@example.com"]
"#;
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        file.write_all(content.as_bytes()).unwrap();

        let config = ConfigFile::load(file.path()).unwrap();
        let section = config.get_config("watchtower").unwrap();
        assert_eq!(section["log_directory"], "/var/log/app");
        assert_eq!(section["streams"][1], "alerts");
        assert!(config.get_config("other").is_none());
        assert_eq!(config.path(), Some(file.path()));
    }

    #[test]
    fn test_load_yaml_section() {
        let content = r#"
watchtower:
  logDir: logs
  streams:
    - errors
  whoToNotify: []
"#;
        let mut file = NamedTempFile::with_suffix(".yml").unwrap();
        file.write_all(content.as_bytes()).unwrap();

        let config = ConfigFile::load(file.path()).unwrap();
        let section = config.get_config("watchtower").unwrap();
        assert_eq!(section["logDir"], "logs");
        assert!(section["whoToNotify"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_load_json_section() {
        let content = r#"{"watchtower": {"streams": ["a"], "timeFormat": "H:i"}}"#;
        let mut file = NamedTempFile::with_suffix(".json").unwrap();
        file.write_all(content.as_bytes()).unwrap();

        let config = ConfigFile::load(file.path()).unwrap();
        let section = config.get_config("watchtower").unwrap();
        assert_eq!(section["timeFormat"], "H:i");
    }

    #[test]
    fn test_config_not_found() {
        let result = ConfigFile::load(Path::new("/nonexistent/watchtower.toml"));
        assert!(matches!(result, Err(Error::ConfigNotFound(_))));
    }

    #[test]
    fn test_unsupported_extension() {
        let file = NamedTempFile::with_suffix(".ini").unwrap();
        let result = ConfigFile::load(file.path());
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_find_and_load() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("watchtower.yaml"),
            "watchtower:\n  streams: [x]\n",
        )
        .unwrap();

        let config = ConfigFile::find_and_load(dir.path()).unwrap();
        assert!(config.get_config("watchtower").is_some());

        let empty = TempDir::new().unwrap();
        assert!(ConfigFile::find_and_load(empty.path()).is_err());
    }

    #[test]
    fn test_find_reports_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("watchtower.toml");
        std::fs::write(&path, "[watchtower\nstreams = ").unwrap();

        assert_eq!(ConfigFile::find(dir.path()), Some(path));
        assert!(matches!(
            ConfigFile::find_and_load(dir.path()),
            Err(Error::TomlError(_))
        ));
        assert_eq!(ConfigFile::find(TempDir::new().unwrap().path()), None);
    }

    #[test]
    fn test_value_provider() {
        let value = serde_json::json!({ "watchtower": { "streams": ["x"] } });
        assert!(value.get_config("watchtower").is_some());
        assert!(value.get_config("missing").is_none());
    }
}
