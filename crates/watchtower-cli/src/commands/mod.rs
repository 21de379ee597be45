//! Command implementations

pub mod check;
pub mod init;
pub mod log;
pub mod streams;
pub mod tail;

use anyhow::{bail, Context as _, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;
use watchtower::{ConfigFile, SendmailTransport, ValidConfig, WatchTower};
use watchtower_core::constants;

/// Options shared by every command
pub struct Context {
    config: Option<PathBuf>,
    host: String,
}

impl Context {
    pub fn new(config: Option<PathBuf>, host: String) -> Self {
        Self { config, host }
    }

    /// Load the config document
    ///
    /// An explicit `--config` wins, then a watchtower.* file in the current
    /// directory, then the file under the WatchTower home.
    pub fn load_config(&self) -> Result<ConfigFile> {
        if let Some(path) = &self.config {
            return ConfigFile::load(path)
                .with_context(|| format!("Failed to load {}", path.display()));
        }

        let cwd = std::env::current_dir()?;
        if let Some(path) = ConfigFile::find(&cwd) {
            return ConfigFile::load(&path)
                .with_context(|| format!("Failed to load {}", path.display()));
        }

        let fallback = constants::default_config_path();
        debug!("No config in {}, trying {}", cwd.display(), fallback.display());
        if !fallback.exists() {
            bail!(
                "No config file found in {} or at {}. Pass one with --config",
                cwd.display(),
                fallback.display()
            );
        }
        ConfigFile::load(&fallback)
            .with_context(|| format!("Failed to load {}", fallback.display()))
    }

    /// Validate only, without bootstrapping
    pub fn validate(&self) -> Result<ValidConfig> {
        let config = self.load_config()?;
        Ok(ValidConfig::from_provider(&config, constants::CONFIG_KEY)?)
    }

    /// Build a WatchTower wired to sendmail, not yet initialized
    pub fn build_tower(&self) -> Result<WatchTower> {
        let config = self.load_config()?;
        let sendmail = ValidConfig::from_provider(&config, constants::CONFIG_KEY)
            .ok()
            .and_then(|valid| valid.mail.sendmail);
        let transport = SendmailTransport::locate(sendmail);

        Ok(WatchTower::builder(Arc::new(config), Arc::new(transport))
            .server_host(self.host.clone())
            .build())
    }

    /// Load, validate and bootstrap a ready WatchTower
    pub fn open_tower(&self) -> Result<WatchTower> {
        let mut tower = self.build_tower()?;
        tower.initialize()?;
        Ok(tower)
    }
}
