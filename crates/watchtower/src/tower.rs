//! The WatchTower facade
//!
//! Lifecycle: `Uninitialized -> Validating -> Bootstrapping -> Ready`, with
//! `Failed` reachable from either middle state. Only `Ready` accepts `log()`.

use chrono::{DateTime, FixedOffset};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use watchtower_core::{constants, ConfigProvider, Error, Result, ValidConfig};
use watchtower_logs::{ensure_store, store_status, BootstrapReport, LogWriter, StreamStatus};
use watchtower_notify::{Delivery, MailTransport, NotificationEvent, Notifier, NotifyError};

use crate::clock::{Clock, SystemClock};

/// Lifecycle state of a [`WatchTower`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Uninitialized,
    Validating,
    Bootstrapping,
    Ready,
    Failed,
}

impl State {
    pub fn as_str(&self) -> &'static str {
        match self {
            State::Uninitialized => "uninitialized",
            State::Validating => "validating",
            State::Bootstrapping => "bootstrapping",
            State::Ready => "ready",
            State::Failed => "failed",
        }
    }
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a successful `log()` call
#[derive(Debug)]
pub struct LogOutcome {
    /// File the entry was appended to
    pub path: PathBuf,
    /// Instant stamped on both the entry and any notification
    pub timestamp: DateTime<FixedOffset>,
    /// Present only when a notification was requested
    pub notification: Option<std::result::Result<Delivery, NotifyError>>,
}

impl LogOutcome {
    pub fn notification_failed(&self) -> bool {
        matches!(self.notification, Some(Err(_)))
    }
}

/// Validated state held once the store is bootstrapped
struct Active {
    config: ValidConfig,
    writer: LogWriter,
}

/// Builder for [`WatchTower`]
pub struct WatchTowerBuilder {
    provider: Arc<dyn ConfigProvider>,
    transport: Arc<dyn MailTransport>,
    clock: Arc<dyn Clock>,
    config_key: String,
    server_host: String,
}

impl WatchTowerBuilder {
    /// Key the configuration section is looked up under (default `watchtower`)
    pub fn config_key(mut self, key: impl Into<String>) -> Self {
        self.config_key = key.into();
        self
    }

    /// Host named in notification sender and subject
    pub fn server_host(mut self, host: impl Into<String>) -> Self {
        self.server_host = host.into();
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn build(self) -> WatchTower {
        WatchTower {
            provider: self.provider,
            notifier: Notifier::new(self.transport),
            clock: self.clock,
            config_key: self.config_key,
            server_host: self.server_host,
            state: State::Uninitialized,
            active: None,
        }
    }
}

/// Per-stream file logger with optional email alerts
pub struct WatchTower {
    provider: Arc<dyn ConfigProvider>,
    notifier: Notifier,
    clock: Arc<dyn Clock>,
    config_key: String,
    server_host: String,
    state: State,
    active: Option<Active>,
}

impl WatchTower {
    /// Start building a WatchTower from its collaborators
    pub fn builder(
        provider: Arc<dyn ConfigProvider>,
        transport: Arc<dyn MailTransport>,
    ) -> WatchTowerBuilder {
        WatchTowerBuilder {
            provider,
            transport,
            clock: Arc::new(SystemClock),
            config_key: constants::CONFIG_KEY.to_string(),
            server_host: "localhost".to_string(),
        }
    }

    /// Build and initialize in one step
    pub fn open(
        provider: Arc<dyn ConfigProvider>,
        transport: Arc<dyn MailTransport>,
        server_host: impl Into<String>,
    ) -> Result<Self> {
        let mut tower = Self::builder(provider, transport)
            .server_host(server_host)
            .build();
        tower.initialize()?;
        Ok(tower)
    }

    /// Validate configuration and bootstrap the log store
    ///
    /// Calling this again on a ready instance re-reads the config and re-runs
    /// the (idempotent) bootstrap. A failed instance stays failed.
    pub fn initialize(&mut self) -> Result<BootstrapReport> {
        if self.state == State::Failed {
            return Err(Error::AlreadyFailed);
        }

        self.state = State::Validating;
        let config = match ValidConfig::from_provider(self.provider.as_ref(), &self.config_key) {
            Ok(config) => config,
            Err(e) => return Err(self.fail(e)),
        };

        self.state = State::Bootstrapping;
        let report = match ensure_store(&config) {
            Ok(report) => report,
            Err(e) => return Err(self.fail(e)),
        };

        info!(
            "WatchTower ready: {} stream(s) in {}",
            config.streams.len(),
            config.log_directory.display()
        );
        self.active = Some(Active {
            writer: LogWriter::from_config(&config),
            config,
        });
        self.state = State::Ready;
        Ok(report)
    }

    fn fail(&mut self, err: Error) -> Error {
        error!("WatchTower failed while {}: {}", self.state, err);
        self.state = State::Failed;
        self.active = None;
        err
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == State::Ready
    }

    /// The validated configuration, once ready
    pub fn config(&self) -> Option<&ValidConfig> {
        self.active.as_ref().map(|a| &a.config)
    }

    pub fn server_host(&self) -> &str {
        &self.server_host
    }

    /// On-disk state of every declared stream
    pub fn streams(&self) -> Result<Vec<StreamStatus>> {
        let active = self.active()?;
        Ok(store_status(&active.config))
    }

    /// Append a message to a stream, optionally emailing the recipients
    ///
    /// A failed write is returned as an error. A failed notification is not:
    /// the entry is already on disk, so the failure is reported in
    /// [`LogOutcome::notification`] instead.
    pub async fn log(&self, stream: &str, message: &str, notify: bool) -> Result<LogOutcome> {
        let active = self.active()?;
        let timestamp = self.clock.now();

        if !active.config.declares(stream) {
            debug!("Writing to undeclared stream '{}'", stream);
        }
        let path = active.writer.append(stream, message, &timestamp)?;

        let notification = if notify {
            let event = NotificationEvent::new(
                active.config.time_format.format(&timestamp),
                message,
                self.server_host.as_str(),
            );
            let result = self
                .notifier
                .notify(&event, &active.config.notify_recipients)
                .await;
            if let Err(e) = &result {
                warn!("Notification for stream '{}' failed: {}", stream, e);
            }
            Some(result)
        } else {
            None
        };

        Ok(LogOutcome {
            path,
            timestamp,
            notification,
        })
    }

    fn active(&self) -> Result<&Active> {
        match (&self.state, &self.active) {
            (State::Ready, Some(active)) => Ok(active),
            _ => Err(Error::NotInitialized),
        }
    }
}
