//! WatchTower - Append messages to per-stream log files and optionally
//! email an alert about them
//!
//! ```no_run
//! use std::sync::Arc;
//! use watchtower::{ConfigFile, SendmailTransport, WatchTower};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConfigFile::load(std::path::Path::new("watchtower.toml"))?;
//! let transport = SendmailTransport::locate(None);
//! let tower = WatchTower::open(Arc::new(config), Arc::new(transport), "example.com")?;
//!
//! tower.log("errors", "disk full", true).await?;
//! # Ok(())
//! # }
//! ```

mod clock;
mod tower;

pub use clock::{Clock, FixedClock, SystemClock};
pub use tower::{LogOutcome, State, WatchTower, WatchTowerBuilder};

pub use watchtower_core::{
    ConfigFile, ConfigProvider, Error, ErrorKind, Result, TimeFormat, ValidConfig,
};
pub use watchtower_logs::{store_status, BootstrapReport, LogReader, StreamStatus};
pub use watchtower_notify::{
    Delivery, Email, MailTransport, NotificationEvent, NotifyError, SendmailTransport,
};
