//! WatchTower Core - Configuration, validation, time formats and error handling

pub mod config;
pub mod constants;
pub mod error;
pub mod time;
pub mod validate;

pub use config::{ConfigFile, ConfigFormat, ConfigProvider};
pub use constants::*;
pub use error::{Error, ErrorKind, Result};
pub use time::TimeFormat;
pub use validate::{is_valid_stream_name, validate, MailSettings, ValidConfig};
