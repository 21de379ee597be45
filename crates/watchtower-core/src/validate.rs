//! Configuration validation
//!
//! Turns a loosely-typed config section into a [`ValidConfig`]. Every shape
//! check happens here, once; nothing downstream re-inspects raw values.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use std::path::PathBuf;
use tracing::debug;

use crate::config::ConfigProvider;
use crate::error::{Error, Result};
use crate::time::TimeFormat;

static STREAM_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").expect("valid stream regex"));

const LOG_DIRECTORY_KEYS: &[&str] = &["log_directory", "logDirectory", "logDir", "log_dir"];
const TIME_FORMAT_KEYS: &[&str] = &["time_format", "timeFormat"];
const STREAMS_KEYS: &[&str] = &["streams"];
const RECIPIENT_KEYS: &[&str] = &[
    "notify_recipients",
    "notifyRecipients",
    "who_to_notify",
    "whoToNotify",
];
const MAIL_KEYS: &[&str] = &["mail"];

/// Check that a stream name is a single, plain path component
pub fn is_valid_stream_name(name: &str) -> bool {
    STREAM_NAME.is_match(name) && name != "." && name != ".."
}

/// Mail delivery settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MailSettings {
    /// Explicit sendmail binary; located on PATH when unset
    pub sendmail: Option<PathBuf>,
}

/// Statically validated WatchTower configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidConfig {
    pub log_directory: PathBuf,
    pub time_format: TimeFormat,
    /// Declared streams, in config order, without duplicates
    pub streams: Vec<String>,
    /// First address is the primary recipient, the rest are copied
    pub notify_recipients: Vec<String>,
    pub mail: MailSettings,
}

impl ValidConfig {
    /// Look up `key` through a provider and validate it
    pub fn from_provider(provider: &dyn ConfigProvider, key: &str) -> Result<Self> {
        validate(provider.get_config(key).as_ref(), key)
    }

    /// Whether a stream was declared in config
    pub fn declares(&self, stream: &str) -> bool {
        self.streams.iter().any(|s| s == stream)
    }
}

/// Validate a raw config section
///
/// `key` only feeds the `MissingConfig` message.
pub fn validate(raw: Option<&Value>, key: &str) -> Result<ValidConfig> {
    let section = match raw {
        None | Some(Value::Null) => return Err(Error::MissingConfig(key.to_string())),
        Some(Value::Object(map)) if map.is_empty() => {
            return Err(Error::MissingConfig(key.to_string()))
        }
        Some(Value::Object(map)) => map,
        Some(other) => {
            return Err(Error::config(format!(
                "WatchTower configuration under '{}' must be a table, found {}",
                key,
                type_name(other)
            )))
        }
    };

    let streams = validate_streams(lookup(section, STREAMS_KEYS))?;
    let notify_recipients = validate_recipients(lookup(section, RECIPIENT_KEYS))?;
    let log_directory = validate_log_directory(lookup(section, LOG_DIRECTORY_KEYS))?;
    let time_format = match lookup(section, TIME_FORMAT_KEYS) {
        None | Some(Value::Null) => TimeFormat::default(),
        Some(Value::String(s)) => TimeFormat::parse(s)?,
        Some(other) => return Err(Error::InvalidTimeFormat(other.to_string())),
    };
    let mail = validate_mail(lookup(section, MAIL_KEYS))?;

    debug!(
        "Validated config: {} stream(s), {} recipient(s), log directory {}",
        streams.len(),
        notify_recipients.len(),
        log_directory.display()
    );

    Ok(ValidConfig {
        log_directory,
        time_format,
        streams,
        notify_recipients,
        mail,
    })
}

fn lookup<'a>(section: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| section.get(*k))
}

fn validate_streams(value: Option<&Value>) -> Result<Vec<String>> {
    let items = match value {
        None | Some(Value::Null) => {
            return Err(Error::InvalidStreams(
                "no streams specified in configuration".to_string(),
            ))
        }
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(Error::InvalidStreams(format!(
                "expected a list of names, found {}",
                type_name(other)
            )))
        }
    };

    if items.is_empty() {
        return Err(Error::InvalidStreams("stream list is empty".to_string()));
    }

    let mut streams: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        let name = item.as_str().ok_or_else(|| {
            Error::InvalidStreams(format!("stream names must be strings, found {}", item))
        })?;

        if !is_valid_stream_name(name) {
            return Err(Error::InvalidStreams(format!(
                "'{}' is not a valid stream name",
                name
            )));
        }

        if streams.iter().any(|s| s == name) {
            debug!("Ignoring duplicate stream '{}'", name);
            continue;
        }
        streams.push(name.to_string());
    }

    Ok(streams)
}

fn validate_recipients(value: Option<&Value>) -> Result<Vec<String>> {
    let items = match value {
        None | Some(Value::Null) => {
            return Err(Error::InvalidRecipients(
                "no one to notify specified in configuration".to_string(),
            ))
        }
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(Error::InvalidRecipients(format!(
                "expected a list of addresses, found {}",
                type_name(other)
            )))
        }
    };

    items
        .iter()
        .map(|item| match item.as_str().map(str::trim) {
            Some(addr) if !addr.is_empty() => Ok(addr.to_string()),
            _ => Err(Error::InvalidRecipients(format!(
                "recipients must be non-empty strings, found {}",
                item
            ))),
        })
        .collect()
}

fn validate_log_directory(value: Option<&Value>) -> Result<PathBuf> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(PathBuf::from(s)),
        Some(Value::String(_)) => Err(Error::invalid_field("log_directory", "path is empty")),
        None | Some(Value::Null) => Err(Error::invalid_field("log_directory", "missing")),
        Some(other) => Err(Error::invalid_field(
            "log_directory",
            format!("expected a path, found {}", type_name(other)),
        )),
    }
}

fn validate_mail(value: Option<&Value>) -> Result<MailSettings> {
    let section = match value {
        None | Some(Value::Null) => return Ok(MailSettings::default()),
        Some(Value::Object(map)) => map,
        Some(other) => {
            return Err(Error::invalid_field(
                "mail",
                format!("expected a table, found {}", type_name(other)),
            ))
        }
    };

    let sendmail = match section.get("sendmail") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if !s.is_empty() => Some(PathBuf::from(s)),
        Some(other) => {
            return Err(Error::invalid_field(
                "mail.sendmail",
                format!("expected a path, found {}", other),
            ))
        }
    };

    Ok(MailSettings { sendmail })
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a table",
    }
}
