//! Timestamp rendering for log entries and notifications
//!
//! Two format dialects are accepted:
//! - PHP `date()` letters such as `Y-m-d H:i:s`, with `\` escaping a literal
//! - chrono strftime strings, used whenever the format contains a `%`

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Timelike};
use std::fmt::Write;

use crate::error::{Error, Result};

/// Validated time format
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeFormat {
    /// PHP `date()` style format letters
    Php(String),
    /// chrono strftime specifiers
    Strftime(String),
}

impl TimeFormat {
    /// Parse and validate a format string
    pub fn parse(format: &str) -> Result<Self> {
        if format.is_empty() {
            return Err(Error::InvalidTimeFormat(format.to_string()));
        }

        if format.contains('%') {
            if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
                return Err(Error::InvalidTimeFormat(format.to_string()));
            }
            // Some specifiers (e.g. `%#z`) parse but only work for parsing, not formatting
            if render_strftime(format, &sample_instant()).is_none() {
                return Err(Error::InvalidTimeFormat(format.to_string()));
            }
            return Ok(TimeFormat::Strftime(format.to_string()));
        }

        Ok(TimeFormat::Php(format.to_string()))
    }

    /// The format string as written in config
    pub fn as_str(&self) -> &str {
        match self {
            TimeFormat::Php(f) | TimeFormat::Strftime(f) => f,
        }
    }

    /// Render a timestamp
    pub fn format(&self, time: &DateTime<FixedOffset>) -> String {
        match self {
            TimeFormat::Strftime(f) => {
                render_strftime(f, time).unwrap_or_else(|| time.to_rfc3339())
            }
            TimeFormat::Php(f) => format_php(f, time),
        }
    }
}

impl Default for TimeFormat {
    fn default() -> Self {
        TimeFormat::Php(crate::constants::DEFAULT_TIME_FORMAT.to_string())
    }
}

impl std::fmt::Display for TimeFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn render_strftime(format: &str, time: &DateTime<FixedOffset>) -> Option<String> {
    let mut out = String::new();
    write!(out, "{}", time.format(format)).ok()?;
    Some(out)
}

fn sample_instant() -> DateTime<FixedOffset> {
    DateTime::<chrono::Utc>::default().fixed_offset()
}

fn format_php(format: &str, t: &DateTime<FixedOffset>) -> String {
    let mut out = String::with_capacity(format.len() * 2);
    let mut chars = format.chars();

    // Writing into a String cannot fail
    while let Some(c) = chars.next() {
        let _ = match c {
            '\\' => {
                if let Some(next) = chars.next() {
                    out.push(next);
                }
                Ok(())
            }
            'd' => write!(out, "{:02}", t.day()),
            'D' => write!(out, "{}", t.format("%a")),
            'j' => write!(out, "{}", t.day()),
            'l' => write!(out, "{}", t.format("%A")),
            'N' => write!(out, "{}", t.weekday().number_from_monday()),
            'S' => write!(out, "{}", ordinal_suffix(t.day())),
            'w' => write!(out, "{}", t.weekday().num_days_from_sunday()),
            'z' => write!(out, "{}", t.ordinal0()),
            'W' => write!(out, "{:02}", t.iso_week().week()),
            'F' => write!(out, "{}", t.format("%B")),
            'm' => write!(out, "{:02}", t.month()),
            'M' => write!(out, "{}", t.format("%b")),
            'n' => write!(out, "{}", t.month()),
            't' => write!(out, "{}", days_in_month(t.year(), t.month())),
            'L' => write!(out, "{}", u8::from(is_leap_year(t.year()))),
            'o' => write!(out, "{}", t.iso_week().year()),
            'Y' => write!(out, "{}", t.year()),
            'y' => write!(out, "{:02}", t.year().rem_euclid(100)),
            'a' => write!(out, "{}", if t.hour() < 12 { "am" } else { "pm" }),
            'A' => write!(out, "{}", if t.hour() < 12 { "AM" } else { "PM" }),
            'g' => write!(out, "{}", t.hour12().1),
            'G' => write!(out, "{}", t.hour()),
            'h' => write!(out, "{:02}", t.hour12().1),
            'H' => write!(out, "{:02}", t.hour()),
            'i' => write!(out, "{:02}", t.minute()),
            's' => write!(out, "{:02}", t.second()),
            'u' => write!(out, "{:06}", t.nanosecond() % 1_000_000_000 / 1_000),
            'v' => write!(out, "{:03}", t.nanosecond() % 1_000_000_000 / 1_000_000),
            'e' | 'T' | 'P' => write!(out, "{}", t.format("%:z")),
            'O' => write!(out, "{}", t.format("%z")),
            'p' => {
                if t.offset().local_minus_utc() == 0 {
                    write!(out, "Z")
                } else {
                    write!(out, "{}", t.format("%:z"))
                }
            }
            'Z' => write!(out, "{}", t.offset().local_minus_utc()),
            'U' => write!(out, "{}", t.timestamp()),
            'c' => write!(out, "{}", t.format("%Y-%m-%dT%H:%M:%S%:z")),
            'r' => write!(out, "{}", t.to_rfc2822()),
            other => {
                out.push(other);
                Ok(())
            }
        };
    }

    out
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

fn is_leap_year(year: i32) -> bool {
    NaiveDate::from_ymd_opt(year, 2, 29).is_some()
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(31)
}
