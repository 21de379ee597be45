//! Terminal output formatting

use colored::Colorize;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};
use watchtower::StreamStatus;

/// Global flag for JSON output mode
static JSON_MODE: AtomicBool = AtomicBool::new(false);

/// Enable or disable JSON output mode
pub fn set_json_mode(enabled: bool) {
    JSON_MODE.store(enabled, Ordering::SeqCst);
}

/// Check if JSON output mode is enabled
pub fn is_json_mode() -> bool {
    JSON_MODE.load(Ordering::SeqCst)
}

#[derive(Tabled)]
pub struct StreamRow {
    #[tabled(rename = "stream")]
    pub name: String,
    #[tabled(rename = "file")]
    pub path: String,
    #[tabled(rename = "status")]
    pub status: String,
    #[tabled(rename = "size")]
    pub size: String,
}

impl From<&StreamStatus> for StreamRow {
    fn from(status: &StreamStatus) -> Self {
        StreamRow {
            name: status.name.clone(),
            path: status.path.display().to_string(),
            status: if status.exists {
                "ok".green().to_string()
            } else {
                "missing".red().to_string()
            },
            size: format_bytes(status.size),
        }
    }
}

/// JSON-friendly stream representation
#[derive(Serialize)]
pub struct StreamJson {
    pub name: String,
    pub path: String,
    pub exists: bool,
    pub size_bytes: u64,
}

impl From<&StreamStatus> for StreamJson {
    fn from(status: &StreamStatus) -> Self {
        StreamJson {
            name: status.name.clone(),
            path: status.path.display().to_string(),
            exists: status.exists,
            size_bytes: status.size,
        }
    }
}

pub fn print_stream_table(streams: &[StreamStatus]) {
    if is_json_mode() {
        let json: Vec<StreamJson> = streams.iter().map(StreamJson::from).collect();
        print_json(&json);
        return;
    }

    if streams.is_empty() {
        println!("No streams declared");
        return;
    }

    let rows: Vec<StreamRow> = streams.iter().map(StreamRow::from).collect();

    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::single(3)).with(Alignment::right()))
        .to_string();

    println!("{}", table);
}

pub fn format_bytes(bytes: u64) -> String {
    if bytes >= 1_073_741_824 {
        format!("{:.1}G", bytes as f64 / 1_073_741_824.0)
    } else if bytes >= 1_048_576 {
        format!("{:.1}M", bytes as f64 / 1_048_576.0)
    } else if bytes >= 1024 {
        format!("{:.0}K", bytes as f64 / 1024.0)
    } else if bytes > 0 {
        format!("{}B", bytes)
    } else {
        "0B".to_string()
    }
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

pub fn print_warning(message: &str) {
    eprintln!("{} {}", "!".yellow(), message);
}

pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

/// Print log entries in JSON format if enabled
pub fn print_entries(entries: &[String]) {
    if is_json_mode() {
        print_json(&entries);
        return;
    }

    for entry in entries {
        println!("{}\n", entry);
    }
}

/// JSON wrapper for command results
#[derive(Serialize)]
pub struct ResponseJson<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Print a success message, as a JSON envelope when enabled
pub fn print_success_json<T: Serialize>(message: &str, data: Option<T>) {
    if is_json_mode() {
        print_json(&ResponseJson {
            success: true,
            message: Some(message.to_string()),
            data,
        });
    } else {
        print_success(message);
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing to JSON: {}", e),
    }
}
