//! Check command implementation

use anyhow::Result;
use serde::Serialize;

use super::Context;
use crate::output::{is_json_mode, print_info, print_success_json};

#[derive(Serialize)]
struct CheckSummary {
    log_directory: String,
    time_format: String,
    streams: Vec<String>,
    notify_recipients: usize,
}

pub fn execute(ctx: &Context) -> Result<()> {
    let config = ctx.validate()?;

    let summary = CheckSummary {
        log_directory: config.log_directory.display().to_string(),
        time_format: config.time_format.as_str().to_string(),
        streams: config.streams.clone(),
        notify_recipients: config.notify_recipients.len(),
    };

    print_success_json("Configuration is valid", Some(&summary));
    if !is_json_mode() {
        print_info(&format!("Log directory: {}", summary.log_directory));
        print_info(&format!("Time format:   {}", summary.time_format));
        print_info(&format!("Streams:       {}", summary.streams.join(", ")));
        print_info(&format!("Recipients:    {}", summary.notify_recipients));
    }

    Ok(())
}
