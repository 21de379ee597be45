//! Tail command implementation

use anyhow::{bail, Result};
use watchtower::LogReader;
use watchtower_core::is_valid_stream_name;

use super::Context;
use crate::cli::TailArgs;
use crate::output::{is_json_mode, print_entries, print_info};

pub fn execute(ctx: &Context, args: TailArgs) -> Result<()> {
    if !is_valid_stream_name(&args.stream) {
        bail!("Invalid stream name: {}", args.stream);
    }

    let config = ctx.validate()?;
    let reader = LogReader::for_stream(&config.log_directory, &args.stream);

    if !reader.exists() {
        bail!("No log file for stream '{}' at {}", args.stream, reader.path().display());
    }

    let entries = reader.entries(args.lines)?;
    if entries.is_empty() && !is_json_mode() {
        print_info(&format!("{} is empty", reader.path().display()));
        return Ok(());
    }

    print_entries(&entries);
    Ok(())
}
