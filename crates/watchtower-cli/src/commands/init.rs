//! Init command implementation

use anyhow::Result;
use serde::Serialize;

use super::Context;
use crate::output::{is_json_mode, print_info, print_success_json};

#[derive(Serialize)]
struct InitSummary {
    log_directory: String,
    created_dir: bool,
    created: Vec<String>,
    existing: Vec<String>,
}

pub fn execute(ctx: &Context) -> Result<()> {
    let mut tower = ctx.build_tower()?;
    let report = tower.initialize()?;

    let log_directory = tower
        .config()
        .map(|c| c.log_directory.display().to_string())
        .unwrap_or_default();
    let summary = InitSummary {
        log_directory,
        created_dir: report.created_dir,
        created: report.created.iter().map(|p| p.display().to_string()).collect(),
        existing: report.existing.iter().map(|p| p.display().to_string()).collect(),
    };

    let message = if report.is_noop() {
        format!("Log store in {} already up to date", summary.log_directory)
    } else {
        format!("Log store ready in {}", summary.log_directory)
    };
    print_success_json(&message, Some(&summary));

    if !is_json_mode() {
        for path in &summary.created {
            print_info(&format!("created  {}", path));
        }
        for path in &summary.existing {
            print_info(&format!("exists   {}", path));
        }
    }

    Ok(())
}
