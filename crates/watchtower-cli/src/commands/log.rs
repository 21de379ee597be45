//! Log command implementation

use anyhow::{bail, Result};
use serde::Serialize;
use watchtower::Delivery;

use super::Context;
use crate::cli::LogArgs;
use crate::output::{print_success_json, print_warning};

#[derive(Serialize)]
struct LogSummary {
    stream: String,
    path: String,
    timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    notification: Option<String>,
}

pub async fn execute(ctx: &Context, args: LogArgs) -> Result<()> {
    let message = args.message.join(" ");
    if message.is_empty() {
        bail!("Message must not be empty");
    }

    let tower = ctx.open_tower()?;
    let outcome = tower.log(&args.stream, &message, args.notify).await?;

    let notification = match &outcome.notification {
        None => None,
        Some(Ok(Delivery::Sent { to, cc })) => Some(if cc.is_empty() {
            format!("sent to {}", to)
        } else {
            format!("sent to {} (cc {})", to, cc.join(", "))
        }),
        Some(Ok(Delivery::NoRecipients)) => Some("no recipients configured".to_string()),
        Some(Err(e)) => {
            print_warning(&format!("Entry written but notification failed: {}", e));
            Some(format!("failed: {}", e))
        }
    };

    let summary = LogSummary {
        stream: args.stream.clone(),
        path: outcome.path.display().to_string(),
        timestamp: outcome.timestamp.to_rfc3339(),
        notification,
    };

    print_success_json(&format!("Logged to {}", summary.path), Some(&summary));

    Ok(())
}
