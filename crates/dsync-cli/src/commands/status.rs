//! Status command implementation

use colored::Colorize;

use super::{colored_status, print_json};
use crate::context::{Context, parse_id};
use crate::error::Result;

/// Run the status command
pub fn run_status(ctx: &Context, id: &str, json: bool) -> Result<()> {
    let id = parse_id(id)?;
    let report = ctx.service.sync_status(&id)?;

    if json {
        return print_json(&report);
    }

    println!("{}", "Dataset Status".bold());
    println!();
    println!("{}:    {}", "Name".dimmed(), report.name.cyan());
    println!("{}:      {}", "Id".dimmed(), report.id);
    println!("{}:  {}", "Status".dimmed(), colored_status(report.status));
    println!("{}:    {}", "Rows".dimmed(), report.row_count);
    println!(
        "{}:  {}",
        "Commit".dimmed(),
        report.last_commit_hash.as_deref().unwrap_or("-")
    );
    println!(
        "{}:  {}",
        "Synced".dimmed(),
        report
            .last_synced_at
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| "never".to_string())
    );
    if let Some(message) = &report.error_message {
        println!("{}:   {}", "Error".dimmed(), message.red());
    }
    if report.syncing {
        println!();
        println!("{}", "A sync is running for this dataset.".yellow());
    }
    Ok(())
}
