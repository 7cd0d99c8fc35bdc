//! Sync and check command implementations

use colored::Colorize;
use dsync_core::{SyncStatus, TriggerOutcome};
use serde_json::json;

use super::{print_json, short_hash};
use crate::context::{Context, parse_id};
use crate::error::Result;

/// Run the sync command
pub fn run_sync(ctx: &Context, id: &str, force: bool, json: bool) -> Result<()> {
    let id = parse_id(id)?;
    let outcome = ctx.service.trigger_sync(&id, force)?;

    if json {
        return print_json(&outcome);
    }

    match outcome {
        TriggerOutcome::Synced {
            commit_hash,
            row_count,
        } => println!(
            "{} Synced {} rows at commit {}",
            "OK".green().bold(),
            row_count,
            short_hash(&commit_hash).cyan()
        ),
        TriggerOutcome::UpToDate {
            commit_hash,
            row_count,
        } => {
            let commit = commit_hash.as_deref().map(short_hash).unwrap_or("-");
            let dataset = ctx.service.get_dataset(&id)?;
            if dataset.status == SyncStatus::Error {
                // The folder matches the last commit but the stored table does not.
                println!(
                    "{} No folder changes since commit {}, but the last sync failed",
                    "!".yellow().bold(),
                    commit.cyan()
                );
                if let Some(message) = &dataset.error_message {
                    println!("{}: {}", "Error".dimmed(), message.red());
                }
                println!(
                    "Fix the folder, then run {} to retry.",
                    format!("dsync sync {id} --force").cyan()
                );
            } else {
                println!(
                    "{} Already up to date ({} rows at commit {})",
                    "OK".green().bold(),
                    row_count,
                    commit.cyan()
                );
            }
        }
    }
    Ok(())
}

/// Run the check command
pub fn run_check(ctx: &Context, id: &str, json: bool) -> Result<()> {
    let id = parse_id(id)?;
    let needs_sync = ctx.service.check(&id)?;

    if json {
        return print_json(&json!({ "id": id, "needs_sync": needs_sync }));
    }

    if needs_sync {
        println!("{} Folder has changes to sync", "!".yellow().bold());
        println!("Run {} to apply them.", format!("dsync sync {id}").cyan());
    } else {
        println!("{} Dataset is up to date", "OK".green().bold());
    }
    Ok(())
}
