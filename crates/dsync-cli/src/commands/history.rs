//! History command implementation

use colored::Colorize;
use serde_json::json;

use super::print_json;
use crate::context::{Context, parse_id};
use crate::error::{CliError, Result};

/// Run the history command
pub fn run_history(ctx: &Context, id: &str, max_count: usize, json: bool) -> Result<()> {
    let id = parse_id(id)?;
    let dataset = ctx.service.get_dataset(&id)?;
    let folder = dataset
        .folder()
        .ok_or_else(|| CliError::user(format!("Dataset {id} has no folder path configured")))?;

    let commits = ctx.config.history().recent_commits(&folder, max_count)?;

    if json {
        let entries: Vec<_> = commits
            .iter()
            .map(|c| {
                json!({
                    "hash": c.hash,
                    "short_hash": c.short_hash,
                    "message": c.message,
                    "author": c.author,
                    "timestamp": c.timestamp.to_rfc3339(),
                    "synced": dataset.last_commit() == Some(c.hash.as_str()),
                })
            })
            .collect();
        return print_json(&entries);
    }

    println!("{} {}", "History of".bold(), dataset.name.cyan());
    println!();
    for commit in &commits {
        let marker = if dataset.last_commit() == Some(commit.hash.as_str()) {
            " (synced)".green().to_string()
        } else {
            String::new()
        };
        println!(
            "  {} {} {}{}",
            commit.short_hash.yellow(),
            commit.timestamp.format("%Y-%m-%d %H:%M:%S"),
            commit.message,
            marker
        );
    }
    Ok(())
}
