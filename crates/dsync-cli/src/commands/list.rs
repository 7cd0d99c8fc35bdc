//! List and stale command implementations

use colored::Colorize;
use dsync_core::Dataset;

use super::{colored_status, print_json};
use crate::context::Context;
use crate::error::Result;

/// Run the list command
pub fn run_list(ctx: &Context, json: bool) -> Result<()> {
    let datasets = ctx.service.list_datasets()?;

    if json {
        return print_json(&datasets);
    }

    println!("{}", "Datasets".bold());
    println!("{}: {}", "State".dimmed(), ctx.state_dir.display());
    println!();
    if datasets.is_empty() {
        println!(
            "  {} (use {} to add one)",
            "None".dimmed(),
            "dsync register".cyan()
        );
        return Ok(());
    }
    print_table(&datasets);
    Ok(())
}

/// Run the stale command
pub fn run_stale(ctx: &Context, json: bool) -> Result<()> {
    let stale = ctx.service.stale_syncing()?;

    if json {
        return print_json(&stale);
    }

    if stale.is_empty() {
        println!("{} No datasets stuck in syncing", "OK".green().bold());
        return Ok(());
    }
    println!(
        "{} {} dataset(s) recorded as syncing with no sync running:",
        "!".yellow().bold(),
        stale.len()
    );
    println!();
    print_table(&stale);
    Ok(())
}

fn print_table(datasets: &[Dataset]) {
    for dataset in datasets {
        println!(
            "  {} {} [{}] {} rows -> {}",
            dataset.id.to_string().dimmed(),
            dataset.name.cyan(),
            colored_status(dataset.status),
            dataset.row_count,
            dataset.table_name
        );
    }
}
