//! Register command implementation

use std::path::Path;

use colored::Colorize;
use dsync_core::RegisterDataset;

use super::{print_json, short_hash};
use crate::context::Context;
use crate::error::Result;

/// Run the register command
pub fn run_register(
    ctx: &Context,
    folder: &Path,
    name: &str,
    table: Option<&str>,
    description: Option<&str>,
    json: bool,
) -> Result<()> {
    let registration = ctx.service.register_dataset(RegisterDataset {
        folder_path: folder.to_string_lossy().into_owned(),
        name: name.to_string(),
        table_name: table.map(str::to_string),
        description: description.map(str::to_string),
    })?;

    if json {
        return print_json(&registration);
    }

    let dataset = &registration.dataset;
    println!(
        "{} Registered dataset {}",
        "OK".green().bold(),
        dataset.name.cyan()
    );
    println!("  {}:     {}", "Id".dimmed(), dataset.id);
    println!("  {}:  {}", "Table".dimmed(), dataset.table_name);
    println!("  {}: {}", "Folder".dimmed(), dataset.folder_path);
    if let Some(folder) = dataset.folder() {
        let files = ctx
            .service
            .sync_service()
            .reader()
            .source_files(&folder)
            .map_err(dsync_core::Error::from)?;
        println!("  {}:  {}", "Files".dimmed(), files.join(", "));
    }
    println!(
        "  {}: {}",
        "Commit".dimmed(),
        short_hash(&registration.initial_commit)
    );
    println!();
    println!(
        "Run {} to load it.",
        format!("dsync sync {}", dataset.id).cyan()
    );
    Ok(())
}
