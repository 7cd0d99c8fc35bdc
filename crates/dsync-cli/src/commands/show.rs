//! Show command implementation

use colored::Colorize;
use dsync_core::PageRequest;

use super::print_json;
use crate::context::{Context, parse_id};
use crate::error::Result;

/// Run the show command
pub fn run_show(
    ctx: &Context,
    id: &str,
    request: PageRequest,
    json: bool,
) -> Result<()> {
    let id = parse_id(id)?;
    let page = ctx.service.table_data(&id, &request)?;

    if json {
        return print_json(&page);
    }

    println!("{}", page.columns.join("\t").bold());
    for row in &page.rows {
        let cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        println!("{}", cells.join("\t"));
    }
    println!();
    println!(
        "{}",
        format!(
            "page {}/{} ({} rows)",
            page.page,
            page.total_pages.max(1),
            page.total_rows
        )
        .dimmed()
    );
    Ok(())
}
