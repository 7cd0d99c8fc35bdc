//! dataset-sync CLI
//!
//! Registers folders of tabular files as datasets and keeps their stored
//! tables in sync with the folders.

mod cli;
mod commands;
mod context;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;
use dsync_core::PageRequest;

use cli::{Cli, Commands};
use context::Context;
use error::Result;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> Result<()> {
    let Some(command) = cli.command else {
        // No command provided - show help hint
        println!("{} dataset-sync CLI", "dsync".green().bold());
        println!();
        println!("Run {} for available commands.", "dsync --help".cyan());
        return Ok(());
    };

    let ctx = Context::load(cli.state_dir.as_deref(), cli.config.as_deref())?;
    execute_command(&ctx, command)
}

fn execute_command(ctx: &Context, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Register {
            folder,
            name,
            table,
            description,
            json,
        } => commands::run_register(
            ctx,
            &folder,
            &name,
            table.as_deref(),
            description.as_deref(),
            json,
        ),
        Commands::Sync { id, force, json } => commands::run_sync(ctx, &id, force, json),
        Commands::Check { id, json } => commands::run_check(ctx, &id, json),
        Commands::Status { id, json } => commands::run_status(ctx, &id, json),
        Commands::List { json } => commands::run_list(ctx, json),
        Commands::Stale { json } => commands::run_stale(ctx, json),
        Commands::History {
            id,
            max_count,
            json,
        } => commands::run_history(ctx, &id, max_count, json),
        Commands::Show {
            id,
            page,
            page_size,
            sort,
            desc,
            json,
        } => {
            let mut request = PageRequest::new(page, page_size);
            if let Some(column) = sort {
                request = request.sorted_by(column, desc);
            }
            commands::run_show(ctx, &id, request, json)
        }
    }
}
