//! Command implementations for dsync-cli

pub mod history;
pub mod list;
pub mod register;
pub mod show;
pub mod status;
pub mod sync;

pub use history::run_history;
pub use list::{run_list, run_stale};
pub use register::run_register;
pub use show::run_show;
pub use status::run_status;
pub use sync::{run_check, run_sync};

use colored::{ColoredString, Colorize};
use dsync_core::SyncStatus;
use serde::Serialize;

use crate::error::Result;

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) fn colored_status(status: SyncStatus) -> ColoredString {
    match status {
        SyncStatus::Pending => status.as_str().dimmed(),
        SyncStatus::Syncing => status.as_str().yellow(),
        SyncStatus::Ready => status.as_str().green(),
        SyncStatus::Error => status.as_str().red(),
    }
}

pub(crate) fn short_hash(hash: &str) -> &str {
    hash.get(..7).unwrap_or(hash)
}
