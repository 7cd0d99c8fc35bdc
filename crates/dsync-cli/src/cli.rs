//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// dataset-sync - Keep tables in sync with folders of CSV files
#[derive(Parser, Debug)]
#[command(name = "dsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (TOML, JSON or YAML)
    #[arg(long, global = true, env = "DSYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory holding the dataset registry and stored tables
    #[arg(long, global = true, env = "DSYNC_STATE_DIR")]
    pub state_dir: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Register a folder as a dataset
    ///
    /// Starts tracking the folder's history and records the dataset as
    /// pending. Nothing is stored until the first sync.
    ///
    /// Examples:
    ///   dsync register ./data/sales --name Sales
    ///   dsync register ./exports --name "Q1 Costs" --table q1_costs
    Register {
        /// Folder containing .csv / .tsv files
        folder: PathBuf,

        /// Human-readable dataset name
        #[arg(long)]
        name: String,

        /// Target table name (derived from the name if omitted)
        #[arg(long)]
        table: Option<String>,

        /// Free-text description
        #[arg(long)]
        description: Option<String>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Sync a dataset if its folder changed
    Sync {
        /// Dataset id
        id: String,

        /// Sync even when no change is detected
        #[arg(long)]
        force: bool,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Report whether a dataset's folder changed since its last sync
    Check {
        /// Dataset id
        id: String,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Show a dataset's sync status
    Status {
        /// Dataset id
        id: String,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// List registered datasets
    List {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// List datasets stuck in syncing with no sync running
    Stale {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Show the commit history of a dataset's folder
    History {
        /// Dataset id
        id: String,

        /// Number of commits to show
        #[arg(short = 'n', long, default_value_t = 10)]
        max_count: usize,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Show rows of a dataset's synced table
    Show {
        /// Dataset id
        id: String,

        /// Page number, starting at 1
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Rows per page
        #[arg(long, default_value_t = 20)]
        page_size: usize,

        /// Column to sort by
        #[arg(long)]
        sort: Option<String>,

        /// Sort descending
        #[arg(long)]
        desc: bool,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_register() {
        let cli = Cli::parse_from([
            "dsync", "register", "./data", "--name", "Sales", "--table", "sales",
        ]);
        assert_eq!(
            cli.command,
            Some(Commands::Register {
                folder: PathBuf::from("./data"),
                name: "Sales".into(),
                table: Some("sales".into()),
                description: None,
                json: false,
            })
        );
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["dsync", "list", "--state-dir", "/tmp/s", "-v"]);
        assert!(cli.verbose);
        assert_eq!(cli.state_dir, Some(PathBuf::from("/tmp/s")));
    }

    #[test]
    fn history_count_defaults_to_ten() {
        let cli = Cli::parse_from(["dsync", "history", "abc"]);
        assert!(matches!(
            cli.command,
            Some(Commands::History { max_count: 10, .. })
        ));
    }

    #[test]
    fn register_requires_name() {
        assert!(Cli::try_parse_from(["dsync", "register", "./data"]).is_err());
    }
}
