use crate::model::GroupId;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "valuerank")]
#[command(
    author,
    version,
    about = "Pick, rank and sync your top ten personal values"
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file (searches upward for .valuerank.toml by default)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Also write JSON logs to this file (rotated daily)
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Treat the remote store as unreachable; saves go to the offline queue
    #[arg(long, global = true)]
    pub offline: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new valuerank project in the current directory
    Init {
        /// Base URL of a running `valuerank serve` to save lists to
        #[arg(long)]
        remote: Option<String>,
    },

    /// Show every value in the catalog
    Catalog {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the current board
    #[command(visible_alias = "show")]
    Board {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Toggle a value in or out of your top values
    Pick {
        /// Value id (value-N) or name, case-insensitive
        value: String,
    },

    /// Move the value at one position to another (positions start at 1)
    #[command(visible_alias = "mv")]
    Move {
        /// Group to take from (personal, growth, life, selected)
        from_group: GroupId,
        from_position: usize,
        /// Group to drop into
        to_group: GroupId,
        to_position: usize,
    },

    /// Return every selected value to its group
    Clear,

    /// Save your top values as a named list
    Save {
        /// Name of the list
        name: String,

        #[arg(long, env = "VALUERANK_USER")]
        user: String,

        /// Overwrite this existing list instead of creating a new one
        #[arg(long)]
        list: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List your saved lists, newest first
    #[command(visible_alias = "ls")]
    Lists {
        #[arg(long, env = "VALUERANK_USER")]
        user: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Load a saved list onto the board
    Load {
        list_id: String,

        #[arg(long, env = "VALUERANK_USER")]
        user: String,

        /// Replace the current selection without asking
        #[arg(short, long)]
        force: bool,
    },

    /// Delete a saved list
    Delete {
        list_id: String,

        #[arg(long, env = "VALUERANK_USER")]
        user: String,

        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },

    /// Show saves waiting in the offline queue
    Pending {
        #[arg(long, env = "VALUERANK_USER")]
        user: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Drop one pending save without writing it
    Discard {
        entry_id: String,
    },

    /// Replay pending offline saves
    Sync {
        #[arg(long, env = "VALUERANK_USER")]
        user: String,
    },

    /// Serve saved lists over HTTP
    Serve {
        /// Port to listen on (defaults to server.port in the config)
        #[arg(short, long)]
        port: Option<u16>,
    },
}
