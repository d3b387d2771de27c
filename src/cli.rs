//! CLI command definitions using clap.
//!
//! Commands map onto the store's operations:
//! - board: refresh and show the ranked board
//! - suggest: server-ranked suggestions for a strategy and search term
//! - import/update/complete/delete/clear: mutations

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Taskdeck - a prioritization dashboard client
#[derive(Parser, Debug)]
#[command(name = "taskdeck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the service root URL from config
    #[arg(long, global = true)]
    pub api_root: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute; with none, shows the board and suggestions
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the ranked task board
    Board {
        /// Ranking strategy (smart_balance, fastest_wins, high_impact,
        /// deadline_driven); unknown names fall back to smart_balance
        #[arg(short, long)]
        strategy: Option<String>,

        /// Also fetch and show the completed column
        #[arg(short = 'C', long)]
        completed: bool,
    },

    /// Show server-ranked suggestions
    Suggest {
        /// Ranking strategy passed to the service
        #[arg(short, long)]
        strategy: Option<String>,

        /// Search term filter
        #[arg(short, long)]
        query: Option<String>,
    },

    /// Bulk-import tasks from a JSON file ("-" reads stdin)
    Import {
        /// Path to a JSON array of task specs
        file: PathBuf,
    },

    /// Patch fields of a task
    Update {
        /// Task id
        id: i64,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New description
        #[arg(long)]
        description: Option<String>,

        /// New due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<NaiveDate>,

        /// New estimated hours
        #[arg(long)]
        hours: Option<f64>,

        /// New importance
        #[arg(long)]
        importance: Option<f64>,
    },

    /// Mark a task completed
    Complete {
        /// Task id
        id: i64,
    },

    /// Delete a task
    Delete {
        /// Task id
        id: i64,
    },

    /// Delete every task
    Clear {
        /// Skip the confirmation check
        #[arg(short, long)]
        yes: bool,
    },
}
