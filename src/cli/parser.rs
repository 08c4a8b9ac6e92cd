use clap::{Parser, Subcommand};

/// Command-line interface definition for practicelog
#[derive(Parser)]
#[command(
    name = "practicelog",
    version = env!("CARGO_PKG_VERSION"),
    about = "Local-first practice tracker: log daily minutes per category, plan targets, review history",
    long_about = None
)]
pub struct Cli {
    /// Override the local store path (useful for tests or a custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Use a SQLite file as the remote store instead of the configured one
    #[arg(global = true, long = "remote")]
    pub remote: Option<String>,

    /// Act as this user instead of the configured one
    #[arg(global = true, long = "user")]
    pub user: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the local store and configuration, then sync the user
    Init,

    /// Print the configuration file
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,
    },

    /// Refresh the local store from the remote store
    Sync,

    /// Show today's minutes against the plan (creates today's entries)
    Today,

    /// Save minutes for a category (replaces the day's value)
    Add {
        /// Category: scales, review, new, technique
        category: String,

        /// Minutes practiced
        minutes: u32,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },

    /// Patch an entry by id
    Edit {
        /// Remote id of the entry (as shown by `log`)
        id: i64,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        minutes: Option<u32>,
    },

    /// Clear a day, or a single category of that day (minutes set to 0)
    Clear {
        /// Date (YYYY-MM-DD)
        date: String,

        #[arg(long)]
        category: Option<String>,
    },

    /// Auto-save timer updates read from stdin, one `<category> <minutes>` per line
    Track,

    /// Session log of the last days, with every category filled in
    Log,

    /// Totals, consistency and progress over a range
    History {
        /// week | month | quarter | year
        #[arg(long, short, default_value = "week")]
        range: String,
    },

    /// Show or edit the plan
    Plan {
        /// Daily goal in minutes (at least 10)
        #[arg(long)]
        goal: Option<u32>,

        #[arg(long)]
        scales: Option<u32>,
        #[arg(long = "scales-note")]
        scales_note: Option<String>,

        #[arg(long)]
        review: Option<u32>,
        #[arg(long = "review-note")]
        review_note: Option<String>,

        #[arg(long = "new")]
        new_rep: Option<u32>,
        #[arg(long = "new-note")]
        new_note: Option<String>,

        #[arg(long)]
        technique: Option<u32>,
        #[arg(long = "technique-note")]
        technique_note: Option<String>,
    },

    /// Send the weekly reminder to every push subscription
    Notify,

    /// Forget the local cache of the current user
    Signout,

    /// Print the internal operation log
    Audit,
}
