use crate::events::SearchField;
use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Search the upcoming events list the way the events page does
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// TOML config file (debounce delay, search field, labels)
    #[arg(short, long, global = true, env = "EVENT_SEARCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only print results, no diagnostics
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// When to use colors
    #[arg(long, value_enum, default_value_t = ColorMode::Auto, global = true)]
    pub color: ColorMode,

    /// Output format
    #[arg(short = 'F', long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,

    /// Also write the output to this file
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Apply a query to an events file and list the visible rows
    Filter {
        /// events.json file
        file: PathBuf,

        /// Query terms; prefix a term with ! to exclude it
        query: Vec<String>,

        /// Restore the query from a shared link
        #[arg(long)]
        link: Option<String>,

        /// Exclude rows containing these words (repeatable)
        #[arg(short = 'x', long)]
        exclude: Vec<String>,

        /// Day treated as today for the when column (YYYY-MM-DD)
        #[arg(long)]
        today: Option<NaiveDate>,

        /// Field the query is matched against
        #[arg(long, value_enum)]
        field: Option<SearchField>,
    },
    /// Build a shareable link for a query, or read the query back from one
    Link {
        /// Query terms
        query: Vec<String>,

        /// Page the link points to (defaults to link_base from the config)
        #[arg(long)]
        base: Option<String>,

        /// Decode this link instead of building one
        #[arg(long, conflicts_with_all = ["query", "base"])]
        decode: Option<String>,
    },
    /// Replay a timed keystroke script through the debounced filter
    Replay {
        /// events.json file
        file: PathBuf,

        /// Script with one "<offset_ms> <input>" step per line
        script: PathBuf,

        /// Day treated as today for the when column (YYYY-MM-DD)
        #[arg(long)]
        today: Option<NaiveDate>,

        /// Field the query is matched against
        #[arg(long, value_enum)]
        field: Option<SearchField>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

pub fn cli_parse() -> Cli {
    Cli::parse()
}
