// touchline/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "touchline")]
#[command(about = "Football match-data ETL: fetch, clean, map and load", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Project directory (holds touchline.yaml)
    #[arg(long, global = true, default_value = ".", env = "TOUCHLINE_PROJECT_DIR")]
    pub project_dir: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 📅 Fetches the season's fixture list into the raw bucket
    FetchSchedule,

    /// ⚽ Fetches player stats for every played match
    FetchStats {
        /// Fetch again even when the object already exists
        #[arg(long)]
        overwrite: bool,
    },

    /// 🏟️ Snapshots clubs, squads and market values
    FetchClubs,

    /// 🧹 Cleans raw datasets into the cleaned bucket
    Clean {
        /// A single raw object key
        #[arg(long, conflicts_with = "prefix")]
        key: Option<String>,

        /// Every Parquet object under this prefix (ex: "match_stats/")
        #[arg(long)]
        prefix: Option<String>,
    },

    /// 📥 Appends cleaned datasets to the staging table
    Load {
        /// A single cleaned object key
        #[arg(long, conflicts_with = "prefix")]
        key: Option<String>,

        /// Every Parquet object under this prefix
        #[arg(long)]
        prefix: Option<String>,
    },

    /// 🔗 Matches market club names to stats team names
    MapTeams {
        /// Club snapshot key in the raw bucket (default: latest snapshot)
        #[arg(long)]
        clubs_key: Option<String>,
    },

    /// 👥 Stores the players of a cleaned dataset in the lookup store
    MapPlayers {
        /// Cleaned object key
        #[arg(long)]
        key: String,
    },

    /// 📨 Handles a storage-write event, as the bucket trigger would
    OnEvent {
        handler: EventHandler,

        /// Event JSON: {"bucket": "...", "name": "..."}
        #[arg(long)]
        payload: String,
    },

    /// 🔍 Prints a warehouse table or a stored dataset
    Inspect {
        /// Warehouse table (ex: "players_stats.staging_stats_table")
        #[arg(long, short, conflicts_with = "key", required_unless_present = "key")]
        table: Option<String>,

        /// Object key in the cleaned bucket
        #[arg(long)]
        key: Option<String>,

        /// Read --key from the raw bucket instead
        #[arg(long, requires = "key")]
        raw: bool,

        /// Number of rows to display
        #[arg(long, default_value = "5")]
        limit: usize,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum EventHandler {
    Clean,
    Load,
}
