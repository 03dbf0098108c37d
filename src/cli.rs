use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::models::DEFAULT_RECOMMENDATIONS;

#[derive(Parser)]
#[command(name = "vibe", about = "Find songs that match the vibe of your favourites")]
pub struct Cli {
    /// Suppress stderr output (progress spinner, log messages).
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output results as JSON lines (NDJSON).
    #[arg(long, global = true)]
    pub json: bool,

    /// Path to the song dataset (CSV).
    #[arg(short, long, global = true)]
    pub dataset: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List every song id in the catalog, sorted.
    Songs,

    /// Recommend songs matching the vibe of the selected ones.
    Recommend {
        /// Selected song ids, as printed by `vibe songs` ("Title - Artist").
        songs: Vec<String>,

        /// Number of results.
        #[arg(short, default_value_t = DEFAULT_RECOMMENDATIONS)]
        n: usize,

        /// Also print YouTube Music and Spotify search links for the playlist.
        #[arg(long)]
        links: bool,
    },
}
