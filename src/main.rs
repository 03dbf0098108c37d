#![deny(clippy::all, clippy::pedantic)]
#![deny(warnings)]
#![allow(clippy::module_name_repetitions)]

mod catalog;
mod cli;
mod config;
mod error;
mod features;
mod links;
mod models;
mod recommend;

use std::path::Path;
use std::process;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use cli::{Cli, Command};
use features::VibeIndex;
use models::{Recommendation, SELECTION_ADVISORY_LIMIT};

fn main() {
    let cli = Cli::parse();

    if !cli.quiet {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::from_default_env()
            )
            .with_writer(std::io::stderr)
            .init();
    }

    let result = run(cli);

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    let dataset = config::dataset_path(cli.dataset.as_deref());
    match cli.command {
        Command::Songs => cmd_songs(&dataset, cli.quiet, cli.json),
        Command::Recommend { songs, n, links } => {
            cmd_recommend(&dataset, &songs, n, links, cli.quiet, cli.json)
        }
    }
}

fn spinner(quiet: bool, message: &'static str) -> Result<ProgressBar> {
    if quiet {
        return Ok(ProgressBar::hidden());
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} {msg}")
            .context("progress spinner template")?,
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

/// Load, clean and scale the dataset into a read-only index.
fn build_index(dataset: &Path, quiet: bool) -> Result<VibeIndex> {
    let pb = spinner(quiet, "Loading songs...")?;
    let loaded = catalog::load(dataset);
    let index = loaded.and_then(features::process);
    pb.finish_and_clear();

    let index = index.context("could not prepare the song catalog")?;
    info!(
        songs = index.len(),
        features = %index.columns().join(","),
        "Song index ready"
    );
    Ok(index)
}

fn cmd_songs(dataset: &Path, quiet: bool, json: bool) -> Result<i32> {
    let index = build_index(dataset, quiet)?;
    for id in index.song_ids_sorted() {
        if json {
            println!("{}", serde_json::to_string(id)?);
        } else {
            println!("{id}");
        }
    }
    Ok(0)
}

fn cmd_recommend(
    dataset: &Path,
    songs: &[String],
    n: usize,
    with_links: bool,
    quiet: bool,
    json: bool,
) -> Result<i32> {
    if songs.is_empty() {
        if !quiet {
            eprintln!("Please select at least one song to get recommendations.");
        }
        return Ok(2);
    }
    if songs.len() > SELECTION_ADVISORY_LIMIT {
        warn!(
            selected = songs.len(),
            "For best results, choose 3-5 core songs to define your vibe"
        );
    }

    let index = build_index(dataset, quiet)?;

    for id in songs.iter().filter(|id| index.get(id).is_none()) {
        warn!(song_id = %id, "Unknown song, ignoring");
    }

    let pb = spinner(quiet, "Generating your custom vibe...")?;
    let results = index.recommend(songs, n);
    pb.finish_and_clear();

    if results.is_empty() {
        if !quiet {
            eprintln!("Could not generate recommendations. Please try other songs.");
        }
        return Ok(2);
    }

    output_results(&results, json)?;
    if with_links {
        output_links(&results, json);
    }
    Ok(0)
}

fn output_results(results: &[Recommendation], json: bool) -> Result<()> {
    for r in results {
        if json {
            let mut value = serde_json::to_value(r)?;
            if let serde_json::Value::Object(map) = &mut value {
                map.insert(
                    "image_url".to_string(),
                    links::placeholder_image_url(&r.song.title).into(),
                );
            }
            println!("{value}");
        } else {
            println!("{}", r.to_tsv());
        }
    }
    Ok(())
}

fn output_links(results: &[Recommendation], json: bool) {
    let youtube = links::youtube_music_url(results);
    let spotify = links::spotify_url(results);
    if json {
        let value = serde_json::json!({
            "youtube_music": youtube,
            "spotify": spotify,
        });
        println!("{value}");
    } else {
        println!();
        println!("YouTube Music: {youtube}");
        println!("Spotify:       {spotify}");
    }
}
