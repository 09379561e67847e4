//! Nearest facility finder.
//!
//! Loads the facility catalog, resolves the configured stations and
//! reference points, matches each one to its closest facility and writes
//! the result as a report, GeoJSON and a Leaflet map.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use vicino::catalog::download_client;
use vicino::config::Config;
use vicino::geocode::{GeocodeCache, QuerySource};
use vicino::map::{feature_collection, render_html, MapLayers};
use vicino::match_all;

mod report;
use report::report_lines;

#[derive(Parser, Debug)]
#[command(name = "locate")]
#[command(about = "Find the nearest facility to each station and reference point")]
struct Args {
    /// Run configuration (TOML)
    #[arg(short, long, default_value = "config/rome.toml")]
    config: PathBuf,

    /// Directory for map.html and matches.geojson
    #[arg(short, long, default_value = "out")]
    out_dir: PathBuf,

    /// Only use the static reference points
    #[arg(long)]
    skip_geocoding: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config::load_from_file(&args.config)
        .with_context(|| format!("Failed to load config {}", args.config.display()))?;
    let policy = config.geocoder.retry_policy();
    let client = download_client().context("Failed to create HTTP client")?;

    // Facility catalog
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner.set_message("Loading facility dataset...");

    let raw = config
        .catalog
        .source()
        .load("facilities", &client, &policy)
        .await
        .context("Failed to load facility dataset")?;
    let catalog = config
        .catalog
        .filter()
        .apply(&raw)
        .context("Failed to build the eligible catalog")?;

    // Transit stops
    let transit_points = match &config.transit {
        Some(transit) => {
            spinner.set_message("Loading transit dataset...");
            transit
                .load_query_points(&client, &policy)
                .await
                .context("Failed to load transit stops")?
        }
        None => Vec::new(),
    };
    spinner.finish_and_clear();

    if let Err(e) = catalog.require_non_empty() {
        warn!("{}, no query point can be matched", e);
    }

    // Query points
    let references = config
        .reference_points()
        .context("Invalid reference point in config")?;

    let mut stations = Vec::new();
    if !args.skip_geocoding && !config.stations.names.is_empty() {
        let geocoder = config.geocoder.build().context("Failed to create geocoder")?;
        let mut source = QuerySource::new(geocoder, policy, config.geocoder.min_interval())
            .with_query_suffix(&config.stations.query_suffix);
        let mut cache = GeocodeCache::new();

        info!("Geocoding {} stations", config.stations.names.len());
        let resolved = source
            .resolve_stations(&config.stations.names, &mut cache)
            .await;
        for failure in &resolved.failures {
            eprintln!("Warning: {}", failure);
        }
        stations = resolved.points;
    }

    if references.is_empty() && stations.is_empty() && transit_points.is_empty() {
        anyhow::bail!("No query points could be resolved");
    }

    // Matching
    for line in report_lines(&match_all(&references, catalog.facilities())) {
        println!("{}", line);
    }

    let mut mapped = stations;
    mapped.extend(transit_points);
    let matches = match_all(&mapped, catalog.facilities());
    for line in report_lines(&matches) {
        println!("{}", line);
    }

    // Map output
    let layers = MapLayers::from_matches(&matches, &config.map);
    for name in &layers.unmatched {
        eprintln!("Warning: no facility to show for {}", name);
    }

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("Failed to create {}", args.out_dir.display()))?;

    let geojson_path = args.out_dir.join("matches.geojson");
    fs::write(
        &geojson_path,
        serde_json::to_string_pretty(&feature_collection(&layers))?,
    )
    .with_context(|| format!("Failed to write {}", geojson_path.display()))?;

    let html_path = args.out_dir.join("map.html");
    fs::write(
        &html_path,
        render_html(&layers, "Nearest hospitals", &config.map),
    )
    .with_context(|| format!("Failed to write {}", html_path.display()))?;

    info!(
        "Wrote {} markers and {} connectors to {} and {}",
        layers.markers.len(),
        layers.connectors.len(),
        geojson_path.display(),
        html_path.display()
    );

    Ok(())
}
