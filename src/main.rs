use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{ArgAction, Parser, ValueHint};
use tracing_subscriber::EnvFilter;

use gpx_heatmap::config::Config;
use gpx_heatmap::pipeline::{self, export, parse, select::TrackFilter, RunOptions};
use gpx_heatmap::types::map::{OutlierParams, RenderOptions};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Plot GPX tracks colored by heart rate on an interactive HTML map"
)]
struct Cli {
    /// Directory containing .gpx files
    #[arg(value_hint = ValueHint::DirPath)]
    directory: PathBuf,

    /// Only include tracks of these activity types (e.g. running cycling)
    #[arg(long, num_args = 0..)]
    activity: Vec<String>,

    /// Only include tracks recorded at or after this ISO-8601 date/time
    #[arg(long, value_parser = parse_since)]
    since: Option<DateTime<Utc>>,

    /// Drop segments far away from the dominant geographic cluster
    #[arg(long = "filter-outliers", alias = "filter_outliers", action = ArgAction::SetTrue)]
    filter_outliers: bool,

    /// Output HTML path (defaults to GPX_HEATMAP_OUTPUT or map-all.html)
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,

    /// Write the map without opening a browser
    #[arg(long, action = ArgAction::SetTrue)]
    no_open: bool,

    /// Verbose logging
    #[arg(long, action = ArgAction::SetTrue)]
    verbose: bool,
}

fn parse_since(value: &str) -> Result<DateTime<Utc>, String> {
    parse::parse_timestamp(value).map_err(|e| e.to_string())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_level = if cli.verbose {
        "gpx_heatmap=debug"
    } else {
        "gpx_heatmap=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let config = Config::from_env();
    let output = cli.output.clone().unwrap_or_else(|| config.output.clone());

    let options = RunOptions {
        filter: TrackFilter {
            since: cli.since,
            activities: cli.activity.clone(),
        },
        outliers: cli
            .filter_outliers
            .then(|| OutlierParams::from_config(&config)),
        render: RenderOptions::from_config(&config),
    };

    let written = pipeline::run(&cli.directory, &output, &options)
        .with_context(|| format!("failed to build a map from {}", cli.directory.display()))?;

    if cli.no_open {
        tracing::info!("Map saved to {}", written.display());
    } else {
        export::open_in_browser(&written);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_outliers_accepts_underscore_alias() {
        let cli = Cli::try_parse_from(["gpx-heatmap", "tracks", "--filter_outliers"]).expect("cli");
        assert!(cli.filter_outliers);
        let cli = Cli::try_parse_from(["gpx-heatmap", "tracks", "--filter-outliers"]).expect("cli");
        assert!(cli.filter_outliers);
        let cli = Cli::try_parse_from(["gpx-heatmap", "tracks"]).expect("cli");
        assert!(!cli.filter_outliers);
    }

    #[test]
    fn activity_takes_zero_or_more_values() {
        let cli = Cli::try_parse_from(["gpx-heatmap", "tracks", "--activity"]).expect("cli");
        assert!(cli.activity.is_empty());

        let cli = Cli::try_parse_from(["gpx-heatmap", "tracks", "--activity", "running", "cycling"])
            .expect("cli");
        assert_eq!(cli.activity, vec!["running", "cycling"]);
        assert_eq!(cli.directory, PathBuf::from("tracks"));
    }

    #[test]
    fn since_uses_timestamp_forms() {
        let cli = Cli::try_parse_from(["gpx-heatmap", "tracks", "--since", "2020-06-01"]).expect("cli");
        assert_eq!(
            cli.since.map(|since| since.to_rfc3339()),
            Some("2020-06-01T00:00:00+00:00".to_string())
        );
        assert!(Cli::try_parse_from(["gpx-heatmap", "tracks", "--since", "soon"]).is_err());
    }
}
