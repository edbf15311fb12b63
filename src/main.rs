//! leo-conjunction - LEO conjunction screening from a TLE catalog
//!
//! Usage: `leo-conjunction <catalog.tle> [threshold_km] [horizon_hours]`
//!
//! Prints the detection report as JSON on stdout. Logs go to stderr and are
//! filtered by `RUST_LOG` (default `info`).

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Utc;
use serde::Serialize;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use leo_conjunction::api::{detect_collisions_with, tracked_objects_from_catalog};
use leo_conjunction::collision::{
    CloseApproach, DetectionError, DetectionReport, DetectionSettings, NullSink, screen_close_approaches,
};
use leo_conjunction::tle::TleError;
use leo_conjunction::types::DEFAULT_THRESHOLD_KM;

const USAGE: &str = "usage: leo-conjunction <catalog.tle> [threshold_km] [horizon_hours]";

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error("{}", USAGE)]
    Usage,

    #[error("invalid {name}: {value:?}")]
    Argument { name: &'static str, value: String },

    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Tle(#[from] TleError),

    #[error(transparent)]
    Detection(#[from] DetectionError),

    #[error("failed to encode report: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Output {
    #[serde(flatten)]
    report: DetectionReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    close_approaches: Option<Vec<CloseApproach>>,
}

struct Args {
    catalog: PathBuf,
    threshold_km: f64,
    horizon_hours: Option<f64>,
}

fn parse_number(name: &'static str, value: String) -> Result<f64, CliError> {
    value.parse().map_err(|_| CliError::Argument { name, value })
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, CliError> {
    let catalog = args.next().map(PathBuf::from).ok_or(CliError::Usage)?;
    let threshold_km = match args.next() {
        Some(value) => parse_number("threshold_km", value)?,
        None => DEFAULT_THRESHOLD_KM,
    };
    let horizon_hours = args.next().map(|value| parse_number("horizon_hours", value)).transpose()?;
    if args.next().is_some() {
        return Err(CliError::Usage);
    }
    Ok(Args {
        catalog,
        threshold_km,
        horizon_hours,
    })
}

fn run(args: Args) -> Result<String, CliError> {
    let text = std::fs::read_to_string(&args.catalog).map_err(|source| CliError::Read {
        path: args.catalog.clone(),
        source,
    })?;
    let objects = tracked_objects_from_catalog(&text)?;
    tracing::info!(objects = objects.len(), catalog = ?args.catalog, "catalog loaded");

    let settings = DetectionSettings::with_threshold(args.threshold_km);
    let report = detect_collisions_with(&objects, &settings, &NullSink, Utc::now())?;
    let close_approaches = args
        .horizon_hours
        .map(|hours| screen_close_approaches(&objects, hours, &settings))
        .transpose()?;

    Ok(serde_json::to_string_pretty(&Output {
        report,
        close_approaches,
    })?)
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    match parse_args(std::env::args().skip(1)).and_then(run) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "leo-conjunction failed");
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
