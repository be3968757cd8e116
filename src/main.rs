//! conjscan CLI - run one conjunction scan over a JSON catalog

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use serde::Serialize;

use conjscan::catalog::{build_states, load_catalog};
use conjscan::engine::{run_scan, ConjunctionEvent, KeplerPropagator, PairDiagnostic, ScanConfig};

#[derive(Parser, Debug)]
#[command(name = "conjscan", about = "Orbital conjunction detection engine")]
struct ScanArgs {
    /// Input catalog JSON file
    #[arg(long, default_value = "data/catalog.json")]
    catalog: PathBuf,
    /// Output JSON file path
    #[arg(long, default_value = "out/conjunctions.json")]
    output: PathBuf,
    /// Run start time (RFC 3339); defaults to now
    #[arg(long)]
    start: Option<DateTime<Utc>>,
    /// Time horizon in hours
    #[arg(long, default_value_t = 72.0)]
    hours: f64,
    /// Sampling step in seconds
    #[arg(long, default_value_t = 60.0)]
    step_seconds: f64,
    /// Danger distance threshold in kilometers
    #[arg(long, default_value_t = 10.0)]
    distance_km: f64,
    /// Refinement time precision in seconds
    #[arg(long, default_value_t = 0.5)]
    precision_seconds: f64,
    /// Optional wall-clock budget for the scan in seconds
    #[arg(long)]
    timeout_seconds: Option<f64>,
    /// Max number of events to keep in output
    #[arg(long, default_value_t = 50000)]
    max_events: usize,
}

#[derive(Debug, Serialize)]
struct ConjunctionDatabase {
    generated_at: String,
    start_time_utc: String,
    hours: f64,
    step_seconds: f64,
    distance_km: f64,
    precision_seconds: f64,
    total_objects: usize,
    screened_pairs: usize,
    events: Vec<ConjunctionEvent>,
    diagnostics: Vec<PairDiagnostic>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = ScanArgs::parse();

    let catalog = load_catalog(&args.catalog)?;
    let states = build_states(&catalog);
    if states.is_empty() {
        return Err(anyhow!("no usable objects in catalog"));
    }

    let start = args.start.unwrap_or_else(Utc::now);
    let mut config = ScanConfig::new(
        args.distance_km,
        args.hours * 3600.0,
        args.step_seconds,
        args.precision_seconds,
    );
    if let Some(timeout) = args.timeout_seconds {
        if timeout < 0.0 {
            return Err(anyhow!("timeout-seconds must be non-negative"));
        }
        config = config.with_deadline(std::time::Duration::from_secs_f64(timeout));
    }

    let propagator = KeplerPropagator::new(start);
    let mut report = run_scan(&states, &propagator, &config)?;
    if report.events.len() > args.max_events {
        report.events.truncate(args.max_events);
    }

    let db = ConjunctionDatabase {
        generated_at: Utc::now().to_rfc3339(),
        start_time_utc: start.to_rfc3339(),
        hours: args.hours,
        step_seconds: args.step_seconds,
        distance_km: args.distance_km,
        precision_seconds: args.precision_seconds,
        total_objects: states.len(),
        screened_pairs: report.screened_pairs,
        events: report.events,
        diagnostics: report.diagnostics,
    };

    if let Some(parent) = args.output.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(&args.output)?;
    serde_json::to_writer_pretty(file, &db)?;

    log::info!(
        "Wrote {} events ({} diagnostics) to {:?}",
        db.events.len(),
        db.diagnostics.len(),
        args.output
    );
    Ok(())
}
