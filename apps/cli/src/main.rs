// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Edgeweld CLI - simplify a GeoJSON feature collection without opening gaps
//! or overlaps between neighbouring features.
//!
//! Usage:
//!   edgeweld <input.geojson> [options]

use std::fs;
use std::time::Instant;

use anyhow::{Context, Result};
use edgeweld_geometry::FeatureCollection;
use edgeweld_topology::Simplificator;
use tracing_subscriber::EnvFilter;

mod args;
mod config;

use args::{Command, RunArgs};
use config::{Config, LogFormat};

fn main() -> Result<()> {
    let config = Config::from_env();
    init_tracing(config.log_format);

    let raw: Vec<String> = std::env::args().skip(1).collect();
    match args::parse(&raw, &config)? {
        Command::Help => {
            args::print_usage();
            Ok(())
        }
        Command::Run(run_args) => run(&run_args),
    }
}

/// Log lines go to stderr; stdout carries the GeoJSON result.
fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

fn run(args: &RunArgs) -> Result<()> {
    let start = Instant::now();

    let input = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let mut collection = FeatureCollection::from_json(&input)
        .with_context(|| format!("failed to parse {}", args.input.display()))?;

    tracing::info!(
        input = %args.input.display(),
        features = collection.features.len(),
        method = ?args.method,
        strict = args.weld.strict,
        "Simplifying features"
    );

    let mut simplificator = Simplificator::new(args.weld.clone());
    simplificator.set_feature_list(&collection.features)?;
    simplificator.simplify_with(&args.method)?;
    let diagnostics = simplificator.apply(&mut collection.features)?;

    if let Some(path) = &args.edges {
        let edges = simplificator.edges_to_geojson().to_json(args.pretty)?;
        fs::write(path, edges).with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), chains = simplificator.edge_count(), "Wrote chains");
    }

    let output = collection.to_json(args.pretty)?;
    match &args.output {
        Some(path) => {
            fs::write(path, output).with_context(|| format!("failed to write {}", path.display()))?
        }
        None => println!("{}", output),
    }

    if !diagnostics.is_empty() {
        tracing::warn!(count = diagnostics.len(), "Reconstruction reported anomalies");
    }
    tracing::info!(
        chains = simplificator.edge_count(),
        diagnostics = diagnostics.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Done"
    );
    Ok(())
}
