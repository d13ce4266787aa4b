// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Command line parsing.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use edgeweld_topology::{Method, VisvalingamOptions, WeldOptions};

use crate::config::Config;

/// A fully resolved invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct RunArgs {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    /// Where to write the chain debug collection.
    pub edges: Option<PathBuf>,
    pub method: Method,
    pub weld: WeldOptions,
    pub pretty: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Run(RunArgs),
}

/// Parses `args` (without the program name) on top of `config`.
pub fn parse(args: &[String], config: &Config) -> Result<Command> {
    if args.is_empty() || args.iter().any(|a| a == "--help" || a == "-h") {
        return Ok(Command::Help);
    }

    let mut input = None;
    let mut output = None;
    let mut edges = None;
    let mut tolerance = None;
    let mut vw = VisvalingamOptions::default();
    let mut use_vw = false;
    let mut weld = WeldOptions {
        round: None,
        strict: config.strict,
    };
    let mut pretty = false;

    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--tolerance" => tolerance = Some(value(args, &mut i)?),
            "--area" => {
                vw.area = value(args, &mut i)?;
                use_vw = true;
            }
            "--dist" => {
                vw.dist = value(args, &mut i)?;
                use_vw = true;
            }
            "--ratio" => {
                vw.ratio = Some(value(args, &mut i)?);
                use_vw = true;
            }
            "--min-points" => {
                vw.min_points = value(args, &mut i)?;
                use_vw = true;
            }
            "--keep-ends" => {
                vw.keep_ends = true;
                use_vw = true;
            }
            "--round" => weld.round = Some(value(args, &mut i)?),
            "--strict" => weld.strict = true,
            "--pretty" => pretty = true,
            "--output" | "-o" => output = Some(value::<PathBuf>(args, &mut i)?),
            "--edges" => edges = Some(value::<PathBuf>(args, &mut i)?),
            other if other.starts_with('-') => bail!("unknown option: {}", other),
            path => {
                if input.is_some() {
                    bail!("unexpected argument: {}", path);
                }
                input = Some(PathBuf::from(path));
            }
        }
        i += 1;
    }

    let input = input.ok_or_else(|| anyhow!("missing input file"))?;
    let method = match (use_vw, tolerance) {
        (true, Some(_)) => bail!("--tolerance cannot be combined with Visvalingam options"),
        (true, None) => Method::Visvalingam(vw),
        (false, tolerance) => Method::DouglasPeucker {
            tolerance: tolerance.unwrap_or(config.tolerance),
        },
    };
    method.validate()?;

    Ok(Command::Run(RunArgs {
        input,
        output,
        edges,
        method,
        weld,
        pretty,
    }))
}

/// Consumes and parses the value following the flag at `*i`.
fn value<T>(args: &[String], i: &mut usize) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let flag = &args[*i];
    *i += 1;
    let raw = args
        .get(*i)
        .ok_or_else(|| anyhow!("{} expects a value", flag))?;
    raw.parse()
        .with_context(|| format!("invalid value for {}: {}", flag, raw))
}

pub fn print_usage() {
    eprintln!("edgeweld - topology-preserving simplification of GeoJSON features");
    eprintln!();
    eprintln!("Usage: edgeweld <input.geojson> [options]");
    eprintln!();
    eprintln!("Douglas-Peucker:");
    eprintln!("  --tolerance <T>    Distance tolerance (default: $EDGEWELD_TOLERANCE or 0)");
    eprintln!();
    eprintln!("Visvalingam:");
    eprintln!("  --area <A>         Minimum triangle area");
    eprintln!("  --dist <D>         Distance tolerance, as an area of D^2/2");
    eprintln!("  --ratio <R>        Fraction of points to keep, in (0, 1]");
    eprintln!("  --min-points <N>   Never reduce a chain below N points");
    eprintln!("  --keep-ends        Keep the seam of closed lines");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --round <N>        Coordinate precision in digits (accepted, not applied)");
    eprintln!("  --strict           Fail on topology inconsistencies");
    eprintln!("  --output, -o <F>   Write the result to F instead of stdout");
    eprintln!("  --edges <F>        Write the welded chains to F as GeoJSON");
    eprintln!("  --pretty           Pretty-print JSON output");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  RUST_LOG           Log filter (default: info)");
    eprintln!("  EDGEWELD_STRICT    Enable --strict");
    eprintln!("  EDGEWELD_LOG_FORMAT  'json' for JSON log lines");
}
