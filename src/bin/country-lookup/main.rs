//! country-lookup: build and query a country boundary index.
//!
//! Usage examples
//! --------------
//!
//! - Build an index from Natural Earth admin-0 boundaries
//!   $ country-lookup build --input ne_10m_admin_0_countries.geojson --output countries.bin
//!
//! - Build from a gzipped GeoJSON text sequence with two-letter codes
//!   $ country-lookup build -i countries.geojsonseq.gz -o countries.bin --country-key ISO_A2
//!
//! - Find the country containing a coordinate
//!   $ country-lookup query --index countries.bin --lat 48.8 --lng 2.2
//!
//! Logs go to stderr and are filtered with `RUST_LOG` (default `info`).
mod args;

use crate::args::{CliArgs, Commands, InputFormat};
use anyhow::Context;
use clap::Parser;
use country_lookup::{AttributeKeys, CountryIndex};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();
}

/// Open a file for buffered reading, gunzipping it if it ends in `.gz`.
fn open_input(path: &Path) -> anyhow::Result<Box<dyn BufRead>> {
    let file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let gzipped = path.extension().map_or(false, |ext| ext == "gz");
    debug!(path = %path.display(), gzipped, "Opening input");
    if gzipped {
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

fn build(
    input: &Path,
    output: &Path,
    format: Option<InputFormat>,
    keys: &AttributeKeys,
) -> anyhow::Result<()> {
    let format = format.unwrap_or_else(|| InputFormat::from_path(input));
    let reader = open_input(input)?;
    let index = match format {
        InputFormat::Geojson => CountryIndex::open_from_geojson_with_keys(reader, keys),
        InputFormat::GeojsonSeq => CountryIndex::open_from_geojson_seq_with_keys(reader, keys),
    }
    .with_context(|| format!("Failed to read boundaries from {}", input.display()))?;

    let file =
        File::create(output).with_context(|| format!("Failed to create {}", output.display()))?;
    let mut writer = BufWriter::new(file);
    index
        .write_binary(&mut writer)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    writer
        .flush()
        .with_context(|| format!("Failed to write {}", output.display()))?;
    info!(loops = index.len(), output = %output.display(), "Wrote index");
    Ok(())
}

fn query(index_path: &Path, lat: f64, lng: f64, geojson: bool) -> anyhow::Result<()> {
    let reader = open_input(index_path)?;
    let index = CountryIndex::open_from_binary(reader)
        .with_context(|| format!("Failed to load index {}", index_path.display()))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let matches = index.query(lat, lng);
    debug!(lat, lng, matches = matches.len(), "Query");
    for item in matches {
        if geojson {
            writeln!(out, "{}", item.to_geojson())?;
        } else {
            writeln!(out, "{} ({})", item.name, item.country)?;
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let args = CliArgs::parse();

    match args.command {
        Commands::Build {
            input,
            output,
            format,
            name_key,
            country_key,
        } => build(
            &input,
            &output,
            format,
            &AttributeKeys::new(name_key, country_key),
        ),
        Commands::Query {
            index,
            lat,
            lng,
            geojson,
        } => query(&index, lat, lng, geojson),
    }
}
