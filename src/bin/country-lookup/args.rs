use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for country-lookup
#[derive(Debug, Parser)]
#[command(
    name = "country-lookup",
    version,
    about = "Build a country boundary index and find the countries containing a coordinate"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build a binary index from GeoJSON boundaries
    Build {
        /// GeoJSON input, optionally gzipped
        #[arg(short = 'i', long = "input")]
        input: PathBuf,

        /// Where to write the binary index
        #[arg(short = 'o', long = "output")]
        output: PathBuf,

        /// Input framing; inferred from the file extension when omitted
        #[arg(short = 'f', long = "format", value_enum)]
        format: Option<InputFormat>,

        /// Feature property holding the country name
        #[arg(long = "name-key", default_value = "ADMIN")]
        name_key: String,

        /// Feature property holding the country code
        #[arg(long = "country-key", default_value = "ISO_A3")]
        country_key: String,
    },

    /// Print the countries containing a coordinate
    Query {
        /// Binary index built by `build`, optionally gzipped
        #[arg(long = "index")]
        index: PathBuf,

        /// Latitude in degrees
        #[arg(long = "lat", allow_hyphen_values = true)]
        lat: f64,

        /// Longitude in degrees
        #[arg(long = "lng", allow_hyphen_values = true)]
        lng: f64,

        /// Print the matching loops as GeoJSON features
        #[arg(long = "geojson")]
        geojson: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    /// A single FeatureCollection document
    Geojson,
    /// One Feature per line
    GeojsonSeq,
}

impl InputFormat {
    /// Guess the framing from a file name, looking through a `.gz` suffix.
    pub fn from_path(path: &std::path::Path) -> InputFormat {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        let name = name.strip_suffix(".gz").unwrap_or(&name);
        let is_seq = [".geojsonseq", ".geojsonl", ".ndjson", ".jsonl"]
            .iter()
            .any(|ext| name.ends_with(ext));
        if is_seq {
            InputFormat::GeojsonSeq
        } else {
            InputFormat::Geojson
        }
    }
}
