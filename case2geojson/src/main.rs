#[macro_use]
extern crate log;

use std::path::Path;
use std::process;

use anyhow::Result;
use structopt::StructOpt;

use case2geojson::{extract_records, feature_collection, write_geojson, GeoRecord};

#[derive(StructOpt)]
#[structopt(
    name = "case2geojson",
    about = "Extracts locations from a CASE/UCO JSON-LD graph and writes them as GeoJSON"
)]
struct Flags {
    /// CASE JSON-LD file to read
    #[structopt()]
    input: String,

    /// GeoJSON file to write
    #[structopt()]
    output: String,
}

// Exit codes, one per failure class. Wrong argument counts exit non-zero via
// structopt before we get here.
const EXIT_INPUT_NOT_FOUND: i32 = 2;
const EXIT_OUTPUT_DIR_NOT_FOUND: i32 = 3;
const EXIT_QUERY_FAILED: i32 = 4;
const EXIT_WRITE_FAILED: i32 = 5;

#[tokio::main]
async fn main() {
    let flags = Flags::from_args();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Validate both paths before loading anything, so a bad invocation never
    // leaves a partial output file behind.
    if !Path::new(&flags.input).is_file() {
        error!("Input file not found: {}", flags.input);
        process::exit(EXIT_INPUT_NOT_FOUND);
    }
    if !output_dir_exists(&flags.output) {
        error!("Output directory not found for: {}", flags.output);
        process::exit(EXIT_OUTPUT_DIR_NOT_FOUND);
    }

    let records = match load_records(&flags.input).await {
        Ok(records) => records,
        Err(err) => {
            error!("Extracting locations from {} failed: {:#}", flags.input, err);
            process::exit(EXIT_QUERY_FAILED);
        }
    };

    let with_geometry = records.iter().filter(|r| r.point().is_some()).count();
    let collection = feature_collection(records);
    if let Err(err) = write_geojson(&flags.output, &collection) {
        error!("Writing {} failed: {:#}", flags.output, err);
        process::exit(EXIT_WRITE_FAILED);
    }
    info!(
        "Wrote {} features ({} with a point geometry) to {}",
        collection.features.len(),
        with_geometry,
        flags.output
    );
}

async fn load_records(path: &str) -> Result<Vec<GeoRecord>> {
    let graph = casegraph::CaseGraph::load(path).await?;
    extract_records(&graph)
}

/// An output path with no directory component writes to the current
/// directory, which always exists.
fn output_dir_exists(path: &str) -> bool {
    match Path::new(path).parent() {
        // The path is a filesystem root, not a file
        None => false,
        Some(parent) if parent.as_os_str().is_empty() => true,
        Some(parent) => parent.is_dir(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_filenames_write_to_the_current_directory() {
        assert!(output_dir_exists("out.geojson"));
        assert!(output_dir_exists("./out.geojson"));
    }

    #[test]
    fn missing_directories_are_caught() {
        assert!(!output_dir_exists("/definitely/not/a/real/dir/out.geojson"));
        assert!(!output_dir_exists("/"));
    }

    #[test]
    fn existing_directories_pass() {
        let path = std::env::temp_dir().join("out.geojson");
        assert!(output_dir_exists(path.to_str().unwrap()));
    }
}
