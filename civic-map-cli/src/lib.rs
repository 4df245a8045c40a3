//! Command-line interface for the civic map viewer.
//!
//! `refresh` loads the civic amenities inside a viewport and prints the
//! rendered layers as JSON. `search` geocodes an address and prints the
//! viewport it lands on. `cities` lists the jump-to table.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::Write;

mod cities;
mod error;
mod refresh;
mod search;

pub use error::CliError;

use refresh::{RefreshArgs, run_refresh};
use search::{SearchArgs, run_search};

const ARG_REFRESH_CITY: &str = "city";
const ARG_REFRESH_BBOX: &str = "bbox";
const ARG_REFRESH_LAYER: &str = "layer";
const ARG_REFRESH_WIDTH: &str = "width";
const ARG_REFRESH_HEIGHT: &str = "height";
const ARG_OVERPASS_URL: &str = "overpass-url";
const ARG_NOMINATIM_URL: &str = "nominatim-url";
const ARG_TIMEOUT_SECS: &str = "timeout-secs";
const ARG_USER_AGENT: &str = "user-agent";
const ARG_ACCEPT_LANGUAGE: &str = "accept-language";
const ARG_SEARCH_ADDRESS: &str = "address";
const ENV_SEARCH_ADDRESS: &str = "CIVIC_MAP_CMDS_SEARCH_ADDRESS";

/// Run the civic map CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns a [`CliError`] when arguments or configuration are invalid, when
/// a request fails, or when the report cannot be written.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Refresh(args) => run_refresh(args),
        Command::Search(args) => run_search(args),
        Command::Cities => cities::run_cities(),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "civic-map",
    about = "Civic amenities of Paraguay from OpenStreetMap",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load the civic layers for a viewport and print them.
    Refresh(RefreshArgs),
    /// Find an address in Paraguay and print the viewport it moves to.
    Search(SearchArgs),
    /// List the cities available as jump targets.
    Cities,
}

/// Write `value` as pretty JSON followed by a newline.
fn write_json<T: Serialize>(writer: &mut dyn Write, value: &T) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerialiseReport)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

/// Current-thread runtime driving one command's requests.
fn build_runtime() -> Result<tokio::runtime::Runtime, CliError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)
}

#[cfg(test)]
mod tests;
