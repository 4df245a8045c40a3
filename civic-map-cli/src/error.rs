//! Error types emitted by the civic map CLI.

use std::sync::Arc;

use civic_map_core::{BoundingBoxError, Notice, UnknownCityError};
use civic_map_data::ProviderBuildError;
use thiserror::Error;

/// Errors emitted by the civic map CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// Two mutually exclusive options were both supplied.
    #[error("--{first} and --{second} cannot be combined")]
    ConflictingArguments {
        first: &'static str,
        second: &'static str,
    },
    /// The `--bbox` value was not a valid bounding box.
    #[error("invalid bounding box {input:?}: {source}")]
    InvalidBoundingBox {
        input: String,
        #[source]
        source: BoundingBoxError,
    },
    /// The city key is not in the jump-to table.
    #[error(transparent)]
    UnknownCity(#[from] UnknownCityError),
    /// A layer key is neither a category nor `heat`.
    #[error("unknown layer {key:?} (expected a category or heat)")]
    UnknownLayer { key: String },
    /// The viewport would have no pixels.
    #[error("viewport must be at least 1x1 pixels, got {width}x{height}")]
    EmptyViewport { width: u32, height: u32 },
    /// Constructing the Overpass adapter failed.
    #[error("failed to build geodata source for {endpoint:?}: {source}")]
    BuildGeodataSource {
        endpoint: String,
        #[source]
        source: ProviderBuildError,
    },
    /// Constructing the Nominatim adapter failed.
    #[error("failed to build geocoder for {endpoint:?}: {source}")]
    BuildGeocoder {
        endpoint: String,
        #[source]
        source: ProviderBuildError,
    },
    /// The async runtime could not start.
    #[error("failed to start runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// A request failed; the view raised a failure notice.
    #[error("{message} ({detail})")]
    FetchFailed {
        message: &'static str,
        detail: String,
    },
    /// Geocoding returned no result.
    #[error("no match for address {query:?}")]
    AddressNotFound { query: String },
    /// A newer refresh replaced this one before it completed.
    #[error("refresh was superseded before it completed")]
    Superseded,
    /// Serializing the report failed.
    #[error("failed to serialize report: {0}")]
    SerialiseReport(#[source] serde_json::Error),
    /// Writing the report failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}

impl From<Notice> for CliError {
    fn from(notice: Notice) -> Self {
        match notice {
            Notice::FetchFailure { message, detail } => Self::FetchFailed { message, detail },
            Notice::NotFound { query } => Self::AddressNotFound { query },
        }
    }
}
