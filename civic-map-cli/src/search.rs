//! Search command implementation for the civic map CLI.

use std::io::Write;
use std::time::Duration;

use civic_map_core::{
    BoundingBox, Geocoder, MapViewState, SearchOutcome, Viewport, source::qualify_query,
};
use civic_map_data::{HttpNominatimGeocoder, HttpNominatimGeocoderConfig};
use clap::Parser;
use geo::Coord;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_ACCEPT_LANGUAGE, ARG_NOMINATIM_URL, ARG_SEARCH_ADDRESS, ARG_TIMEOUT_SECS, ARG_USER_AGENT,
    CliError, ENV_SEARCH_ADDRESS, build_runtime, write_json,
};

/// CLI arguments for the `search` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Geocode an address with Nominatim, restricted to \
                 Paraguay, and print the viewport the map moves to. The \
                 search does not load any layers; run refresh afterwards.",
    about = "Find an address in Paraguay"
)]
#[ortho_config(prefix = "CIVIC_MAP")]
pub(crate) struct SearchArgs {
    /// Free-text address; ", Paraguay" is appended.
    #[arg(value_name = "address")]
    #[serde(default)]
    pub(crate) address: Option<String>,
    /// Nominatim search endpoint.
    #[arg(long = ARG_NOMINATIM_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) nominatim_url: Option<String>,
    /// Request timeout in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
    /// User agent sent with requests.
    #[arg(long = ARG_USER_AGENT, value_name = "agent")]
    #[serde(default)]
    pub(crate) user_agent: Option<String>,
    /// Preferred language for result names.
    #[arg(long = ARG_ACCEPT_LANGUAGE, value_name = "lang")]
    #[serde(default)]
    pub(crate) accept_language: Option<String>,
}

impl SearchArgs {
    pub(crate) fn into_config(self) -> Result<SearchConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SearchConfig::try_from(merged)
    }
}

/// Resolved `search` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SearchConfig {
    /// Address as typed, trimmed.
    pub(crate) address: String,
    pub(crate) nominatim_url: String,
    pub(crate) timeout: Duration,
    pub(crate) user_agent: String,
    pub(crate) accept_language: String,
}

impl SearchConfig {
    pub(crate) fn geocoder_config(&self) -> HttpNominatimGeocoderConfig {
        HttpNominatimGeocoderConfig::new(self.nominatim_url.as_str())
            .with_timeout(self.timeout)
            .with_user_agent(self.user_agent.as_str())
            .with_accept_language(self.accept_language.as_str())
    }
}

impl TryFrom<SearchArgs> for SearchConfig {
    type Error = CliError;

    fn try_from(args: SearchArgs) -> Result<Self, Self::Error> {
        let address = args
            .address
            .map(|text| text.trim().to_owned())
            .filter(|text| !text.is_empty())
            .ok_or(CliError::MissingArgument {
                field: ARG_SEARCH_ADDRESS,
                env: ENV_SEARCH_ADDRESS,
            })?;

        let defaults = HttpNominatimGeocoderConfig::default();
        Ok(Self {
            address,
            nominatim_url: args.nominatim_url.unwrap_or(defaults.endpoint),
            timeout: args
                .timeout_secs
                .map_or(defaults.timeout, Duration::from_secs),
            user_agent: args.user_agent.unwrap_or(defaults.user_agent),
            accept_language: args.accept_language.unwrap_or(defaults.accept_language),
        })
    }
}

/// Builds the geocoder for the current search invocation.
pub(super) trait GeocoderBuilder {
    fn build(&self, config: &SearchConfig) -> Result<Box<dyn Geocoder>, CliError>;
}

pub(super) struct DefaultGeocoderBuilder;

impl GeocoderBuilder for DefaultGeocoderBuilder {
    fn build(&self, config: &SearchConfig) -> Result<Box<dyn Geocoder>, CliError> {
        let geocoder = HttpNominatimGeocoder::with_config(config.geocoder_config()).map_err(
            |source| CliError::BuildGeocoder {
                endpoint: config.nominatim_url.clone(),
                source,
            },
        )?;
        Ok(Box::new(geocoder))
    }
}

/// Where a search landed, as printed by the `search` command.
#[derive(Debug, Serialize)]
pub(super) struct SearchReport {
    query: String,
    display_name: Option<String>,
    location: Coord<f64>,
    viewport: Viewport,
    bbox: BoundingBox,
}

pub(super) fn run_search(args: SearchArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    let builder = DefaultGeocoderBuilder;
    run_search_with(args, &builder, &mut stdout)
}

pub(super) fn run_search_with(
    args: SearchArgs,
    builder: &dyn GeocoderBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let report = search_with_config(&config, builder)?;
    write_json(writer, &report)
}

pub(super) fn search_with_config(
    config: &SearchConfig,
    builder: &dyn GeocoderBuilder,
) -> Result<SearchReport, CliError> {
    let geocoder = builder.build(config)?;
    let runtime = build_runtime()?;
    let mut view = MapViewState::default();
    let outcome = runtime.block_on(view.search_address(&*geocoder, &config.address));
    match outcome {
        SearchOutcome::Moved(place) => Ok(SearchReport {
            query: qualify_query(&config.address),
            display_name: place.display_name,
            location: place.location,
            viewport: *view.viewport(),
            bbox: view.viewport().bounds(),
        }),
        SearchOutcome::Failed(notice) => Err(notice.into()),
        SearchOutcome::Skipped => Err(CliError::MissingArgument {
            field: ARG_SEARCH_ADDRESS,
            env: ENV_SEARCH_ADDRESS,
        }),
    }
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<SearchConfig, CliError> {
    let merged = SearchArgs::merge_from_layers(layers).map_err(CliError::from)?;
    SearchConfig::try_from(merged)
}
