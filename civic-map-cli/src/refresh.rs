//! Refresh command implementation for the civic map CLI.

use std::io::Write;
use std::time::Duration;

use civic_map_core::{
    BoundingBox, Category, City, GeodataSource, HeatSurface, LayerKey, MapViewState, Marker,
    RefreshOutcome, Viewport, ViewportSize, VisibilitySelection,
};
use civic_map_data::{HttpOverpassSource, HttpOverpassSourceConfig};
use clap::Parser;
use geo::Rect;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_OVERPASS_URL, ARG_REFRESH_BBOX, ARG_REFRESH_CITY, ARG_REFRESH_HEIGHT, ARG_REFRESH_LAYER,
    ARG_REFRESH_WIDTH, ARG_TIMEOUT_SECS, ARG_USER_AGENT, CliError, build_runtime, write_json,
};

/// CLI arguments for the `refresh` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Fetch hospitals, police, fire stations, parks, \
                 supermarkets, schools and recycling points inside a \
                 viewport from Overpass, classify them into layers and \
                 print the rendered view as JSON. The viewport is centred \
                 on a city, or replaced by an explicit bounding box.",
    about = "Load the civic layers for a viewport"
)]
#[ortho_config(prefix = "CIVIC_MAP")]
pub(crate) struct RefreshArgs {
    /// City to centre on: asuncion, cde, encarnacion or villarrica.
    #[arg(long = ARG_REFRESH_CITY, value_name = "key")]
    #[serde(default)]
    pub(crate) city: Option<String>,
    /// Explicit area as `south,west,north,east` in decimal degrees.
    #[arg(long = ARG_REFRESH_BBOX, value_name = "s,w,n,e", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) bbox: Option<String>,
    /// Layer to show; repeat for several. Defaults to police.
    #[arg(long = ARG_REFRESH_LAYER, value_name = "key")]
    #[serde(default)]
    pub(crate) layers: Option<Vec<String>>,
    /// Map container width in pixels.
    #[arg(long = ARG_REFRESH_WIDTH, value_name = "px")]
    #[serde(default)]
    pub(crate) width: Option<u32>,
    /// Map container height in pixels.
    #[arg(long = ARG_REFRESH_HEIGHT, value_name = "px")]
    #[serde(default)]
    pub(crate) height: Option<u32>,
    /// Overpass interpreter endpoint.
    #[arg(long = ARG_OVERPASS_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) overpass_url: Option<String>,
    /// Request timeout in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
    /// User agent sent with requests.
    #[arg(long = ARG_USER_AGENT, value_name = "agent")]
    #[serde(default)]
    pub(crate) user_agent: Option<String>,
}

impl RefreshArgs {
    pub(crate) fn into_config(self) -> Result<RefreshConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RefreshConfig::try_from(merged)
    }
}

/// Area a refresh covers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum RefreshArea {
    /// The viewport centred on a city at its preset zoom.
    City(City),
    /// An explicit box, bypassing the viewport.
    Bbox(BoundingBox),
}

/// Resolved `refresh` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RefreshConfig {
    pub(crate) area: RefreshArea,
    pub(crate) selection: VisibilitySelection,
    pub(crate) size: ViewportSize,
    pub(crate) overpass_url: String,
    pub(crate) timeout: Duration,
    pub(crate) user_agent: String,
}

impl RefreshConfig {
    /// View the refresh starts from, with the selection already reconciled.
    pub(crate) fn initial_view(&self) -> MapViewState {
        let (center, zoom) = match self.area {
            RefreshArea::City(city) => (city.center(), city.zoom()),
            RefreshArea::Bbox(bbox) => (Rect::from(bbox).center(), City::INITIAL.zoom()),
        };
        MapViewState::with_selection(
            Viewport::new(center, zoom, self.size),
            self.selection.clone(),
        )
    }

    pub(crate) fn overpass_config(&self) -> HttpOverpassSourceConfig {
        HttpOverpassSourceConfig::new(self.overpass_url.as_str())
            .with_timeout(self.timeout)
            .with_user_agent(self.user_agent.as_str())
    }
}

impl TryFrom<RefreshArgs> for RefreshConfig {
    type Error = CliError;

    fn try_from(args: RefreshArgs) -> Result<Self, Self::Error> {
        let area = match (args.city, args.bbox) {
            (Some(_), Some(_)) => {
                return Err(CliError::ConflictingArguments {
                    first: ARG_REFRESH_CITY,
                    second: ARG_REFRESH_BBOX,
                });
            }
            (Some(key), None) => RefreshArea::City(key.parse()?),
            (None, Some(input)) => {
                let bbox = input
                    .parse::<BoundingBox>()
                    .map_err(|source| CliError::InvalidBoundingBox { input, source })?;
                RefreshArea::Bbox(bbox)
            }
            (None, None) => RefreshArea::City(City::INITIAL),
        };

        let selection = match args.layers {
            Some(keys) => parse_selection(&keys)?,
            None => VisibilitySelection::default(),
        };

        let default_size = ViewportSize::default();
        let size = ViewportSize {
            width: args.width.unwrap_or(default_size.width),
            height: args.height.unwrap_or(default_size.height),
        };
        if size.width == 0 || size.height == 0 {
            return Err(CliError::EmptyViewport {
                width: size.width,
                height: size.height,
            });
        }

        let defaults = HttpOverpassSourceConfig::default();
        Ok(Self {
            area,
            selection,
            size,
            overpass_url: args.overpass_url.unwrap_or(defaults.endpoint),
            timeout: args
                .timeout_secs
                .map_or(defaults.timeout, Duration::from_secs),
            user_agent: args.user_agent.unwrap_or(defaults.user_agent),
        })
    }
}

fn parse_selection(keys: &[String]) -> Result<VisibilitySelection, CliError> {
    let parsed = keys
        .iter()
        .map(|key| {
            key.parse::<LayerKey>()
                .map_err(|_| CliError::UnknownLayer { key: key.clone() })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(VisibilitySelection::from_keys(parsed))
}

/// Builds the geodata source for the current refresh invocation.
pub(super) trait GeodataSourceBuilder {
    fn build(&self, config: &RefreshConfig) -> Result<Box<dyn GeodataSource>, CliError>;
}

pub(super) struct DefaultGeodataSourceBuilder;

impl GeodataSourceBuilder for DefaultGeodataSourceBuilder {
    fn build(&self, config: &RefreshConfig) -> Result<Box<dyn GeodataSource>, CliError> {
        let source = HttpOverpassSource::with_config(config.overpass_config()).map_err(
            |source| CliError::BuildGeodataSource {
                endpoint: config.overpass_url.clone(),
                source,
            },
        )?;
        Ok(Box::new(source))
    }
}

/// One category layer as rendered.
#[derive(Debug, Serialize)]
struct LayerReport {
    key: &'static str,
    label: &'static str,
    attached: bool,
    markers: Vec<Marker>,
}

/// The refreshed view as printed by the `refresh` command.
#[derive(Debug, Serialize)]
pub(super) struct RefreshReport {
    bbox: BoundingBox,
    viewport: Viewport,
    point_count: String,
    active_layers: String,
    layers: Vec<LayerReport>,
    heat_attached: bool,
    heat: Option<HeatSurface>,
}

impl RefreshReport {
    fn from_view(view: &MapViewState, bbox: BoundingBox) -> Self {
        let layers = Category::ALL
            .iter()
            .map(|&category| LayerReport {
                key: category.as_str(),
                label: category.layer_label(),
                attached: view.is_attached(LayerKey::Category(category)),
                markers: view.layers()[category].markers().to_vec(),
            })
            .collect();
        Self {
            bbox,
            viewport: *view.viewport(),
            point_count: view.status().point_count.clone(),
            active_layers: view.status().active_layers.clone(),
            layers,
            heat_attached: view.is_attached(LayerKey::Heat),
            heat: view.heat().cloned(),
        }
    }
}

pub(super) fn run_refresh(args: RefreshArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    let builder = DefaultGeodataSourceBuilder;
    run_refresh_with(args, &builder, &mut stdout)
}

pub(super) fn run_refresh_with(
    args: RefreshArgs,
    builder: &dyn GeodataSourceBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let report = execute_refresh(args, builder)?;
    write_json(writer, &report)
}

fn execute_refresh(
    args: RefreshArgs,
    builder: &dyn GeodataSourceBuilder,
) -> Result<RefreshReport, CliError> {
    let config = args.into_config()?;
    refresh_with_config(&config, builder)
}

pub(super) fn refresh_with_config(
    config: &RefreshConfig,
    builder: &dyn GeodataSourceBuilder,
) -> Result<RefreshReport, CliError> {
    let source = builder.build(config)?;
    let runtime = build_runtime()?;
    let mut view = config.initial_view();
    let (outcome, bbox) = runtime.block_on(async {
        match config.area {
            RefreshArea::City(_) => {
                let bbox = view.viewport().bounds();
                (view.refresh(&*source).await, bbox)
            }
            RefreshArea::Bbox(bbox) => (view.refresh_in(&*source, bbox).await, bbox),
        }
    });
    match outcome {
        RefreshOutcome::Success { points, markers } => {
            info!("refreshed {points} points into {markers} markers");
            Ok(RefreshReport::from_view(&view, bbox))
        }
        RefreshOutcome::Failed(notice) => Err(notice.into()),
        RefreshOutcome::Superseded => Err(CliError::Superseded),
    }
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<RefreshConfig, CliError> {
    let merged = RefreshArgs::merge_from_layers(layers).map_err(CliError::from)?;
    RefreshConfig::try_from(merged)
}
