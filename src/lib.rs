//! Facade crate for the civic map viewer.
//!
//! This crate re-exports the core domain types and, behind the `http`
//! feature, the Overpass and Nominatim adapters.

#![forbid(unsafe_code)]

pub use civic_map_core::{
    BoundingBox, BoundingBoxError, Category, City, GeocodeError, GeocodedPlace, Geocoder,
    GeodataError, GeodataSource, HeatSurface, LayerKey, MapViewState, Notice, OverpassQuery,
    RawPoint, RefreshOutcome, SearchOutcome, StatusDisplay, Viewport, ViewportSize,
    VisibilitySelection, build_query, classify, classify_all,
};

#[cfg(feature = "http")]
pub use civic_map_data::{
    HttpNominatimGeocoder, HttpNominatimGeocoderConfig, HttpOverpassSource,
    HttpOverpassSourceConfig, ProviderBuildError,
};
