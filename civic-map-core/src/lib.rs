//! Core domain types for the civic map viewer.
//!
//! The crate is free of I/O. It owns the viewport-driven refresh pipeline:
//! building the Overpass query for a [`BoundingBox`], classifying fetched
//! [`RawPoint`]s into [`Category`] layers, deriving the safety
//! [`HeatSurface`], and reconciling the user's [`VisibilitySelection`] with
//! the layers attached to the map. Network access is abstracted behind the
//! [`GeodataSource`] and [`Geocoder`] traits; HTTP implementations live in
//! `civic-map-data`.
//!
//! All mutable view state lives in an explicitly owned [`MapViewState`].

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod bbox;
pub mod category;
pub mod city;
pub mod classify;
pub mod layers;
pub mod notice;
pub mod poi;
pub mod query;
pub mod source;
pub mod tags;
pub mod view;
pub mod viewport;
pub mod visibility;

#[doc(hidden)]
pub mod test_support;

pub use bbox::{BoundingBox, BoundingBoxError};
pub use category::{Category, LayerKey};
pub use city::{City, UnknownCityError};
pub use classify::{ClassifiedPoint, MarkerStyle, Popup, classify, classify_all};
pub use layers::{
    Aggregation, HeatOptions, HeatPoint, HeatSurface, Layer, LayerTable, Marker, aggregate,
    normalise_weights,
};
pub use notice::Notice;
pub use poi::{RawPoint, dedupe_by_id};
pub use query::{OverpassQuery, build_query};
pub use source::{
    GeocodeError, GeocodedPlace, Geocoder, GeodataError, GeodataSource, PARAGUAY_QUALIFIER,
};
pub use tags::{PoiTags, RecyclingMaterial};
pub use view::{
    MapViewState, RefreshOutcome, RefreshPhase, RefreshTicket, SearchOutcome, StatusDisplay,
};
pub use viewport::{Viewport, ViewportSize};
pub use visibility::{NO_ACTIVE_LAYERS, VisibilitySelection, active_layers_summary};
