//! HTTP adapters for the civic map viewer.
//!
//! Responsibilities:
//! - Implement [`civic_map_core::GeodataSource`] against an Overpass
//!   interpreter.
//! - Implement [`civic_map_core::Geocoder`] against a Nominatim search
//!   endpoint.
//! - Decode the wire formats of both services.
//!
//! Boundaries:
//! - Do not encode domain rules (live in `civic-map-core`).
//! - No retries; each call is one request.
//!
//! Invariants:
//! - Transport, status and body failures map onto the structured core
//!   error types, never panics.
//! - No global mutable state.

#![forbid(unsafe_code)]

mod http;

pub mod nominatim;
pub mod overpass;

#[doc(hidden)]
pub mod test_support;

pub use http::{DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, ProviderBuildError};
pub use nominatim::{
    DEFAULT_NOMINATIM_ENDPOINT, HttpNominatimGeocoder, HttpNominatimGeocoderConfig,
};
pub use overpass::{DEFAULT_OVERPASS_ENDPOINT, HttpOverpassSource, HttpOverpassSourceConfig};
