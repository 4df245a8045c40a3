//! Nominatim search adapter.
//!
//! [`HttpNominatimGeocoder`] implements [`civic_map_core::Geocoder`] with a
//! single-result search. Queries are sent as given; qualify them with
//! [`civic_map_core::source::qualify_query`] first to stay within Paraguay.

mod response;
mod source;

pub use response::SearchResult;
pub use source::{
    DEFAULT_ACCEPT_LANGUAGE, DEFAULT_NOMINATIM_ENDPOINT, HttpNominatimGeocoder,
    HttpNominatimGeocoderConfig,
};
