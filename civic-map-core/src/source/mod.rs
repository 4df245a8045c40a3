//! Remote data the viewer depends on.
//!
//! The [`GeodataSource`] trait abstracts the query service that returns the
//! points inside a viewport; the [`Geocoder`] trait abstracts free-text
//! address lookup. Both are asynchronous and `?Send`: the viewer drives them
//! from a single cooperative execution context.
//!
//! Errors are returned as-is. Callers do not retry.

mod error;
mod geocode;
mod geodata;

pub use error::{GeocodeError, GeodataError};
pub use geocode::{GeocodedPlace, Geocoder, PARAGUAY_QUALIFIER, qualify_query};
pub use geodata::GeodataSource;
