//! Free-text geocoding trait.

use async_trait::async_trait;
use geo::Coord;

use super::error::GeocodeError;

/// Country qualifier appended to every address search.
pub const PARAGUAY_QUALIFIER: &str = ", Paraguay";

/// Restrict a free-text query to Paraguay.
///
/// # Examples
/// ```
/// use civic_map_core::source::qualify_query;
///
/// assert_eq!(qualify_query("Palma 123"), "Palma 123, Paraguay");
/// ```
#[must_use]
pub fn qualify_query(query: &str) -> String {
    format!("{}{PARAGUAY_QUALIFIER}", query.trim())
}

/// Best match returned by a geocoder.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GeocodedPlace {
    /// Position of the match (`x = longitude`, `y = latitude`).
    pub location: Coord<f64>,
    /// Human-readable name supplied by the service, when any.
    pub display_name: Option<String>,
}

/// Resolve a free-text address to a position.
#[async_trait(?Send)]
pub trait Geocoder {
    /// Return the best match for `query`, or `Ok(None)` when the service has
    /// no result.
    ///
    /// `query` is sent as given; callers add any country qualifier.
    async fn geocode(&self, query: &str) -> Result<Option<GeocodedPlace>, GeocodeError>;
}

#[async_trait(?Send)]
impl<T: Geocoder + ?Sized> Geocoder for &T {
    async fn geocode(&self, query: &str) -> Result<Option<GeocodedPlace>, GeocodeError> {
        (**self).geocode(query).await
    }
}
