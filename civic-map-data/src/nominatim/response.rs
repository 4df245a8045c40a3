//! Nominatim `format=json` search results.
//!
//! See: <https://nominatim.org/release-docs/latest/api/Search/>

use civic_map_core::{GeocodeError, GeocodedPlace};
use geo::Coord;
use serde::Deserialize;

/// One search hit. Coordinates arrive as decimal strings.
#[derive(Debug, Deserialize)]
pub struct SearchResult {
    /// Latitude in decimal degrees.
    pub lat: String,
    /// Longitude in decimal degrees.
    pub lon: String,
    /// Full address of the hit.
    #[serde(default)]
    pub display_name: Option<String>,
}

impl SearchResult {
    /// Parse the coordinates into a place.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Parse`] when either coordinate is not a finite
    /// number.
    pub fn into_place(self) -> Result<GeocodedPlace, GeocodeError> {
        let lat = parse_coordinate("lat", &self.lat)?;
        let lon = parse_coordinate("lon", &self.lon)?;
        Ok(GeocodedPlace {
            location: Coord { x: lon, y: lat },
            display_name: self.display_name,
        })
    }
}

fn parse_coordinate(field: &str, value: &str) -> Result<f64, GeocodeError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| GeocodeError::Parse {
            message: format!("{field} {value:?} is not a coordinate"),
        })
}
