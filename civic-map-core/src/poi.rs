use std::collections::{HashMap, HashSet};

use geo::Coord;

use crate::tags::PoiTags;

/// A node returned by the geodata service for the current viewport.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`.
///
/// # Examples
/// ```
/// use std::collections::HashMap;
/// use geo::Coord;
/// use civic_map_core::RawPoint;
///
/// let point = RawPoint::from_raw_tags(
///     7,
///     Coord { x: -57.64, y: -25.29 },
///     &HashMap::from([("amenity".into(), "police".into())]),
/// );
/// assert_eq!(point.lat(), -25.29);
/// assert_eq!(point.tags.amenity.as_deref(), Some("police"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RawPoint {
    pub id: u64,
    pub location: Coord<f64>,
    pub tags: PoiTags,
}

impl RawPoint {
    /// Construct a point from already-parsed tags.
    #[must_use]
    pub const fn new(id: u64, location: Coord<f64>, tags: PoiTags) -> Self {
        Self { id, location, tags }
    }

    /// Construct a point, parsing the free-form tag map.
    #[must_use]
    pub fn from_raw_tags(id: u64, location: Coord<f64>, raw: &HashMap<String, String>) -> Self {
        Self::new(id, location, PoiTags::from_raw(raw))
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn lat(&self) -> f64 {
        self.location.y
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn lon(&self) -> f64 {
        self.location.x
    }
}

/// Drop repeated ids, keeping the first occurrence and the input order.
#[must_use]
pub fn dedupe_by_id(points: Vec<RawPoint>) -> Vec<RawPoint> {
    let mut seen = HashSet::with_capacity(points.len());
    points
        .into_iter()
        .filter(|point| seen.insert(point.id))
        .collect()
}
