//! Overpass `[out:json]` response types.
//!
//! See: <https://wiki.openstreetmap.org/wiki/Overpass_API/Output_Formats#JSON>

use std::collections::HashMap;

use civic_map_core::RawPoint;
use geo::Coord;
use log::warn;
use serde::Deserialize;

/// Top-level Overpass response.
#[derive(Debug, Deserialize)]
pub struct OverpassResponse {
    /// Returned elements in service order.
    #[serde(default)]
    pub elements: Vec<Element>,

    /// Runtime notice from the interpreter, e.g. a server-side timeout that
    /// truncated the result.
    #[serde(default)]
    pub remark: Option<String>,
}

/// A single element. Only nodes carry `lat`/`lon` directly.
#[derive(Debug, Deserialize)]
pub struct Element {
    /// Element type (`node`, `way`, `relation`).
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// OSM identifier.
    pub id: u64,
    /// Latitude in decimal degrees.
    pub lat: Option<f64>,
    /// Longitude in decimal degrees.
    pub lon: Option<f64>,
    /// Raw tag map.
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

impl Element {
    fn into_point(self) -> Option<RawPoint> {
        let (Some(lat), Some(lon)) = (self.lat, self.lon) else {
            return None;
        };
        Some(RawPoint::from_raw_tags(
            self.id,
            Coord { x: lon, y: lat },
            &self.tags,
        ))
    }
}

impl OverpassResponse {
    /// Convert located elements into points, discarding the rest.
    #[must_use]
    pub fn into_points(self) -> Vec<RawPoint> {
        if let Some(remark) = &self.remark {
            warn!("overpass remark: {remark}");
        }
        let total = self.elements.len();
        let points: Vec<RawPoint> = self
            .elements
            .into_iter()
            .filter_map(Element::into_point)
            .collect();
        if points.len() < total {
            warn!(
                "discarded {} of {total} elements without coordinates",
                total - points.len()
            );
        }
        points
    }
}
