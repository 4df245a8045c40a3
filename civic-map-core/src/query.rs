//! Overpass QL query construction for a viewport.
//!
//! The query is a union of `node` clauses, one per tag predicate, each
//! restricted to the same bounding box.

use crate::bbox::BoundingBox;
use crate::tags::RecyclingMaterial;

/// Server-side timeout requested in the query header, in seconds.
pub const QUERY_TIMEOUT_SECS: u32 = 25;

/// `amenity` values fetched for the viewport.
pub const AMENITY_VALUES: [&str; 9] = [
    "hospital",
    "clinic",
    "police",
    "fire_station",
    "school",
    "kindergarten",
    "college",
    "university",
    "recycling",
];

/// An Overpass QL query string ready to be sent to an interpreter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverpassQuery(String);

impl OverpassQuery {
    /// Borrow the query text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the query text.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for OverpassQuery {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OverpassQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Every `[key=value]` predicate, in query order.
pub fn tag_filters() -> impl Iterator<Item = (&'static str, &'static str)> {
    let amenities = AMENITY_VALUES.into_iter().map(|value| ("amenity", value));
    let others = [("leisure", "park"), ("shop", "supermarket")];
    let materials = RecyclingMaterial::ALL
        .into_iter()
        .map(|material| (material.tag_key(), "yes"));
    amenities.chain(others).chain(materials)
}

/// Build the Overpass query for every tracked amenity inside `bbox`.
///
/// # Examples
/// ```
/// use civic_map_core::{BoundingBox, build_query};
///
/// # fn main() -> Result<(), civic_map_core::BoundingBoxError> {
/// let bbox = BoundingBox::new(-25.3, -57.7, -25.2, -57.6)?;
/// let query = build_query(&bbox);
/// assert!(query.as_str().contains(r#"node["amenity"="police"](-25.3,-57.7,-25.2,-57.6);"#));
/// # Ok(())
/// # }
/// ```
#[must_use]
pub fn build_query(bbox: &BoundingBox) -> OverpassQuery {
    let area = bbox.to_overpass();
    let clauses: String = tag_filters()
        .map(|(key, value)| format!("  node[\"{key}\"=\"{value}\"]({area});\n"))
        .collect();
    OverpassQuery(format!(
        "[out:json][timeout:{QUERY_TIMEOUT_SECS}];\n(\n{clauses});\nout body;\n"
    ))
}
