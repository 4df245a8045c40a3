//! Geographic bounding boxes for viewport queries.
//!
//! Coordinates are WGS84 decimal degrees. A box is ephemeral: it is
//! recomputed from the viewport on every refresh.

use geo::{Coord, Rect};
use thiserror::Error;

/// A validated `{south, west, north, east}` rectangle.
///
/// # Examples
/// ```
/// use civic_map_core::BoundingBox;
///
/// # fn main() -> Result<(), civic_map_core::BoundingBoxError> {
/// let bbox = BoundingBox::new(-25.35, -57.70, -25.25, -57.55)?;
/// assert!(bbox.contains(-25.30, -57.60));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BoundingBox {
    south: f64,
    west: f64,
    north: f64,
    east: f64,
}

/// Errors returned by [`BoundingBox::new`].
#[derive(Debug, Error, PartialEq)]
pub enum BoundingBoxError {
    /// One of the edges was NaN or infinite.
    #[error("bounding box edges must be finite")]
    NonFinite,
    /// A latitude fell outside `[-90, 90]` or a longitude outside `[-180, 180]`.
    #[error("bounding box edge out of range: {edge} = {value}")]
    OutOfRange {
        /// Name of the offending edge.
        edge: &'static str,
        /// Value supplied for the edge.
        value: f64,
    },
    /// `south` was not strictly below `north`.
    #[error("south ({south}) must be less than north ({north})")]
    InvertedLatitude {
        /// Southern edge.
        south: f64,
        /// Northern edge.
        north: f64,
    },
    /// `west` was not strictly below `east`.
    #[error("west ({west}) must be less than east ({east})")]
    InvertedLongitude {
        /// Western edge.
        west: f64,
        /// Eastern edge.
        east: f64,
    },
    /// A textual box did not contain four comma-separated numbers.
    #[error("expected `south,west,north,east`, got {input:?}")]
    Malformed {
        /// The rejected input.
        input: String,
    },
}

impl BoundingBox {
    /// The whole Web Mercator world.
    pub const WORLD: Self = Self {
        south: -crate::viewport::MAX_LATITUDE,
        west: -180.0,
        north: crate::viewport::MAX_LATITUDE,
        east: 180.0,
    };

    /// Validates and constructs a [`BoundingBox`].
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Result<Self, BoundingBoxError> {
        if ![south, west, north, east].iter().all(|v| v.is_finite()) {
            return Err(BoundingBoxError::NonFinite);
        }
        for (edge, value) in [("south", south), ("north", north)] {
            if !(-90.0..=90.0).contains(&value) {
                return Err(BoundingBoxError::OutOfRange { edge, value });
            }
        }
        for (edge, value) in [("west", west), ("east", east)] {
            if !(-180.0..=180.0).contains(&value) {
                return Err(BoundingBoxError::OutOfRange { edge, value });
            }
        }
        if south >= north {
            return Err(BoundingBoxError::InvertedLatitude { south, north });
        }
        if west >= east {
            return Err(BoundingBoxError::InvertedLongitude { west, east });
        }
        Ok(Self {
            south,
            west,
            north,
            east,
        })
    }

    /// Box spanning two projected corners, clamped to the Web Mercator
    /// range. Corners may be given in either order.
    pub(crate) fn spanning(a: Coord<f64>, b: Coord<f64>) -> Self {
        let lat = |v: f64| {
            v.clamp(
                -crate::viewport::MAX_LATITUDE,
                crate::viewport::MAX_LATITUDE,
            )
        };
        let lon = |v: f64| v.clamp(-180.0, 180.0);
        Self {
            south: lat(a.y.min(b.y)),
            west: lon(a.x.min(b.x)),
            north: lat(a.y.max(b.y)),
            east: lon(a.x.max(b.x)),
        }
    }

    /// Southern edge in degrees latitude.
    #[must_use]
    pub const fn south(&self) -> f64 {
        self.south
    }

    /// Western edge in degrees longitude.
    #[must_use]
    pub const fn west(&self) -> f64 {
        self.west
    }

    /// Northern edge in degrees latitude.
    #[must_use]
    pub const fn north(&self) -> f64 {
        self.north
    }

    /// Eastern edge in degrees longitude.
    #[must_use]
    pub const fn east(&self) -> f64 {
        self.east
    }

    /// Whether the point lies inside the box, edges included.
    #[must_use]
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        (self.south..=self.north).contains(&lat) && (self.west..=self.east).contains(&lon)
    }

    /// Overpass bbox filter: `south,west,north,east`.
    #[must_use]
    pub fn to_overpass(&self) -> String {
        format!("{},{},{},{}", self.south, self.west, self.north, self.east)
    }
}

impl From<BoundingBox> for Rect<f64> {
    fn from(bbox: BoundingBox) -> Self {
        Rect::new(
            Coord {
                x: bbox.west,
                y: bbox.south,
            },
            Coord {
                x: bbox.east,
                y: bbox.north,
            },
        )
    }
}

impl TryFrom<Rect<f64>> for BoundingBox {
    type Error = BoundingBoxError;

    fn try_from(rect: Rect<f64>) -> Result<Self, Self::Error> {
        let min = rect.min();
        let max = rect.max();
        Self::new(min.y, min.x, max.y, max.x)
    }
}

impl std::str::FromStr for BoundingBox {
    type Err = BoundingBoxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || BoundingBoxError::Malformed {
            input: s.to_owned(),
        };
        let values = s
            .split(',')
            .map(|part| part.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| malformed())?;
        match values.as_slice() {
            [south, west, north, east] => Self::new(*south, *west, *north, *east),
            _ => Err(malformed()),
        }
    }
}
