//! The visible map rectangle, derived from centre, zoom and pixel size.
//!
//! Bounds follow the Web Mercator tiling scheme (256 px tiles) used by
//! OpenStreetMap base layers, so the box matches what a slippy map of the
//! same size would show.

use std::f64::consts::PI;

use geo::Coord;

use crate::bbox::BoundingBox;

/// Edge length of a map tile in pixels.
pub const TILE_SIZE: f64 = 256.0;

/// Latitude limit of the Web Mercator projection.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Highest zoom level served by the base tiles.
pub const MAX_ZOOM: u8 = 19;

/// Pixel dimensions of the map container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewportSize {
    pub width: u32,
    pub height: u32,
}

impl Default for ViewportSize {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
        }
    }
}

/// Centre, zoom and size of the map view.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use civic_map_core::{Viewport, ViewportSize};
///
/// let view = Viewport::new(Coord { x: -57.6498, y: -25.2969 }, 13, ViewportSize::default());
/// let bounds = view.bounds();
/// assert!(bounds.contains(-25.2969, -57.6498));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Viewport {
    center: Coord<f64>,
    zoom: u8,
    size: ViewportSize,
}

impl Viewport {
    /// Construct a viewport, clamping the centre into the projectable range
    /// and the zoom to [`MAX_ZOOM`].
    #[must_use]
    pub fn new(center: Coord<f64>, zoom: u8, size: ViewportSize) -> Self {
        Self {
            center: clamp_coord(center),
            zoom: zoom.min(MAX_ZOOM),
            size,
        }
    }

    /// Centre of the view (`x = longitude`, `y = latitude`).
    #[must_use]
    pub const fn center(&self) -> Coord<f64> {
        self.center
    }

    /// Current zoom level.
    #[must_use]
    pub const fn zoom(&self) -> u8 {
        self.zoom
    }

    /// Container size in pixels.
    #[must_use]
    pub const fn size(&self) -> ViewportSize {
        self.size
    }

    /// Move to `center` at `zoom`, keeping the container size.
    pub fn set_view(&mut self, center: Coord<f64>, zoom: u8) {
        *self = Self::new(center, zoom, self.size);
    }

    /// Resize the container.
    pub fn resize(&mut self, size: ViewportSize) {
        self.size = size;
    }

    /// Geographic rectangle currently visible.
    #[must_use]
    pub fn bounds(&self) -> BoundingBox {
        let world = world_size(self.zoom);
        let (cx, cy) = project(self.center, world);
        let half_w = f64::from(self.size.width.max(1)) / 2.0;
        let half_h = f64::from(self.size.height.max(1)) / 2.0;
        let north_west = unproject(cx - half_w, cy - half_h, world);
        let south_east = unproject(cx + half_w, cy + half_h, world);
        BoundingBox::spanning(south_east, north_west)
    }
}

fn clamp_coord(coord: Coord<f64>) -> Coord<f64> {
    let finite = |v: f64| if v.is_finite() { v } else { 0.0 };
    Coord {
        x: finite(coord.x).clamp(-180.0, 180.0),
        y: finite(coord.y).clamp(-MAX_LATITUDE, MAX_LATITUDE),
    }
}

fn world_size(zoom: u8) -> f64 {
    TILE_SIZE * 2.0_f64.powi(i32::from(zoom))
}

fn project(coord: Coord<f64>, world: f64) -> (f64, f64) {
    let sin = coord.y.to_radians().sin();
    let x = (coord.x + 180.0) / 360.0 * world;
    let y = (0.5 - ((1.0 + sin) / (1.0 - sin)).ln() / (4.0 * PI)) * world;
    (x, y)
}

fn unproject(x: f64, y: f64, world: f64) -> Coord<f64> {
    let x = x.clamp(0.0, world);
    let y = y.clamp(0.0, world);
    let n = PI - 2.0 * PI * y / world;
    Coord {
        x: x / world * 360.0 - 180.0,
        y: n.sinh().atan().to_degrees(),
    }
}
