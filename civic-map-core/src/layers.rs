//! Marker layers and the safety heat surface built from one refresh.
//!
//! Each category owns exactly one [`Layer`] in a fixed-size [`LayerTable`].
//! The heat surface is derived from every point with a positive safety
//! weight, normalised by the largest weight present in the same fetch, so
//! intensities are relative to the current viewport rather than absolute.

use std::ops::{Index, IndexMut};

use geo::Coord;

use crate::category::Category;
use crate::classify::{ClassifiedPoint, MarkerStyle};

/// A rendered marker: one per classified point in a layer.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Marker {
    pub point_id: u64,
    pub location: Coord<f64>,
    pub title: String,
    pub style: MarkerStyle,
    pub popup_html: String,
}

/// All markers of one category.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Layer {
    category: Category,
    markers: Vec<Marker>,
}

impl Layer {
    /// An empty layer for `category`.
    #[must_use]
    pub const fn new(category: Category) -> Self {
        Self {
            category,
            markers: Vec::new(),
        }
    }

    /// Category this layer holds.
    #[must_use]
    pub const fn category(&self) -> Category {
        self.category
    }

    /// Markers in insertion order.
    #[must_use]
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Number of markers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// True when the layer holds no markers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Remove every marker.
    pub fn clear(&mut self) {
        self.markers.clear();
    }

    fn push(&mut self, marker: Marker) {
        self.markers.push(marker);
    }
}

/// Fixed-size table holding one [`Layer`] per [`Category`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LayerTable([Layer; Category::COUNT]);

impl Default for LayerTable {
    fn default() -> Self {
        Self(Category::ALL.map(Layer::new))
    }
}

impl LayerTable {
    /// Iterate layers in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        self.0.iter()
    }

    /// Empty every layer.
    pub fn clear(&mut self) {
        self.0.iter_mut().for_each(Layer::clear);
    }

    /// Total markers across all layers.
    #[must_use]
    pub fn total_markers(&self) -> usize {
        self.0.iter().map(Layer::len).sum()
    }
}

impl Index<Category> for LayerTable {
    type Output = Layer;

    fn index(&self, category: Category) -> &Self::Output {
        &self.0[category.index()]
    }
}

impl IndexMut<Category> for LayerTable {
    fn index_mut(&mut self, category: Category) -> &mut Self::Output {
        &mut self.0[category.index()]
    }
}

/// One weighted heat sample.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct HeatPoint {
    pub location: Coord<f64>,
    /// Normalised intensity in `(0, 1]`.
    pub intensity: f64,
}

/// Rendering options for the heat overlay.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct HeatOptions {
    pub radius: u32,
    pub blur: u32,
    pub max_zoom: u8,
    pub min_opacity: f64,
    /// `(stop, colour)` pairs in ascending stop order.
    pub gradient: Vec<(f64, &'static str)>,
}

impl Default for HeatOptions {
    fn default() -> Self {
        Self {
            radius: 30,
            blur: 20,
            max_zoom: 18,
            min_opacity: 0.25,
            gradient: vec![
                (0.1, "#22c55e"),
                (0.4, "#facc15"),
                (0.7, "#f97316"),
                (1.0, "#ef4444"),
            ],
        }
    }
}

/// Weighted density overlay derived from safety weights.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct HeatSurface {
    pub points: Vec<HeatPoint>,
    pub options: HeatOptions,
}

impl HeatSurface {
    /// Build the surface from classified points, or `None` when no point
    /// carries a positive weight.
    #[must_use]
    pub fn from_points(points: &[ClassifiedPoint]) -> Option<Self> {
        let weighted: Vec<&ClassifiedPoint> =
            points.iter().filter(|p| p.safety_weight > 0.0).collect();
        if weighted.is_empty() {
            return None;
        }
        let weights: Vec<f64> = weighted.iter().map(|p| p.safety_weight).collect();
        let points = weighted
            .iter()
            .zip(normalise_weights(&weights))
            .map(|(point, intensity)| HeatPoint {
                location: point.location,
                intensity,
            })
            .collect();
        Some(Self {
            points,
            options: HeatOptions::default(),
        })
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when the surface has no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Scale weights by their maximum, clamped to at most `1.0`.
///
/// Non-positive maxima leave nothing to scale against and yield zeros.
///
/// # Examples
/// ```
/// use civic_map_core::normalise_weights;
///
/// assert_eq!(normalise_weights(&[0.4, 0.8]), vec![0.5, 1.0]);
/// assert_eq!(normalise_weights(&[0.4, 1.0, 0.2]), vec![0.4, 1.0, 0.2]);
/// ```
#[must_use]
pub fn normalise_weights(weights: &[f64]) -> Vec<f64> {
    let max = weights.iter().copied().fold(0.0_f64, f64::max);
    if max <= 0.0 {
        return vec![0.0; weights.len()];
    }
    weights.iter().map(|w| (w / max).min(1.0)).collect()
}

/// Layers and heat surface produced by one refresh.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Aggregation {
    pub layers: LayerTable,
    pub heat: Option<HeatSurface>,
}

/// Group classified points into category layers and build the heat surface.
#[must_use]
pub fn aggregate(points: &[ClassifiedPoint]) -> Aggregation {
    let mut layers = LayerTable::default();
    for point in points {
        let (Some(category), Some(style)) = (point.category, point.marker) else {
            continue;
        };
        layers[category].push(Marker {
            point_id: point.id,
            location: point.location,
            title: point.display_name.clone(),
            style,
            popup_html: point.popup.to_html(),
        });
    }
    Aggregation {
        layers,
        heat: HeatSurface::from_points(points),
    }
}
