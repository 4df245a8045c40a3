//! Typed view over the OpenStreetMap tags the viewer understands.
//!
//! Raw Overpass elements carry a free-form `key → value` map. It is parsed
//! once into [`PoiTags`] so classification can match on fields instead of
//! repeating string lookups.

use std::collections::HashMap;

/// A recyclable material advertised via `recycling:<material>=yes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RecyclingMaterial {
    Glass,
    Paper,
    Plastic,
    Metal,
    Batteries,
    Tyres,
}

impl RecyclingMaterial {
    /// Every material, in display order.
    pub const ALL: [Self; 6] = [
        Self::Glass,
        Self::Paper,
        Self::Plastic,
        Self::Metal,
        Self::Batteries,
        Self::Tyres,
    ];

    /// The OSM tag key, e.g. `recycling:glass`.
    #[must_use]
    pub const fn tag_key(self) -> &'static str {
        match self {
            Self::Glass => "recycling:glass",
            Self::Paper => "recycling:paper",
            Self::Plastic => "recycling:plastic",
            Self::Metal => "recycling:metal",
            Self::Batteries => "recycling:batteries",
            Self::Tyres => "recycling:tyres",
        }
    }

    /// Human-readable label used in popups.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Glass => "glass",
            Self::Paper => "paper/cardboard",
            Self::Plastic => "plastic",
            Self::Metal => "metal/cans",
            Self::Batteries => "batteries",
            Self::Tyres => "tyres",
        }
    }
}

/// The subset of OSM tags relevant to classification and popups.
///
/// # Examples
/// ```
/// use std::collections::HashMap;
/// use civic_map_core::{PoiTags, RecyclingMaterial};
///
/// let tags = PoiTags::from_raw(&HashMap::from([
///     ("amenity".to_string(), "recycling".to_string()),
///     ("recycling:glass".to_string(), "yes".to_string()),
/// ]));
/// assert_eq!(tags.amenity.as_deref(), Some("recycling"));
/// assert_eq!(tags.recycling, vec![RecyclingMaterial::Glass]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoiTags {
    pub name: Option<String>,
    pub amenity: Option<String>,
    pub leisure: Option<String>,
    pub shop: Option<String>,
    pub operator: Option<String>,
    /// Materials tagged `yes`, in [`RecyclingMaterial::ALL`] order.
    pub recycling: Vec<RecyclingMaterial>,
}

impl PoiTags {
    /// Parse the raw tag map. Unknown keys are ignored and empty values are
    /// treated as absent.
    #[must_use]
    pub fn from_raw(raw: &HashMap<String, String>) -> Self {
        let field = |key: &str| {
            raw.get(key)
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
                .map(str::to_owned)
        };
        let recycling = RecyclingMaterial::ALL
            .into_iter()
            .filter(|material| raw.get(material.tag_key()).is_some_and(|v| v == "yes"))
            .collect();
        Self {
            name: field("name"),
            amenity: field("amenity"),
            leisure: field("leisure"),
            shop: field("shop"),
            operator: field("operator"),
            recycling,
        }
    }

    /// True when `amenity` equals any of `values`.
    #[must_use]
    pub fn amenity_is(&self, values: &[&str]) -> bool {
        self.amenity
            .as_deref()
            .is_some_and(|amenity| values.contains(&amenity))
    }

    /// True when any `recycling:<material>=yes` tag is present.
    #[must_use]
    pub fn has_recycling_material(&self) -> bool {
        !self.recycling.is_empty()
    }
}

impl From<&HashMap<String, String>> for PoiTags {
    fn from(raw: &HashMap<String, String>) -> Self {
        Self::from_raw(raw)
    }
}
