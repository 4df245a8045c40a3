//! Point-of-interest categories and the layer keys users can toggle.
//!
//! The enum gives every category a fixed slot, so per-category state can live
//! in arrays indexed by [`Category::index`].
//!
//! # Examples
//! ```
//! use civic_map_core::Category;
//!
//! assert_eq!(Category::Police.as_str(), "police");
//! assert_eq!(Category::Fire.to_string(), "fire");
//! assert_eq!(Category::Police.base_weight(), 1.0);
//! ```

/// One of the seven civic amenity classes the viewer recognises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Category {
    /// Hospitals and clinics.
    Hospital,
    /// Police stations.
    Police,
    /// Fire stations.
    Fire,
    /// Parks and plazas.
    Park,
    /// Supermarkets.
    Supermarket,
    /// Schools, kindergartens, colleges and universities.
    School,
    /// Recycling points.
    Recycling,
}

impl Category {
    /// Number of categories.
    pub const COUNT: usize = 7;

    /// Every category in enumeration order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Hospital,
        Self::Police,
        Self::Fire,
        Self::Park,
        Self::Supermarket,
        Self::School,
        Self::Recycling,
    ];

    /// Return the category key as a lowercase `&str`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hospital => "hospital",
            Self::Police => "police",
            Self::Fire => "fire",
            Self::Park => "park",
            Self::Supermarket => "supermarket",
            Self::School => "school",
            Self::Recycling => "recycling",
        }
    }

    /// Slot of this category in fixed-size tables.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Label shown in marker popups.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Hospital => "Hospital / Clinic",
            Self::Police => "Police",
            Self::Fire => "Fire station",
            Self::Park => "Park / plaza",
            Self::Supermarket => "Supermarket",
            Self::School => "Educational centre",
            Self::Recycling => "Recycling centre",
        }
    }

    /// Label shown on the layer toggle and in the active-layers summary.
    #[must_use]
    pub const fn layer_label(self) -> &'static str {
        match self {
            Self::Hospital => "Hospitals",
            Self::Police => "Police",
            Self::Fire => "Fire stations",
            Self::Park => "Parks",
            Self::Supermarket => "Supermarkets",
            Self::School => "Schools",
            Self::Recycling => "Recycling",
        }
    }

    /// Marker glyph: a letter or an emoji.
    #[must_use]
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Hospital => "H",
            Self::Police => "P",
            Self::Fire => "B",
            Self::Park => "🌳",
            Self::Supermarket => "S",
            Self::School => "🏫",
            Self::Recycling => "♻️",
        }
    }

    /// Whether [`Self::glyph`] is an emoji rather than a letter.
    #[must_use]
    pub const fn glyph_is_emoji(self) -> bool {
        matches!(self, Self::Park | Self::School | Self::Recycling)
    }

    /// Marker fill colour as a CSS hex string.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Hospital => "#ef4444",
            Self::Police => "#3b82f6",
            Self::Fire => "#f97316",
            Self::Park | Self::Recycling => "#22c55e",
            Self::Supermarket => "#eab308",
            Self::School => "#38bdf8",
        }
    }

    /// Contribution of one point of this category to the safety heat surface.
    #[must_use]
    pub const fn base_weight(self) -> f64 {
        match self {
            Self::Hospital => 0.4,
            Self::Police => 1.0,
            Self::Fire => 0.8,
            Self::Park | Self::Supermarket => 0.2,
            Self::School => 0.3,
            Self::Recycling => 0.25,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown category '{s}'"))
    }
}

/// A toggleable layer: one per category plus the derived heat surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LayerKey {
    /// Markers of a single category.
    Category(Category),
    /// The safety heat surface.
    Heat,
}

impl LayerKey {
    /// Every key: categories in enumeration order, then heat.
    pub const ALL: [Self; Category::COUNT + 1] = [
        Self::Category(Category::Hospital),
        Self::Category(Category::Police),
        Self::Category(Category::Fire),
        Self::Category(Category::Park),
        Self::Category(Category::Supermarket),
        Self::Category(Category::School),
        Self::Category(Category::Recycling),
        Self::Heat,
    ];

    /// Return the key as used on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Category(category) => category.as_str(),
            Self::Heat => "heat",
        }
    }

    /// Label used in the active-layers summary.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Category(category) => category.layer_label(),
            Self::Heat => "Zone safety",
        }
    }
}

impl From<Category> for LayerKey {
    fn from(category: Category) -> Self {
        Self::Category(category)
    }
}

impl std::fmt::Display for LayerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LayerKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("heat") {
            return Ok(Self::Heat);
        }
        s.parse::<Category>()
            .map(Self::Category)
            .map_err(|_| format!("unknown layer '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    #[test]
    fn display_matches_as_str() {
        assert_eq!(Category::Supermarket.to_string(), Category::Supermarket.as_str());
    }

    #[test]
    fn indices_follow_enumeration_order() {
        for (position, category) in Category::ALL.into_iter().enumerate() {
            assert_eq!(category.index(), position);
        }
    }

    #[rstest]
    #[case(Category::Hospital, 0.4)]
    #[case(Category::Police, 1.0)]
    #[case(Category::Fire, 0.8)]
    #[case(Category::Park, 0.2)]
    #[case(Category::Supermarket, 0.2)]
    #[case(Category::School, 0.3)]
    #[case(Category::Recycling, 0.25)]
    fn base_weights(#[case] category: Category, #[case] weight: f64) {
        assert_eq!(category.base_weight(), weight);
    }

    #[test]
    fn parsing_rejects_unknown() {
        let err = Category::from_str("museum").unwrap_err();
        assert!(err.contains("unknown category"));
    }

    #[rstest]
    #[case("heat", LayerKey::Heat)]
    #[case("Police", LayerKey::Category(Category::Police))]
    fn layer_keys_parse(#[case] input: &str, #[case] expected: LayerKey) {
        assert_eq!(LayerKey::from_str(input), Ok(expected));
    }
}
