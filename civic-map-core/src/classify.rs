//! Classification of fetched points into display categories.
//!
//! Rules are evaluated in a fixed priority order and the first match wins:
//! hospital/clinic, police, fire station, park, supermarket, the school
//! family, then recycling. Recycling matches either `amenity=recycling` or
//! any `recycling:<material>=yes` tag, so material tags never override a
//! higher-priority match on the same node.

use std::collections::HashSet;

use geo::Coord;
use log::debug;

use crate::category::Category;
use crate::poi::RawPoint;
use crate::tags::PoiTags;

/// Placeholder used when a point carries no `name` tag.
pub const UNNAMED: &str = "No name";

/// A single first-match classification rule.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    /// Category assigned when the predicate holds.
    pub category: Category,
    /// Tag predicate.
    pub matches: fn(&PoiTags) -> bool,
}

/// Classification rules in priority order.
pub const RULES: [Rule; Category::COUNT] = [
    Rule {
        category: Category::Hospital,
        matches: is_hospital,
    },
    Rule {
        category: Category::Police,
        matches: is_police,
    },
    Rule {
        category: Category::Fire,
        matches: is_fire_station,
    },
    Rule {
        category: Category::Park,
        matches: is_park,
    },
    Rule {
        category: Category::Supermarket,
        matches: is_supermarket,
    },
    Rule {
        category: Category::School,
        matches: is_school,
    },
    Rule {
        category: Category::Recycling,
        matches: is_recycling,
    },
];

fn is_hospital(tags: &PoiTags) -> bool {
    tags.amenity_is(&["hospital", "clinic"])
}

fn is_police(tags: &PoiTags) -> bool {
    tags.amenity_is(&["police"])
}

fn is_fire_station(tags: &PoiTags) -> bool {
    tags.amenity_is(&["fire_station"])
}

fn is_park(tags: &PoiTags) -> bool {
    tags.leisure.as_deref() == Some("park")
}

fn is_supermarket(tags: &PoiTags) -> bool {
    tags.shop.as_deref() == Some("supermarket")
}

fn is_school(tags: &PoiTags) -> bool {
    tags.amenity_is(&["school", "kindergarten", "college", "university"])
}

fn is_recycling(tags: &PoiTags) -> bool {
    tags.amenity_is(&["recycling"]) || tags.has_recycling_material()
}

/// Return the category of the first rule matching `tags`.
#[must_use]
pub fn match_category(tags: &PoiTags) -> Option<Category> {
    RULES
        .iter()
        .find(|rule| (rule.matches)(tags))
        .map(|rule| rule.category)
}

/// Visual style of a point's marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MarkerStyle {
    pub glyph: &'static str,
    pub color: &'static str,
    pub emoji: bool,
}

impl MarkerStyle {
    /// Style for markers of `category`.
    #[must_use]
    pub const fn for_category(category: Category) -> Self {
        Self {
            glyph: category.glyph(),
            color: category.color(),
            emoji: category.glyph_is_emoji(),
        }
    }

    /// Render the marker pin as an inline 24×24 SVG.
    #[must_use]
    pub fn to_svg(&self) -> String {
        let text = if self.emoji {
            format!(
                r#"<text x="12" y="15" font-size="12" text-anchor="middle">{}</text>"#,
                self.glyph
            )
        } else {
            format!(
                r##"<text x="12" y="15" font-size="11" text-anchor="middle" fill="#0b1120" font-weight="700">{}</text>"##,
                self.glyph
            )
        };
        format!(
            concat!(
                r#"<svg width="24" height="24" viewBox="0 0 24 24">"#,
                r#"<path d="M12 1.5C7.86 1.5 4.5 4.86 4.5 9c0 4.86 6 9.75 7.02 10.54.29.22.68.22.97 0C13.5 18.75 19.5 13.86 19.5 9c0-4.14-3.36-7.5-7.5-7.5z" "#,
                r##"fill="{color}" stroke="#0b1120" stroke-width="1"/>{text}</svg>"##
            ),
            color = self.color,
            text = text,
        )
    }
}

/// Popup content bound to a marker.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Popup {
    pub name: String,
    pub category_label: Option<&'static str>,
    /// `Recycling of: …`, present only for recycling points with materials.
    pub materials: Option<String>,
    pub operator: Option<String>,
}

impl Popup {
    fn build(tags: &PoiTags, category: Option<Category>) -> Self {
        let materials = match category {
            Some(Category::Recycling) => materials_line(tags),
            _ => None,
        };
        Self {
            name: display_name(tags),
            category_label: category.map(Category::label),
            materials,
            operator: tags.operator.clone(),
        }
    }

    /// Lines of the popup, top to bottom.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![self.name.clone()];
        lines.extend(self.category_label.map(str::to_owned));
        lines.extend(self.materials.clone());
        lines.extend(self.operator.as_ref().map(|op| format!("Operator: {op}")));
        lines
    }

    /// Plain-text description with one line per field.
    #[must_use]
    pub fn to_text(&self) -> String {
        self.lines().join("\n")
    }

    /// HTML fragment for map popups; every value is escaped.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut html = format!("<strong>{}</strong>", escape_html(&self.name));
        for line in self.lines().iter().skip(1) {
            html.push_str("<br/><small>");
            html.push_str(&escape_html(line));
            html.push_str("</small>");
        }
        html
    }
}

fn display_name(tags: &PoiTags) -> String {
    tags.name.clone().unwrap_or_else(|| UNNAMED.to_owned())
}

fn materials_line(tags: &PoiTags) -> Option<String> {
    if tags.recycling.is_empty() {
        return None;
    }
    let labels: Vec<&str> = tags.recycling.iter().map(|m| m.label()).collect();
    Some(format!("Recycling of: {}", labels.join(", ")))
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// A point after classification, ready for aggregation into layers.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ClassifiedPoint {
    pub id: u64,
    /// `None` when no rule matched; such points join no layer.
    pub category: Option<Category>,
    pub display_name: String,
    /// Base weight of the category, or `0.0` when unclassified.
    pub safety_weight: f64,
    pub location: Coord<f64>,
    pub marker: Option<MarkerStyle>,
    pub popup: Popup,
}

/// Classify a single point.
///
/// # Examples
/// ```
/// use std::collections::HashMap;
/// use geo::Coord;
/// use civic_map_core::{Category, RawPoint, classify};
///
/// let point = RawPoint::from_raw_tags(
///     1,
///     Coord { x: -57.6, y: -25.3 },
///     &HashMap::from([("amenity".into(), "fire_station".into())]),
/// );
/// let classified = classify(&point);
/// assert_eq!(classified.category, Some(Category::Fire));
/// assert_eq!(classified.safety_weight, 0.8);
/// assert_eq!(classified.display_name, "No name");
/// ```
#[must_use]
pub fn classify(point: &RawPoint) -> ClassifiedPoint {
    let category = match_category(&point.tags);
    ClassifiedPoint {
        id: point.id,
        category,
        display_name: display_name(&point.tags),
        safety_weight: category.map_or(0.0, Category::base_weight),
        location: point.location,
        marker: category.map(MarkerStyle::for_category),
        popup: Popup::build(&point.tags, category),
    }
}

/// Classify every point of one fetch, skipping repeated ids.
#[must_use]
pub fn classify_all(points: &[RawPoint]) -> Vec<ClassifiedPoint> {
    let mut seen = HashSet::with_capacity(points.len());
    let classified: Vec<ClassifiedPoint> = points
        .iter()
        .filter(|point| seen.insert(point.id))
        .map(classify)
        .collect();
    debug!(
        "classified {} of {} fetched points",
        classified.iter().filter(|p| p.category.is_some()).count(),
        points.len()
    );
    classified
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::RecyclingMaterial;
    use rstest::rstest;

    fn point(tags: PoiTags) -> RawPoint {
        RawPoint::new(1, Coord { x: -57.6, y: -25.3 }, tags)
    }

    fn amenity(value: &str) -> PoiTags {
        PoiTags {
            amenity: Some(value.to_owned()),
            ..PoiTags::default()
        }
    }

    #[rstest]
    #[case(amenity("hospital"), Category::Hospital)]
    #[case(amenity("clinic"), Category::Hospital)]
    #[case(amenity("police"), Category::Police)]
    #[case(amenity("fire_station"), Category::Fire)]
    #[case(PoiTags { leisure: Some("park".into()), ..PoiTags::default() }, Category::Park)]
    #[case(PoiTags { shop: Some("supermarket".into()), ..PoiTags::default() }, Category::Supermarket)]
    #[case(amenity("school"), Category::School)]
    #[case(amenity("kindergarten"), Category::School)]
    #[case(amenity("college"), Category::School)]
    #[case(amenity("university"), Category::School)]
    #[case(amenity("recycling"), Category::Recycling)]
    #[case(PoiTags { recycling: vec![RecyclingMaterial::Batteries], ..PoiTags::default() }, Category::Recycling)]
    fn single_rule_matches(#[case] tags: PoiTags, #[case] expected: Category) {
        let classified = classify(&point(tags));
        assert_eq!(classified.category, Some(expected));
        assert_eq!(classified.safety_weight, expected.base_weight());
        assert_eq!(classified.marker, Some(MarkerStyle::for_category(expected)));
    }

    #[rstest]
    fn higher_priority_rule_wins() {
        let tags = PoiTags {
            amenity: Some("police".into()),
            shop: Some("supermarket".into()),
            recycling: vec![RecyclingMaterial::Glass],
            ..PoiTags::default()
        };
        assert_eq!(classify(&point(tags)).category, Some(Category::Police));
    }

    #[rstest]
    fn park_outranks_recycling_materials() {
        let tags = PoiTags {
            leisure: Some("park".into()),
            recycling: vec![RecyclingMaterial::Plastic],
            ..PoiTags::default()
        };
        let classified = classify(&point(tags));
        assert_eq!(classified.category, Some(Category::Park));
        assert!(classified.popup.materials.is_none());
    }

    #[rstest]
    fn unmatched_point_has_no_category_or_weight() {
        let classified = classify(&point(amenity("bench")));
        assert_eq!(classified.category, None);
        assert_eq!(classified.safety_weight, 0.0);
        assert!(classified.marker.is_none());
        assert!(classified.popup.category_label.is_none());
    }

    #[rstest]
    fn popup_lists_materials_and_operator() {
        let tags = PoiTags {
            name: Some("Punto Limpio".into()),
            amenity: Some("recycling".into()),
            operator: Some("Municipalidad".into()),
            recycling: vec![RecyclingMaterial::Glass, RecyclingMaterial::Paper],
            ..PoiTags::default()
        };
        let popup = classify(&point(tags)).popup;
        assert_eq!(
            popup.to_text(),
            "Punto Limpio\nRecycling centre\nRecycling of: glass, paper/cardboard\nOperator: Municipalidad"
        );
    }

    #[rstest]
    fn popup_html_escapes_values() {
        let tags = PoiTags {
            name: Some("<b>Comisaría</b> & Co".into()),
            amenity: Some("police".into()),
            ..PoiTags::default()
        };
        let html = classify(&point(tags)).popup.to_html();
        assert_eq!(
            html,
            "<strong>&lt;b&gt;Comisaría&lt;/b&gt; &amp; Co</strong><br/><small>Police</small>"
        );
    }

    #[rstest]
    fn classify_all_skips_duplicate_ids() {
        let first = RawPoint::new(9, Coord { x: 0.0, y: 0.0 }, amenity("police"));
        let second = RawPoint::new(9, Coord { x: 1.0, y: 1.0 }, amenity("hospital"));
        let classified = classify_all(&[first, second]);
        assert_eq!(classified.len(), 1);
        assert_eq!(classified[0].category, Some(Category::Police));
    }

    #[rstest]
    fn svg_marker_uses_colour_and_glyph() {
        let svg = MarkerStyle::for_category(Category::Police).to_svg();
        assert!(svg.contains("fill=\"#3b82f6\""));
        assert!(svg.contains(">P</text>"));
        assert!(svg.contains("font-weight=\"700\""));
    }
}
