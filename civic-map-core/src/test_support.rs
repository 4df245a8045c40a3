//! In-memory sources and point builders for unit and behaviour tests.

use std::cell::RefCell;
use std::collections::HashMap;

use async_trait::async_trait;
use geo::Coord;

use crate::{
    GeocodeError, GeocodedPlace, Geocoder, GeodataError, GeodataSource, OverpassQuery, RawPoint,
};

/// Build a point at `lat`/`lon` from literal tag pairs.
#[must_use]
pub fn tagged_point(id: u64, lat: f64, lon: f64, tags: &[(&str, &str)]) -> RawPoint {
    let raw: HashMap<String, String> = tags
        .iter()
        .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
        .collect();
    RawPoint::from_raw_tags(id, Coord { x: lon, y: lat }, &raw)
}

/// `GeodataSource` returning a fixed response and recording every query.
///
/// The source ignores the query contents, returning the same points for any
/// viewport.
#[derive(Debug)]
pub struct MemorySource {
    response: Result<Vec<RawPoint>, GeodataError>,
    queries: RefCell<Vec<OverpassQuery>>,
}

impl MemorySource {
    /// A source returning `points`.
    #[must_use]
    pub fn with_points(points: Vec<RawPoint>) -> Self {
        Self {
            response: Ok(points),
            queries: RefCell::new(Vec::new()),
        }
    }

    /// A source failing with `error`.
    #[must_use]
    pub fn with_error(error: GeodataError) -> Self {
        Self {
            response: Err(error),
            queries: RefCell::new(Vec::new()),
        }
    }

    /// Queries received so far, oldest first.
    #[must_use]
    pub fn queries(&self) -> Vec<OverpassQuery> {
        self.queries.borrow().clone()
    }
}

#[async_trait(?Send)]
impl GeodataSource for MemorySource {
    async fn fetch_points(&self, query: &OverpassQuery) -> Result<Vec<RawPoint>, GeodataError> {
        self.queries.borrow_mut().push(query.clone());
        self.response.clone()
    }
}

/// `Geocoder` returning a fixed response and recording every query.
#[derive(Debug)]
pub struct StaticGeocoder {
    response: Result<Option<GeocodedPlace>, GeocodeError>,
    queries: RefCell<Vec<String>>,
}

impl StaticGeocoder {
    /// A geocoder resolving every query to `lat`/`lon`.
    #[must_use]
    pub fn found(lat: f64, lon: f64) -> Self {
        Self::with_response(Ok(Some(GeocodedPlace {
            location: Coord { x: lon, y: lat },
            display_name: None,
        })))
    }

    /// A geocoder with no result for any query.
    #[must_use]
    pub fn not_found() -> Self {
        Self::with_response(Ok(None))
    }

    /// A geocoder failing with `error`.
    #[must_use]
    pub fn failing(error: GeocodeError) -> Self {
        Self::with_response(Err(error))
    }

    fn with_response(response: Result<Option<GeocodedPlace>, GeocodeError>) -> Self {
        Self {
            response,
            queries: RefCell::new(Vec::new()),
        }
    }

    /// Queries received so far, oldest first.
    #[must_use]
    pub fn queries(&self) -> Vec<String> {
        self.queries.borrow().clone()
    }
}

#[async_trait(?Send)]
impl Geocoder for StaticGeocoder {
    async fn geocode(&self, query: &str) -> Result<Option<GeocodedPlace>, GeocodeError> {
        self.queries.borrow_mut().push(query.to_owned());
        self.response.clone()
    }
}
