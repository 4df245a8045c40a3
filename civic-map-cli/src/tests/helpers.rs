//! Stub builders and canned data shared by the CLI tests.

use super::*;
use crate::refresh::{GeodataSourceBuilder, RefreshConfig};
use crate::search::{GeocoderBuilder, SearchConfig};
use civic_map_core::test_support::{MemorySource, StaticGeocoder, tagged_point};
use civic_map_core::{GeocodeError, Geocoder, GeodataError, GeodataSource, RawPoint};
use std::cell::RefCell;

/// A police station, a hospital, a glass bank and an unclassified bench.
pub(super) fn central_points() -> Vec<RawPoint> {
    vec![
        tagged_point(1, -25.29, -57.64, &[("amenity", "police")]),
        tagged_point(2, -25.30, -57.62, &[("amenity", "hospital")]),
        tagged_point(
            3,
            -25.31,
            -57.61,
            &[("amenity", "recycling"), ("recycling:glass", "yes")],
        ),
        tagged_point(4, -25.28, -57.60, &[("amenity", "bench")]),
    ]
}

pub(super) fn overpass_timeout() -> GeodataError {
    GeodataError::Timeout {
        url: "https://overpass.test/api/interpreter".to_owned(),
        timeout_secs: 30,
    }
}

/// Serves a fixed reply and records each configuration it was built with.
#[derive(Debug)]
pub(super) struct StubGeodataSourceBuilder {
    reply: Result<Vec<RawPoint>, GeodataError>,
    pub(super) built: RefCell<Vec<RefreshConfig>>,
}

impl StubGeodataSourceBuilder {
    pub(super) fn with_points(points: Vec<RawPoint>) -> Self {
        Self {
            reply: Ok(points),
            built: RefCell::new(Vec::new()),
        }
    }

    pub(super) fn with_error(error: GeodataError) -> Self {
        Self {
            reply: Err(error),
            built: RefCell::new(Vec::new()),
        }
    }
}

impl GeodataSourceBuilder for StubGeodataSourceBuilder {
    fn build(&self, config: &RefreshConfig) -> Result<Box<dyn GeodataSource>, CliError> {
        self.built.borrow_mut().push(config.clone());
        let source = match &self.reply {
            Ok(points) => MemorySource::with_points(points.clone()),
            Err(error) => MemorySource::with_error(error.clone()),
        };
        Ok(Box::new(source))
    }
}

/// Canned geocoder replies.
#[derive(Debug, Clone)]
pub(super) enum GeocoderReply {
    Found { lat: f64, lon: f64 },
    NotFound,
    Failing(GeocodeError),
}

#[derive(Debug)]
pub(super) struct StubGeocoderBuilder {
    pub(super) reply: GeocoderReply,
}

impl GeocoderBuilder for StubGeocoderBuilder {
    fn build(&self, _config: &SearchConfig) -> Result<Box<dyn Geocoder>, CliError> {
        let geocoder = match &self.reply {
            GeocoderReply::Found { lat, lon } => StaticGeocoder::found(*lat, *lon),
            GeocoderReply::NotFound => StaticGeocoder::not_found(),
            GeocoderReply::Failing(error) => StaticGeocoder::failing(error.clone()),
        };
        Ok(Box::new(geocoder))
    }
}

/// Parse a command's captured stdout as JSON.
pub(super) fn stdout_json(stdout: &[u8]) -> serde_json::Value {
    let text = std::str::from_utf8(stdout).expect("stdout utf-8");
    serde_json::from_str(text).expect("output should be JSON")
}
