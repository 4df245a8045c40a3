//! Cities command: print the jump-to table.

use std::io::Write;

use civic_map_core::City;
use geo::Coord;
use serde::Serialize;

use crate::{CliError, write_json};

#[derive(Debug, Serialize)]
pub(super) struct CityEntry {
    key: &'static str,
    name: &'static str,
    center: Coord<f64>,
    zoom: u8,
}

impl From<City> for CityEntry {
    fn from(city: City) -> Self {
        Self {
            key: city.key(),
            name: city.name(),
            center: city.center(),
            zoom: city.zoom(),
        }
    }
}

pub(super) fn run_cities() -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    write_cities(&mut stdout)
}

pub(super) fn write_cities(writer: &mut dyn Write) -> Result<(), CliError> {
    let entries: Vec<CityEntry> = City::ALL.into_iter().map(CityEntry::from).collect();
    write_json(writer, &entries)
}
