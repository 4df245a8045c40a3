//! Compiled-in cities the viewer can jump to.

use geo::Coord;
use thiserror::Error;

/// A city offered by the jump-to selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum City {
    Asuncion,
    CiudadDelEste,
    Encarnacion,
    Villarrica,
}

/// Returned when a city key is not in the table.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown city '{key}' (expected one of: asuncion, cde, encarnacion, villarrica)")]
pub struct UnknownCityError {
    /// The rejected key.
    pub key: String,
}

impl City {
    /// Every city, in selector order.
    pub const ALL: [Self; 4] = [
        Self::Asuncion,
        Self::CiudadDelEste,
        Self::Encarnacion,
        Self::Villarrica,
    ];

    /// City shown on start-up.
    pub const INITIAL: Self = Self::Asuncion;

    /// Selector key.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Asuncion => "asuncion",
            Self::CiudadDelEste => "cde",
            Self::Encarnacion => "encarnacion",
            Self::Villarrica => "villarrica",
        }
    }

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Asuncion => "Asunción",
            Self::CiudadDelEste => "Ciudad del Este",
            Self::Encarnacion => "Encarnación",
            Self::Villarrica => "Villarrica",
        }
    }

    /// Map centre (`x = longitude`, `y = latitude`).
    #[must_use]
    pub const fn center(self) -> Coord<f64> {
        match self {
            Self::Asuncion => Coord {
                x: -57.6498,
                y: -25.2969,
            },
            Self::CiudadDelEste => Coord {
                x: -54.6111,
                y: -25.5085,
            },
            Self::Encarnacion => Coord {
                x: -55.8667,
                y: -27.3306,
            },
            Self::Villarrica => Coord {
                x: -56.4333,
                y: -25.75,
            },
        }
    }

    /// Zoom level used when jumping to the city.
    #[must_use]
    pub const fn zoom(self) -> u8 {
        match self {
            Self::Villarrica => 14,
            _ => 13,
        }
    }
}

impl std::fmt::Display for City {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for City {
    type Err = UnknownCityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        Self::ALL
            .into_iter()
            .find(|city| city.key().eq_ignore_ascii_case(key))
            .ok_or_else(|| UnknownCityError { key: key.to_owned() })
    }
}
