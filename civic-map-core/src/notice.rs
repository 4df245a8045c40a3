//! User-facing notifications.
//!
//! Every failure the viewer surfaces collapses into one of two notices. A
//! notice is shown once and blocks until dismissed; it never aborts the
//! process.

use crate::source::{GeocodeError, GeodataError};

/// Message shown when the civic data for the viewport could not be loaded.
pub const GEODATA_FAILURE_MESSAGE: &str =
    "Could not load the civic data. Please try again in a few seconds.";

/// Message shown when an address search failed in transport.
pub const GEOCODE_FAILURE_MESSAGE: &str = "Error searching for the address. Please try again.";

/// Message shown when an address search had no result.
pub const NOT_FOUND_MESSAGE: &str = "That address was not found. Try being more specific.";

/// A blocking notification for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A geodata or geocoding request failed.
    FetchFailure {
        /// Message shown to the user.
        message: &'static str,
        /// Underlying error, for logs.
        detail: String,
    },
    /// Geocoding returned no result.
    NotFound {
        /// The query as typed by the user.
        query: String,
    },
}

impl Notice {
    /// Message shown to the user.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::FetchFailure { message, .. } => *message,
            Self::NotFound { .. } => NOT_FOUND_MESSAGE,
        }
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl From<&GeodataError> for Notice {
    fn from(error: &GeodataError) -> Self {
        Self::FetchFailure {
            message: GEODATA_FAILURE_MESSAGE,
            detail: error.to_string(),
        }
    }
}

impl From<&GeocodeError> for Notice {
    fn from(error: &GeocodeError) -> Self {
        Self::FetchFailure {
            message: GEOCODE_FAILURE_MESSAGE,
            detail: error.to_string(),
        }
    }
}
