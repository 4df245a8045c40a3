use thiserror::Error;

/// Errors from [`crate::source::GeodataSource::fetch_points`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeodataError {
    /// The service answered with a non-success status.
    #[error("request to {url} failed with status {status}: {message}")]
    Http {
        /// Request URL without the query payload.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Short description of the failure.
        message: String,
    },
    /// The request did not complete within the configured timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Request URL without the query payload.
        url: String,
        /// Timeout that elapsed.
        timeout_secs: u64,
    },
    /// The request failed before a response arrived.
    #[error("network error contacting {url}: {message}")]
    Network {
        /// Request URL without the query payload.
        url: String,
        /// Transport error description.
        message: String,
    },
    /// The response body was not a well-formed element list.
    #[error("failed to parse geodata response: {message}")]
    Parse {
        /// Parser error description.
        message: String,
    },
}

/// Errors from [`crate::source::Geocoder::geocode`].
///
/// An empty result is not an error; geocoders return `Ok(None)` instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeocodeError {
    /// The service answered with a non-success status.
    #[error("geocoding request to {url} failed with status {status}: {message}")]
    Http {
        /// Request URL without the query payload.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Short description of the failure.
        message: String,
    },
    /// The request did not complete within the configured timeout.
    #[error("geocoding request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Request URL without the query payload.
        url: String,
        /// Timeout that elapsed.
        timeout_secs: u64,
    },
    /// The request failed before a response arrived.
    #[error("network error contacting {url}: {message}")]
    Network {
        /// Request URL without the query payload.
        url: String,
        /// Transport error description.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("failed to parse geocoding response: {message}")]
    Parse {
        /// Parser error description.
        message: String,
    },
}
