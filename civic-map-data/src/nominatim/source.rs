//! HTTP-based `Geocoder` backed by a Nominatim search endpoint.

use std::time::Duration;

use async_trait::async_trait;
use civic_map_core::{GeocodeError, GeocodedPlace, Geocoder};
use log::debug;
use reqwest::Client;
use reqwest::header::ACCEPT_LANGUAGE;
use url::Url;

use super::response::SearchResult;
use crate::http::{
    DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, Failure, ProviderBuildError, build_client, parse_endpoint,
};

/// Public OpenStreetMap Nominatim search endpoint.
pub const DEFAULT_NOMINATIM_ENDPOINT: &str = "https://nominatim.openstreetmap.org/search";

/// Preferred language for result names.
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "es";

/// Configuration for [`HttpNominatimGeocoder`].
#[derive(Debug, Clone)]
pub struct HttpNominatimGeocoderConfig {
    /// Search endpoint URL.
    pub endpoint: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests. Nominatim rejects anonymous clients.
    pub user_agent: String,
    /// Value of the `Accept-Language` header.
    pub accept_language: String,
}

impl Default for HttpNominatimGeocoderConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_NOMINATIM_ENDPOINT.to_owned(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_owned(),
        }
    }
}

impl HttpNominatimGeocoderConfig {
    /// Create a configuration for the given search endpoint.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the preferred result language.
    #[must_use]
    pub fn with_accept_language(mut self, language: impl Into<String>) -> Self {
        self.accept_language = language.into();
        self
    }
}

/// Nominatim adapter requesting the single best match.
#[derive(Debug)]
pub struct HttpNominatimGeocoder {
    client: Client,
    endpoint: Url,
    config: HttpNominatimGeocoderConfig,
}

impl HttpNominatimGeocoder {
    /// Create a geocoder for `endpoint` with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not an absolute URL or the HTTP
    /// client fails to build.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpNominatimGeocoderConfig::new(endpoint))
    }

    /// Create a geocoder with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not an absolute URL or the HTTP
    /// client fails to build.
    pub fn with_config(config: HttpNominatimGeocoderConfig) -> Result<Self, ProviderBuildError> {
        let endpoint = parse_endpoint(&config.endpoint)?;
        let client = build_client(&config.user_agent, config.timeout)?;
        Ok(Self {
            client,
            endpoint,
            config,
        })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &HttpNominatimGeocoderConfig {
        &self.config
    }

    /// Build the search URL: `{endpoint}?format=json&limit=1&q={query}`.
    fn search_url(&self, query: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("format", "json")
            .append_pair("limit", "1")
            .append_pair("q", query);
        url
    }

    fn convert_reqwest_error(&self, error: reqwest::Error) -> GeocodeError {
        let url = self.endpoint.to_string();
        match Failure::from(error) {
            Failure::Timeout => GeocodeError::Timeout {
                url,
                timeout_secs: self.config.timeout.as_secs(),
            },
            Failure::Status { status, message } => GeocodeError::Http {
                url,
                status,
                message,
            },
            Failure::Network { message } => GeocodeError::Network { url, message },
        }
    }
}

#[async_trait(?Send)]
impl Geocoder for HttpNominatimGeocoder {
    async fn geocode(&self, query: &str) -> Result<Option<GeocodedPlace>, GeocodeError> {
        debug!("geocoding {query:?} via {}", self.endpoint);

        let body = self
            .client
            .get(self.search_url(query))
            .header(ACCEPT_LANGUAGE, self.config.accept_language.as_str())
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(err))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(err))?
            .bytes()
            .await
            .map_err(|err| self.convert_reqwest_error(err))?;

        let results: Vec<SearchResult> =
            serde_json::from_slice(&body).map_err(|err| GeocodeError::Parse {
                message: err.to_string(),
            })?;
        results.into_iter().next().map(SearchResult::into_place).transpose()
    }
}
