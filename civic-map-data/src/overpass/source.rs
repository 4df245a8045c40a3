//! HTTP-based `GeodataSource` backed by an Overpass interpreter.

use std::time::Duration;

use async_trait::async_trait;
use civic_map_core::{GeodataError, GeodataSource, OverpassQuery, RawPoint};
use log::debug;
use reqwest::Client;
use url::Url;

use super::response::OverpassResponse;
use crate::http::{
    DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, Failure, ProviderBuildError, build_client, parse_endpoint,
};

/// Public Overpass interpreter.
pub const DEFAULT_OVERPASS_ENDPOINT: &str = "https://overpass-api.de/api/interpreter";

/// Configuration for [`HttpOverpassSource`].
#[derive(Debug, Clone)]
pub struct HttpOverpassSourceConfig {
    /// Interpreter URL (e.g., `"https://overpass-api.de/api/interpreter"`).
    pub endpoint: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for HttpOverpassSourceConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_OVERPASS_ENDPOINT.to_owned(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl HttpOverpassSourceConfig {
    /// Create a configuration for the given interpreter URL.
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
}

/// Overpass adapter issuing one `GET` per query.
#[derive(Debug)]
pub struct HttpOverpassSource {
    client: Client,
    endpoint: Url,
    config: HttpOverpassSourceConfig,
}

impl HttpOverpassSource {
    /// Create a source for `endpoint` with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not an absolute URL or the HTTP
    /// client fails to build.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpOverpassSourceConfig::new(endpoint))
    }

    /// Create a source with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not an absolute URL or the HTTP
    /// client fails to build.
    pub fn with_config(config: HttpOverpassSourceConfig) -> Result<Self, ProviderBuildError> {
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
    pub const fn config(&self) -> &HttpOverpassSourceConfig {
        &self.config
    }

    /// Build the request URL carrying `query` as the `data` parameter.
    fn request_url(&self, query: &OverpassQuery) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("data", query.as_str());
        url
    }

    /// Convert a reqwest error to a `GeodataError`.
    ///
    /// Errors report the bare endpoint without the query payload.
    fn convert_reqwest_error(&self, error: reqwest::Error) -> GeodataError {
        let url = self.endpoint.to_string();
        match Failure::from(error) {
            Failure::Timeout => GeodataError::Timeout {
                url,
                timeout_secs: self.config.timeout.as_secs(),
            },
            Failure::Status { status, message } => GeodataError::Http {
                url,
                status,
                message,
            },
            Failure::Network { message } => GeodataError::Network { url, message },
        }
    }
}

#[async_trait(?Send)]
impl GeodataSource for HttpOverpassSource {
    async fn fetch_points(&self, query: &OverpassQuery) -> Result<Vec<RawPoint>, GeodataError> {
        let url = self.request_url(query);
        debug!(
            "querying {} with {} byte query",
            self.endpoint,
            query.as_str().len()
        );

        let body = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(err))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(err))?
            .bytes()
            .await
            .map_err(|err| self.convert_reqwest_error(err))?;

        let response: OverpassResponse =
            serde_json::from_slice(&body).map_err(|err| GeodataError::Parse {
                message: err.to_string(),
            })?;
        let points = response.into_points();
        debug!("overpass returned {} located points", points.len());
        Ok(points)
    }
}
