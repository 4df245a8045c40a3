//! Client construction and error classification shared by both adapters.

use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use url::Url;

/// Default user agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = "civic-map/0.1";

/// Default connect and request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Error raised while constructing an HTTP adapter.
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// The configured endpoint is not an absolute URL.
    #[error("invalid endpoint {endpoint:?}: {source}")]
    InvalidEndpoint {
        /// Endpoint as configured.
        endpoint: String,
        /// Parser failure.
        #[source]
        source: url::ParseError,
    },
}

/// A failed request, with the URL stripped from its description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Failure {
    Timeout,
    Status { status: u16, message: String },
    Network { message: String },
}

impl From<reqwest::Error> for Failure {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            return Self::Timeout;
        }
        let status = error.status();
        let message = error.without_url().to_string();
        match status {
            Some(status) => Self::Status {
                status: status.as_u16(),
                message,
            },
            None => Self::Network { message },
        }
    }
}

pub(crate) fn build_client(
    user_agent: &str,
    timeout: Duration,
) -> Result<Client, ProviderBuildError> {
    Client::builder()
        .user_agent(user_agent)
        .connect_timeout(timeout)
        .timeout(timeout)
        .build()
        .map_err(ProviderBuildError::HttpClient)
}

pub(crate) fn parse_endpoint(endpoint: &str) -> Result<Url, ProviderBuildError> {
    Url::parse(endpoint).map_err(|source| ProviderBuildError::InvalidEndpoint {
        endpoint: endpoint.to_owned(),
        source,
    })
}
