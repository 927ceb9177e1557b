//! HTTP client construction
//!
//! Every request carries JSON content negotiation headers and the
//! configured user agent; the timeout covers the whole request.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Client;

use crate::config::BugServiceConfig;
use crate::error::{Result, ServiceError};
use crate::services::UserAgent;

pub struct ClientBuilder {
    headers: HeaderMap,

    /// First header that failed to parse; reported by `build_http_client`
    invalid_header: Option<String>,

    timeout: Duration,

    user_agent: String,

    /// Accept gzip-encoded responses
    compression: bool,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        let json = HeaderValue::from_static("application/json");
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, json.clone());
        headers.insert(ACCEPT, json);

        Self {
            headers,
            invalid_header: None,
            timeout: Duration::from_secs(crate::config::DEFAULT_TIMEOUT_SECONDS),
            user_agent: UserAgent::default().to_string(),
            compression: true,
        }
    }
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder preloaded with a service configuration's timeout and user agent
    pub fn for_service(config: &BugServiceConfig) -> Self {
        let builder = Self::new().timeout(Duration::from_secs(config.timeout_seconds));
        match &config.user_agent {
            Some(user_agent) => builder.user_agent(user_agent.clone()),
            None => builder,
        }
    }

    /// Send `key: value` with every request
    pub fn header(mut self, key: &str, value: &str) -> Self {
        match (HeaderName::try_from(key), HeaderValue::try_from(value)) {
            (Ok(name), Ok(value)) => {
                self.headers.insert(name, value);
            }
            (Err(e), _) => {
                self.invalid_header.get_or_insert_with(|| format!("Invalid header name {:?}: {}", key, e));
            }
            (_, Err(e)) => {
                self.invalid_header.get_or_insert_with(|| format!("Invalid value for header {}: {}", key, e));
            }
        }
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn compression(mut self, enabled: bool) -> Self {
        self.compression = enabled;
        self
    }

    pub fn build_http_client(self) -> Result<Client> {
        if let Some(message) = self.invalid_header {
            return Err(ServiceError::configuration(message));
        }

        Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent)
            .gzip(self.compression)
            .default_headers(self.headers)
            .build()
            .map_err(|e| ServiceError::configuration(format!("Failed to build HTTP client: {}", e)))
    }
}
