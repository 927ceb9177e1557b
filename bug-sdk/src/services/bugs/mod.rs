//! Bug service client implementation
//!
//! This module provides a client for the remote bug priority service:
//! submitting a report for prediction, listing reports, fetching one report
//! and checking service health. Every call shares the same error contract:
//! the `detail` message from the response body when present, otherwise a
//! fixed per-operation fallback.

mod models;
pub use models::*;

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use url::Url;

use crate::config::{
    BugServiceConfig, CompositeConfigProvider, EnvConfigProvider, MemoryConfigProvider, ServiceConfig,
    ENV_PREFIX,
};
use crate::core::{CallInfo, ClientBuilder, ClientMetrics, RequestExecutor, ServiceClient, Telemetry};
use crate::error::mapping::{classify_http_error, map_transport_error};
use crate::error::{ErrorContext, Result, ServiceError};
use crate::services::common::{create_error_context, parse_error_response};
use crate::util::{new_request_id, timed};

/// Service name recorded in error contexts
pub const SERVICE_NAME: &str = "bug-service";

/// The four operations exposed by the bug service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Predict,
    ListBugs,
    GetBug,
    HealthCheck,
}

impl Operation {
    pub fn name(self) -> &'static str {
        match self {
            Operation::Predict => "predict",
            Operation::ListBugs => "list_bugs",
            Operation::GetBug => "get_bug",
            Operation::HealthCheck => "health_check",
        }
    }

    /// Message reported when the error response has no `detail`
    pub fn fallback_message(self) -> &'static str {
        match self {
            Operation::Predict => "Failed to predict bug priority",
            Operation::ListBugs => "Failed to fetch bug reports",
            Operation::GetBug => "Failed to fetch bug report",
            Operation::HealthCheck => "API health check failed",
        }
    }

    pub fn call_info(self) -> CallInfo<'static> {
        CallInfo {
            operation: self.name(),
            fallback_message: self.fallback_message(),
        }
    }
}

/// Operations offered by the bug service.
///
/// The dashboard depends on this trait rather than on `BugServiceClient`.
#[async_trait]
pub trait BugService: Send + Sync {
    /// Submit a validated report and get its predicted priority
    async fn predict(&self, submission: &BugSubmission) -> Result<Prediction>;

    /// List every known report
    async fn list_bugs(&self) -> Result<Vec<BugRecord>>;

    /// Fetch a single report
    async fn get_bug(&self, id: &BugId) -> Result<BugRecord>;

    /// Check that the service is up
    async fn health_check(&self) -> Result<HealthStatus>;
}

/// HTTP client for the bug service
pub struct BugServiceClient {
    /// HTTP client
    http_client: Client,

    /// Configuration
    config: BugServiceConfig,

    metrics: Mutex<ClientMetrics>,
}

impl BugServiceClient {
    /// Create a client configured from `BUGTRIAGE_*` environment variables
    pub fn new() -> Result<Self> {
        Self::new_with_config(BugServiceConfig::from_env()?)
    }

    /// Create a new client with custom configuration
    pub fn new_with_config(config: BugServiceConfig) -> Result<Self> {
        config.validate()?;

        let http_client = ClientBuilder::for_service(&config).build_http_client()?;

        Ok(Self {
            http_client,
            config,
            metrics: Mutex::new(ClientMetrics::default()),
        })
    }

    /// Create a new builder for the client
    pub fn builder() -> BugServiceClientBuilder {
        BugServiceClientBuilder::new()
    }

    /// Active configuration
    pub fn config(&self) -> &BugServiceConfig {
        &self.config
    }

    /// Join path segments onto the base URL, percent-encoding each segment
    fn endpoint_url(&self, segments: &[&str]) -> Result<String> {
        let mut url = Url::parse(&self.config.base_url)
            .map_err(|e| ServiceError::configuration(format!("Invalid base URL: {}", e)))?;

        url.path_segments_mut()
            .map_err(|_| ServiceError::configuration(format!("Base URL cannot have a path: {}", self.config.base_url)))?
            .pop_if_empty()
            .extend(segments);

        Ok(url.into())
    }

    /// Send a prepared request and decode the JSON response
    async fn dispatch<R>(&self, request: RequestBuilder, endpoint: &str, call: CallInfo<'_>) -> Result<R>
    where
        R: DeserializeOwned + Send,
    {
        let request_id = new_request_id();
        let mut context = create_error_context(SERVICE_NAME, endpoint, call, &request_id);

        debug!("API Request: {} {} [{}]", call.operation, endpoint, request_id);

        let request = request.header("X-Request-Id", request_id.as_str());
        let (outcome, duration) = timed(request.send()).await;

        let response = match outcome {
            Ok(response) => response,
            Err(e) => {
                let error = map_transport_error(&e, call.fallback_message, &mut context)
                    .with_context(context);
                warn!("API Request Error: {} {}: {}", call.operation, endpoint, e);
                self.record_failure(call.operation);
                return Err(error);
            }
        };

        let status = response.status();
        debug!("API Response: {} {} in {:?}", status.as_u16(), endpoint, duration);
        self.record_response(call.operation, status.as_u16(), duration);

        if !status.is_success() {
            let error = parse_error_response(response, call, context).await;
            warn!(
                "API Response Error: {} {} ({}): {}",
                status.as_u16(),
                endpoint,
                classify_http_error(status),
                error.message()
            );
            self.record_failure(call.operation);
            return Err(error);
        }

        let context = context.status_code(status.as_u16());
        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                let mut context = context;
                let error = map_transport_error(&e, call.fallback_message, &mut context)
                    .with_context(context);
                self.record_failure(call.operation);
                return Err(error);
            }
        };

        serde_json::from_slice::<R>(&bytes).map_err(|e| {
            warn!("Failed to decode {} response: {}", call.operation, e);
            let error = ServiceError::parsing(call.fallback_message)
                .with_context(context.with_cause(e));
            self.record_failure(call.operation);
            error
        })
    }
}

#[async_trait]
impl BugService for BugServiceClient {
    async fn predict(&self, submission: &BugSubmission) -> Result<Prediction> {
        self.post("predict", submission, Operation::Predict.call_info()).await
    }

    async fn list_bugs(&self) -> Result<Vec<BugRecord>> {
        let response: BugListResponse = self.get("bugs", Operation::ListBugs.call_info()).await?;
        Ok(response.into_bugs())
    }

    async fn get_bug(&self, id: &BugId) -> Result<BugRecord> {
        let id = id.to_string();
        let call = Operation::GetBug.call_info();

        // URL normalization would collapse these onto another endpoint
        if matches!(id.as_str(), "" | "." | "..") {
            let context = ErrorContext::for_service(SERVICE_NAME)
                .operation(call.operation)
                .with_cause(format!("Bug id {:?} cannot address a single report", id));
            self.record_failure(call.operation);
            return Err(ServiceError::not_found(call.fallback_message).with_context(context));
        }

        let url = self.endpoint_url(&["bugs", &id])?;
        self.dispatch(self.http_client.get(url), &format!("bugs/{}", id), call).await
    }

    async fn health_check(&self) -> Result<HealthStatus> {
        self.get("health", Operation::HealthCheck.call_info()).await
    }
}

impl ServiceClient for BugServiceClient {
    fn name(&self) -> &str {
        SERVICE_NAME
    }

    fn base_url(&self) -> &str {
        &self.config.base_url
    }
}

#[async_trait]
impl RequestExecutor for BugServiceClient {
    async fn get<R>(&self, endpoint: &str, call: CallInfo<'_>) -> Result<R>
    where
        R: DeserializeOwned + Send,
    {
        let segments: Vec<&str> = endpoint.split('/').filter(|s| !s.is_empty()).collect();
        let url = self.endpoint_url(&segments)?;
        self.dispatch(self.http_client.get(url), endpoint, call).await
    }

    async fn post<T, R>(&self, endpoint: &str, body: &T, call: CallInfo<'_>) -> Result<R>
    where
        T: Serialize + Send + Sync,
        R: DeserializeOwned + Send,
    {
        let segments: Vec<&str> = endpoint.split('/').filter(|s| !s.is_empty()).collect();
        let url = self.endpoint_url(&segments)?;
        self.dispatch(self.http_client.post(url).json(body), endpoint, call).await
    }
}

impl BugServiceClient {
    /// Counters stay usable even if a panicking thread poisoned the lock
    fn metrics_guard(&self) -> MutexGuard<'_, ClientMetrics> {
        self.metrics.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Telemetry for BugServiceClient {
    fn record_response(&self, operation: &str, status: u16, latency: Duration) {
        self.metrics_guard().record_response(operation, status, latency);
    }

    fn record_failure(&self, operation: &str) {
        self.metrics_guard().record_failure(operation);
    }

    fn metrics(&self) -> ClientMetrics {
        self.metrics_guard().clone()
    }

    fn reset_metrics(&self) {
        *self.metrics_guard() = ClientMetrics::default();
    }
}

/// Builds a `BugServiceClient` from explicit values layered over the environment.
///
/// Values set here win over `BUGTRIAGE_*` variables, which win over defaults.
pub struct BugServiceClientBuilder {
    overrides: MemoryConfigProvider,
    read_env: bool,
}

impl Default for BugServiceClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BugServiceClientBuilder {
    pub fn new() -> Self {
        Self {
            overrides: MemoryConfigProvider::new(),
            read_env: true,
        }
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.overrides.set("api_url", base_url);
        self
    }

    pub fn timeout(mut self, seconds: u64) -> Self {
        self.overrides.set("timeout_seconds", seconds.to_string());
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.overrides.set("user_agent", user_agent);
        self
    }

    /// Ignore `BUGTRIAGE_*` variables entirely
    pub fn without_env(mut self) -> Self {
        self.read_env = false;
        self
    }

    pub fn build(self) -> Result<BugServiceClient> {
        let mut provider = CompositeConfigProvider::new().with_provider(self.overrides);
        if self.read_env {
            provider.add_provider(EnvConfigProvider::new().with_prefix(ENV_PREFIX));
        }

        BugServiceClient::new_with_config(BugServiceConfig::from_provider(&provider)?)
    }
}
