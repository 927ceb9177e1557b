//! Core abstractions for the Bug SDK
//!
//! - `ServiceClient`: which service a client talks to
//! - `RequestExecutor`: typed JSON requests under the shared error contract
//! - `Telemetry`: per-operation counters
//! - `ClientBuilder`: the underlying `reqwest` client

pub mod builder;
pub mod metrics;

pub use builder::ClientBuilder;
pub use metrics::{ClientMetrics, OperationStats};

use std::time::Duration;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use crate::error::Result;

pub trait ServiceClient: Send + Sync {
    /// Name recorded in error contexts
    fn name(&self) -> &str;

    fn base_url(&self) -> &str;
}

/// Identifies a call for logging and error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallInfo<'a> {
    /// Operation name, recorded in the error context and metrics
    pub operation: &'a str,

    /// Message used when the response carries no `detail`
    pub fallback_message: &'a str,
}

/// JSON requests against paths relative to the client's base URL.
///
/// Non-2xx responses and transport failures come back as `ServiceError`
/// with `call.fallback_message` unless the body supplies a `detail`.
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    async fn get<R>(&self, endpoint: &str, call: CallInfo<'_>) -> Result<R>
    where
        R: DeserializeOwned + Send;

    async fn post<T, R>(&self, endpoint: &str, body: &T, call: CallInfo<'_>) -> Result<R>
    where
        T: Serialize + Send + Sync,
        R: DeserializeOwned + Send;
}

pub trait Telemetry: Send + Sync {
    /// An HTTP response arrived, whatever its status
    fn record_response(&self, operation: &str, status: u16, latency: Duration);

    /// The call failed, with or without a response
    fn record_failure(&self, operation: &str);

    fn metrics(&self) -> ClientMetrics;

    fn reset_metrics(&self);
}
