//! # Bug SDK
//!
//! Client SDK for the remote bug priority prediction service.
//!
//! This crate provides:
//!
//! - A typed client for the four service operations (predict, list, get, health)
//! - The wire data model for bug reports and predictions
//! - A uniform error contract with transport vs HTTP-status classification
//! - Configuration management utilities
//!
//! ## Architecture
//!
//! - `BugService`: the operations the dashboard depends on
//! - `BugServiceClient`: the HTTP implementation of `BugService`
//! - `RequestExecutor`: typed GET/POST with the shared error mapping
//! - `ServiceError`: error taxonomy carried by every call

// Re-export core modules
pub mod core;
pub use self::core::{CallInfo, ClientBuilder, ClientMetrics, OperationStats, RequestExecutor, ServiceClient, Telemetry};

// Re-export service-specific modules
pub mod services;
pub use services::bugs::{
    BugId, BugListResponse, BugModule, BugRecord, BugService, BugServiceClient,
    BugServiceClientBuilder, BugSubmission, Frequency, HealthStatus, Operation, Prediction,
    Priority, UserType,
};

// Re-export error handling
pub mod error;
pub use error::{ErrorContext, FailureClass, Result, ServiceError};

// Re-export configuration management
pub mod config;
pub use config::{BugServiceConfig, ConfigProvider, ServiceConfig};

pub mod util;

#[cfg(test)]
mod tests;

/// Create a client configured from the environment
pub fn client() -> Result<BugServiceClient> {
    BugServiceClient::new()
}
