//! In-process request counters
//!
//! Kept per operation name rather than per URL so that `get_bug` calls for
//! different ids share one entry.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OperationStats {
    /// Calls that received an HTTP response, successful or not
    pub responses: u64,

    /// Calls that returned an error of any kind
    pub failures: u64,

    pub total_latency_ms: u64,
}

impl OperationStats {
    pub fn average_latency_ms(&self) -> Option<u64> {
        (self.responses > 0).then(|| self.total_latency_ms / self.responses)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClientMetrics {
    pub operations: BTreeMap<String, OperationStats>,

    /// Response count per HTTP status
    pub statuses: BTreeMap<u16, u64>,
}

impl ClientMetrics {
    pub fn record_response(&mut self, operation: &str, status: u16, latency: Duration) {
        let stats = self.operations.entry(operation.to_string()).or_default();
        stats.responses += 1;
        stats.total_latency_ms += latency.as_millis() as u64;
        *self.statuses.entry(status).or_default() += 1;
    }

    pub fn record_failure(&mut self, operation: &str) {
        self.operations.entry(operation.to_string()).or_default().failures += 1;
    }

    pub fn operation(&self, name: &str) -> OperationStats {
        self.operations.get(name).copied().unwrap_or_default()
    }

    pub fn responses(&self) -> u64 {
        self.operations.values().map(|s| s.responses).sum()
    }

    pub fn failures(&self) -> u64 {
        self.operations.values().map(|s| s.failures).sum()
    }

    pub fn status_count(&self, status: u16) -> u64 {
        self.statuses.get(&status).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}
