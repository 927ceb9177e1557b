//! Pieces shared by service clients: the user agent and error-response handling

use std::fmt;

use crate::core::CallInfo;
use crate::error::mapping::map_http_error;
use crate::error::{ErrorContext, ServiceError};

/// `product/version (comment)` as sent in the `User-Agent` header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAgent {
    pub product: String,
    pub version: String,
    pub comment: Option<String>,
}

impl Default for UserAgent {
    fn default() -> Self {
        Self {
            product: "bug-triage".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            comment: Some("bug-sdk".to_string()),
        }
    }
}

impl fmt::Display for UserAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.comment {
            Some(comment) => write!(f, "{}/{} ({})", self.product, self.version, comment),
            None => write!(f, "{}/{}", self.product, self.version),
        }
    }
}

/// Context recorded for every call before it is sent
pub fn create_error_context(
    service_name: &str,
    endpoint: &str,
    call: CallInfo<'_>,
    request_id: &str,
) -> ErrorContext {
    ErrorContext::for_service(service_name)
        .operation(call.operation)
        .endpoint(endpoint)
        .request_id(request_id)
}

/// Read a non-2xx response body and map it to a `ServiceError`.
///
/// An unreadable body is treated like an empty one, so the fallback message applies.
pub async fn parse_error_response(
    response: reqwest::Response,
    call: CallInfo<'_>,
    mut context: ErrorContext,
) -> ServiceError {
    let status = response.status();

    let body = response.text().await.unwrap_or_else(|e| {
        context.set_cause(format!("Failed to read error response: {}", e));
        String::new()
    });

    map_http_error(status, &body, call.fallback_message, &mut context).with_context(context)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_display() {
        let ua = UserAgent {
            product: "bug-dashboard".to_string(),
            version: "1.2.3".to_string(),
            comment: None,
        };
        assert_eq!(ua.to_string(), "bug-dashboard/1.2.3");

        let default = UserAgent::default().to_string();
        assert!(default.starts_with("bug-triage/"));
        assert!(default.ends_with(" (bug-sdk)"));
    }
}
