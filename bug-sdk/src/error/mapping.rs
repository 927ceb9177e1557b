//! Error mapping for bug service responses
//!
//! This module converts HTTP error responses and transport failures into
//! the normalized ServiceError type.

use reqwest::StatusCode;
use serde_json::Value;

use super::{ErrorContext, ServiceError};
use crate::util::{body_excerpt, redact};

/// Extract the human-readable `detail` message from an error body.
///
/// `detail` is either a plain string or a list of validation entries, each
/// carrying a `msg`. Anything else yields `None`.
pub fn extract_detail(json: &Value) -> Option<String> {
    match json.get("detail")? {
        Value::String(detail) if !detail.trim().is_empty() => Some(detail.clone()),
        Value::Array(entries) => {
            let messages: Vec<&str> = entries
                .iter()
                .filter_map(|entry| entry.get("msg").and_then(|m| m.as_str()))
                .collect();

            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        _ => None,
    }
}

/// Map a non-2xx HTTP response to a ServiceError
pub fn map_http_error(
    status: StatusCode,
    body: &str,
    fallback: &str,
    context: &mut ErrorContext,
) -> ServiceError {
    context.status_code = Some(status.as_u16());

    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| extract_detail(&json));

    if detail.is_none() && !body.is_empty() {
        context.body_excerpt = Some(body_excerpt(body, 200));
    }

    let message = detail.unwrap_or_else(|| fallback.to_string());

    match status {
        StatusCode::NOT_FOUND => ServiceError::not_found(message),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => ServiceError::validation(message),
        _ => ServiceError::service(message),
    }
}

/// Map a failure to send a request (or receive its response) to a ServiceError
pub fn map_transport_error(
    err: &reqwest::Error,
    fallback: &str,
    context: &mut ErrorContext,
) -> ServiceError {
    context.set_cause(redact(&err.to_string()));

    if err.is_timeout() {
        ServiceError::timeout(fallback)
    } else if err.is_builder() {
        ServiceError::configuration(fallback)
    } else {
        ServiceError::network(fallback)
    }
}

/// Helper function to classify HTTP errors by category
pub fn classify_http_error(status: StatusCode) -> &'static str {
    match status.as_u16() {
        400 | 422 => "validation",
        404 => "not_found",
        408 => "timeout",
        429 => "rate_limit",
        500..=599 => "server",
        _ => "unknown",
    }
}
