//! Error handling for the Bug SDK
//!
//! Every service call fails with a `ServiceError`. Its `message()` is what a
//! user should see: the `detail` from the response body when the service
//! sent one, otherwise a fixed per-operation fallback. `class()` says whether
//! the service was reached at all, which callers use to pick a fallback
//! strategy without inspecting message text.

use std::fmt;

use chrono::{DateTime, Utc};
use thiserror::Error;

pub mod mapping;

/// Result type for Bug SDK operations
pub type Result<T> = std::result::Result<T, ServiceError>;

#[derive(Error, Debug)]
pub enum ServiceError {
    /// Connection refused, DNS failure or a broken transport
    #[error("bug service unreachable: {0}")]
    Network(String),

    #[error("bug service timed out: {0}")]
    Timeout(String),

    /// 404
    #[error("not found: {0}")]
    NotFound(String),

    /// 400 or 422: the service rejected the payload
    #[error("rejected by bug service: {0}")]
    Validation(String),

    /// Any other non-2xx status
    #[error("bug service error: {0}")]
    Service(String),

    /// A 2xx response whose body could not be decoded
    #[error("unreadable response: {0}")]
    Parsing(String),

    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// Diagnostics attached to one of the above; displays as the inner error
    #[error("{inner}")]
    WithContext {
        inner: Box<ServiceError>,
        context: Box<ErrorContext>,
    },
}

/// Where a failure happened, as far as the caller is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureClass {
    /// No HTTP response was received
    Transport,
    /// The service answered with an error status
    HttpStatus,
    /// The service answered 2xx with a body we could not read
    Decode,
    /// The client was never able to send the request
    Configuration,
}

macro_rules! constructors {
    ($($name:ident => $variant:ident),* $(,)?) => {
        $(
            pub fn $name(message: impl Into<String>) -> Self {
                ServiceError::$variant(message.into())
            }
        )*
    };
}

impl ServiceError {
    constructors! {
        network => Network,
        timeout => Timeout,
        not_found => NotFound,
        validation => Validation,
        service => Service,
        parsing => Parsing,
        configuration => Configuration,
    }

    pub fn with_context(self, context: ErrorContext) -> Self {
        ServiceError::WithContext {
            inner: Box::new(self),
            context: Box::new(context),
        }
    }

    /// Attach just an underlying cause
    pub fn caused_by(self, cause: impl fmt::Display) -> Self {
        self.with_context(ErrorContext::new().with_cause(cause))
    }

    /// User-facing text, without the category prefix
    pub fn message(&self) -> &str {
        match self {
            ServiceError::Network(m)
            | ServiceError::Timeout(m)
            | ServiceError::NotFound(m)
            | ServiceError::Validation(m)
            | ServiceError::Service(m)
            | ServiceError::Parsing(m)
            | ServiceError::Configuration(m) => m,
            ServiceError::WithContext { inner, .. } => inner.message(),
        }
    }

    /// The error with every context layer removed
    pub fn root(&self) -> &ServiceError {
        match self {
            ServiceError::WithContext { inner, .. } => inner.root(),
            other => other,
        }
    }

    /// Outermost context, if any was attached
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            ServiceError::WithContext { context, .. } => Some(&**context),
            _ => None,
        }
    }

    pub fn operation(&self) -> Option<&str> {
        self.context().and_then(|c| c.operation.as_deref())
    }

    pub fn status_code(&self) -> Option<u16> {
        self.context().and_then(|c| c.status_code)
    }

    pub fn class(&self) -> FailureClass {
        match self {
            ServiceError::Network(_) | ServiceError::Timeout(_) => FailureClass::Transport,
            ServiceError::NotFound(_) | ServiceError::Validation(_) | ServiceError::Service(_) => {
                FailureClass::HttpStatus
            }
            ServiceError::Parsing(_) => FailureClass::Decode,
            ServiceError::Configuration(_) => FailureClass::Configuration,
            ServiceError::WithContext { inner, .. } => inner.class(),
        }
    }

    /// The service could not be reached, so no HTTP status exists
    pub fn is_transport(&self) -> bool {
        self.class() == FailureClass::Transport
    }

    /// The service was reached and answered with an error status
    pub fn is_http_status(&self) -> bool {
        self.class() == FailureClass::HttpStatus
    }
}

/// Diagnostics recorded alongside a failure
#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub service: String,

    /// `predict`, `list_bugs`, `get_bug` or `health_check`
    pub operation: Option<String>,

    /// Path relative to the base URL
    pub endpoint: Option<String>,

    /// Value sent as `X-Request-Id`
    pub request_id: Option<String>,

    pub status_code: Option<u16>,

    /// Transport or decode error text, credentials redacted
    pub cause: Option<String>,

    /// Start of an error body that carried no `detail`
    pub body_excerpt: Option<String>,

    pub occurred_at: DateTime<Utc>,
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self {
            service: String::new(),
            operation: None,
            endpoint: None,
            request_id: None,
            status_code: None,
            cause: None,
            body_excerpt: None,
            occurred_at: Utc::now(),
        }
    }
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            ..Self::default()
        }
    }

    pub fn operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }

    pub fn status_code(mut self, code: u16) -> Self {
        self.status_code = Some(code);
        self
    }

    pub fn with_cause(mut self, cause: impl fmt::Display) -> Self {
        self.set_cause(cause);
        self
    }

    pub fn set_cause(&mut self, cause: impl fmt::Display) {
        self.cause = Some(cause.to_string());
    }
}
