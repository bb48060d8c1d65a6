//! Error types for the GitLab client.

use chrono::{DateTime, Utc};
use std::fmt;
use thiserror::Error;

/// Result type alias for GitLab operations.
pub type GitLabResult<T> = Result<T, GitLabError>;

/// Error kinds for categorizing GitLab errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitLabErrorKind {
    // Configuration errors
    /// Missing authentication configuration.
    MissingAuth,
    /// Invalid base URL.
    InvalidBaseUrl,
    /// Invalid configuration.
    InvalidConfiguration,

    // Local validation errors
    /// Resource identifier is neither an integer nor a string.
    InvalidId,
    /// Invalid parameter.
    InvalidParameter,

    // Authentication / authorization errors
    /// Bad credentials (401).
    Unauthorized,
    /// Access forbidden (403).
    Forbidden,

    // Resource errors
    /// Resource not found (404).
    NotFound,
    /// Method not allowed on this resource (405).
    MethodNotAllowed,
    /// Resource conflict (409).
    Conflict,
    /// Request understood but not processable (422).
    Unprocessable,

    // Rate limiting
    /// Rate limit exceeded (429).
    RateLimited,

    // Network errors
    /// Connection failed.
    ConnectionFailed,
    /// Request timeout.
    Timeout,

    // Server errors
    /// Internal server error (500).
    InternalError,
    /// Bad gateway (502).
    BadGateway,
    /// Service unavailable (503).
    ServiceUnavailable,

    // Response errors
    /// Failed to deserialize response.
    DeserializationError,

    /// Unknown error.
    Unknown,
}

impl fmt::Display for GitLabErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingAuth => write!(f, "missing_auth"),
            Self::InvalidBaseUrl => write!(f, "invalid_base_url"),
            Self::InvalidConfiguration => write!(f, "invalid_configuration"),
            Self::InvalidId => write!(f, "invalid_id"),
            Self::InvalidParameter => write!(f, "invalid_parameter"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::Forbidden => write!(f, "forbidden"),
            Self::NotFound => write!(f, "not_found"),
            Self::MethodNotAllowed => write!(f, "method_not_allowed"),
            Self::Conflict => write!(f, "conflict"),
            Self::Unprocessable => write!(f, "unprocessable"),
            Self::RateLimited => write!(f, "rate_limited"),
            Self::ConnectionFailed => write!(f, "connection_failed"),
            Self::Timeout => write!(f, "timeout"),
            Self::InternalError => write!(f, "internal_error"),
            Self::BadGateway => write!(f, "bad_gateway"),
            Self::ServiceUnavailable => write!(f, "service_unavailable"),
            Self::DeserializationError => write!(f, "deserialization_error"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Rate limit information extracted from response headers.
#[derive(Debug, Clone)]
pub struct RateLimitInfo {
    /// Maximum requests allowed in the current window.
    pub limit: u32,
    /// Remaining requests in the current window.
    pub remaining: u32,
    /// Time when the rate limit resets.
    pub reset_at: DateTime<Utc>,
    /// Retry-After header value in seconds (if present).
    pub retry_after: Option<u64>,
}

/// GitLab API error with detailed information.
#[derive(Error, Debug)]
pub struct GitLabError {
    /// Error kind.
    kind: GitLabErrorKind,
    /// Error message.
    message: String,
    /// HTTP status code.
    status_code: Option<u16>,
    /// GitLab request ID.
    request_id: Option<String>,
    /// Rate limit info (if applicable).
    rate_limit: Option<RateLimitInfo>,
    /// Underlying cause.
    #[source]
    cause: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for GitLabError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)?;
        if let Some(code) = self.status_code {
            write!(f, " (HTTP {})", code)?;
        }
        if let Some(ref id) = self.request_id {
            write!(f, " [request_id: {}]", id)?;
        }
        Ok(())
    }
}

impl GitLabError {
    /// Creates a new GitLab error.
    pub fn new(kind: GitLabErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status_code: None,
            request_id: None,
            rate_limit: None,
            cause: None,
        }
    }

    /// Sets the HTTP status code.
    pub fn with_status(mut self, code: u16) -> Self {
        self.status_code = Some(code);
        self
    }

    /// Sets the GitLab request ID.
    pub fn with_request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }

    /// Sets the rate limit info.
    pub fn with_rate_limit(mut self, info: RateLimitInfo) -> Self {
        self.rate_limit = Some(info);
        self
    }

    /// Sets the underlying cause.
    pub fn with_cause(mut self, cause: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Gets the error kind.
    pub fn kind(&self) -> &GitLabErrorKind {
        &self.kind
    }

    /// Gets the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Gets the HTTP status code.
    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    /// Gets the request ID.
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    /// Gets the rate limit info.
    pub fn rate_limit(&self) -> Option<&RateLimitInfo> {
        self.rate_limit.as_ref()
    }

    /// Returns the retry-after duration in seconds.
    pub fn retry_after(&self) -> Option<u64> {
        let rl = self.rate_limit.as_ref()?;
        rl.retry_after.or_else(|| {
            let now = Utc::now();
            if rl.reset_at > now {
                Some((rl.reset_at - now).num_seconds() as u64)
            } else {
                None
            }
        })
    }

    /// Returns true if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind,
            GitLabErrorKind::RateLimited
                | GitLabErrorKind::ConnectionFailed
                | GitLabErrorKind::Timeout
                | GitLabErrorKind::InternalError
                | GitLabErrorKind::BadGateway
                | GitLabErrorKind::ServiceUnavailable
        )
    }

    /// Creates an error from an HTTP status code and decoded error message.
    pub fn from_response(status: u16, message: String, request_id: Option<String>) -> Self {
        let mut error = Self::new(Self::kind_from_status(status), message).with_status(status);
        if let Some(id) = request_id {
            error = error.with_request_id(id);
        }
        error
    }

    /// Maps HTTP status code to error kind.
    fn kind_from_status(status: u16) -> GitLabErrorKind {
        match status {
            400 => GitLabErrorKind::InvalidParameter,
            401 => GitLabErrorKind::Unauthorized,
            403 => GitLabErrorKind::Forbidden,
            404 => GitLabErrorKind::NotFound,
            405 => GitLabErrorKind::MethodNotAllowed,
            409 => GitLabErrorKind::Conflict,
            422 => GitLabErrorKind::Unprocessable,
            429 => GitLabErrorKind::RateLimited,
            500 => GitLabErrorKind::InternalError,
            502 => GitLabErrorKind::BadGateway,
            503 => GitLabErrorKind::ServiceUnavailable,
            _ => GitLabErrorKind::Unknown,
        }
    }

    // Convenience constructors

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(GitLabErrorKind::InvalidConfiguration, message)
    }

    /// Creates an invalid ID error.
    pub fn invalid_id(message: impl Into<String>) -> Self {
        Self::new(GitLabErrorKind::InvalidId, message)
    }

    /// Creates a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(GitLabErrorKind::NotFound, message).with_status(404)
    }

    /// Creates a timeout error.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(GitLabErrorKind::Timeout, message)
    }

    /// Creates a deserialization error.
    pub fn deserialization(message: impl Into<String>) -> Self {
        Self::new(GitLabErrorKind::DeserializationError, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = GitLabError::new(GitLabErrorKind::NotFound, "404 Project Not Found")
            .with_status(404)
            .with_request_id("01HX4");

        let display = format!("{}", error);
        assert!(display.contains("not_found"));
        assert!(display.contains("404 Project Not Found"));
        assert!(display.contains("404"));
        assert!(display.contains("01HX4"));
    }

    #[test]
    fn test_is_retryable() {
        let retryable = GitLabError::new(GitLabErrorKind::ServiceUnavailable, "down");
        assert!(retryable.is_retryable());

        let not_retryable = GitLabError::invalid_id("bad id");
        assert!(!not_retryable.is_retryable());
    }

    #[test]
    fn test_from_response() {
        let error = GitLabError::from_response(
            409,
            "another open merge request already exists".to_string(),
            Some("req-42".to_string()),
        );

        assert_eq!(*error.kind(), GitLabErrorKind::Conflict);
        assert_eq!(error.status_code(), Some(409));
        assert_eq!(error.request_id(), Some("req-42"));
    }

    #[test]
    fn test_retry_after_from_reset() {
        let error = GitLabError::new(GitLabErrorKind::RateLimited, "slow down")
            .with_status(429)
            .with_rate_limit(RateLimitInfo {
                limit: 600,
                remaining: 0,
                reset_at: Utc::now() + chrono::Duration::seconds(30),
                retry_after: None,
            });

        let secs = error.retry_after().unwrap();
        assert!(secs <= 30);
    }
}
