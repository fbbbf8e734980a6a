//! Error types for upstream API operations.
//!
//! This module defines the error types that can occur when talking to the
//! upstream video platform API (activity feeds, video metadata, user
//! profiles).

use std::fmt;
use thiserror::Error;

/// The category of an upstream error.
///
/// This enum provides a high-level classification of errors for use in
/// HTTP responses and degradation decisions: entry-level lookups convert
/// any failure into the unavailable sentinel, while feed-level fetches
/// distinguish server-side failures from everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpstreamErrorCode {
    /// Authentication failed or credentials are invalid/expired.
    AuthenticationFailed,
    /// Authorization failed - user lacks permission.
    AuthorizationFailed,
    /// Network error - connection failed, timeout, DNS resolution, etc.
    NetworkError,
    /// Rate limit exceeded - too many requests.
    RateLimited,
    /// Server returned an error (5xx status codes).
    ServerError,
    /// Invalid response from the server - parse error, unexpected format.
    InvalidResponse,
    /// Resource not found (404) - deleted or not yet indexed.
    NotFound,
    /// Request was invalid (400) - bad parameters, malformed request.
    BadRequest,
    /// Configuration error - missing or invalid config.
    ConfigurationError,
    /// Internal error - unexpected state, bug.
    InternalError,
}

impl UpstreamErrorCode {
    /// Returns true if this error is transient and the operation may be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::NetworkError | Self::RateLimited | Self::ServerError
        )
    }

    /// Returns true if the failure is on the server side (5xx-class).
    ///
    /// Feed-level fetches that fail this way surface the whole-response
    /// `SERVER_ERROR` sentinel instead of the per-entry one.
    pub fn is_server_side(&self) -> bool {
        matches!(self, Self::ServerError | Self::NetworkError)
    }

    /// Returns a human-readable name for this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AuthenticationFailed => "authentication_failed",
            Self::AuthorizationFailed => "authorization_failed",
            Self::NetworkError => "network_error",
            Self::RateLimited => "rate_limited",
            Self::ServerError => "server_error",
            Self::InvalidResponse => "invalid_response",
            Self::NotFound => "not_found",
            Self::BadRequest => "bad_request",
            Self::ConfigurationError => "configuration_error",
            Self::InternalError => "internal_error",
        }
    }
}

impl fmt::Display for UpstreamErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An error that occurred while talking to the upstream API.
#[derive(Debug, Error)]
pub struct UpstreamError {
    /// The error code categorizing this error.
    code: UpstreamErrorCode,
    /// A human-readable message describing the error.
    message: String,
    /// The source that generated this error (e.g., "youtube").
    source_name: Option<String>,
    /// The underlying cause of this error, if any.
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl UpstreamError {
    /// Creates a new upstream error with the given code and message.
    pub fn new(code: UpstreamErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source_name: None,
            source: None,
        }
    }

    /// Creates an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(UpstreamErrorCode::AuthenticationFailed, message)
    }

    /// Creates an authorization error.
    pub fn authorization(message: impl Into<String>) -> Self {
        Self::new(UpstreamErrorCode::AuthorizationFailed, message)
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(UpstreamErrorCode::NetworkError, message)
    }

    /// Creates a rate limit error.
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(UpstreamErrorCode::RateLimited, message)
    }

    /// Creates a server error.
    pub fn server(message: impl Into<String>) -> Self {
        Self::new(UpstreamErrorCode::ServerError, message)
    }

    /// Creates an invalid response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(UpstreamErrorCode::InvalidResponse, message)
    }

    /// Creates a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(UpstreamErrorCode::NotFound, message)
    }

    /// Creates a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(UpstreamErrorCode::BadRequest, message)
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(UpstreamErrorCode::ConfigurationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(UpstreamErrorCode::InternalError, message)
    }

    /// Sets the source name for this error.
    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = Some(name.into());
        self
    }

    /// Sets the underlying cause for this error.
    pub fn with_cause<E>(mut self, cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(cause));
        self
    }

    /// Returns the error code.
    pub fn code(&self) -> UpstreamErrorCode {
        self.code
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the source name, if set.
    pub fn source_name(&self) -> Option<&str> {
        self.source_name.as_deref()
    }

    /// Returns true if this error is transient and may be retried.
    pub fn is_retryable(&self) -> bool {
        self.code.is_retryable()
    }
}

impl fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref name) = self.source_name {
            write!(f, "[{}] ", name)?;
        }
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// A specialized Result type for upstream operations.
pub type UpstreamResult<T> = Result<T, UpstreamError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_code_retryable() {
        assert!(UpstreamErrorCode::NetworkError.is_retryable());
        assert!(UpstreamErrorCode::RateLimited.is_retryable());
        assert!(UpstreamErrorCode::ServerError.is_retryable());
        assert!(!UpstreamErrorCode::AuthenticationFailed.is_retryable());
        assert!(!UpstreamErrorCode::NotFound.is_retryable());
    }

    #[test]
    fn error_code_server_side() {
        assert!(UpstreamErrorCode::ServerError.is_server_side());
        assert!(UpstreamErrorCode::NetworkError.is_server_side());
        assert!(!UpstreamErrorCode::NotFound.is_server_side());
        assert!(!UpstreamErrorCode::RateLimited.is_server_side());
    }

    #[test]
    fn error_code_display() {
        assert_eq!(
            UpstreamErrorCode::AuthenticationFailed.as_str(),
            "authentication_failed"
        );
        assert_eq!(UpstreamErrorCode::RateLimited.as_str(), "rate_limited");
    }

    #[test]
    fn upstream_error_creation() {
        let err = UpstreamError::authentication("token expired");
        assert_eq!(err.code(), UpstreamErrorCode::AuthenticationFailed);
        assert_eq!(err.message(), "token expired");
        assert!(err.source_name().is_none());
        assert!(!err.is_retryable());
    }

    #[test]
    fn upstream_error_with_source_name() {
        let err = UpstreamError::network("connection timeout").with_source_name("youtube");
        assert_eq!(err.code(), UpstreamErrorCode::NetworkError);
        assert_eq!(err.source_name(), Some("youtube"));
        assert!(err.is_retryable());
    }

    #[test]
    fn upstream_error_display() {
        let err = UpstreamError::rate_limited("too many requests").with_source_name("youtube");
        let display = format!("{}", err);
        assert!(display.contains("[youtube]"));
        assert!(display.contains("rate_limited"));
        assert!(display.contains("too many requests"));
    }

    #[test]
    fn upstream_error_with_cause() {
        use std::error::Error;
        let io_err = std::io::Error::other("connection reset");
        let err = UpstreamError::network("request failed").with_cause(io_err);
        assert!(err.source().is_some());
    }
}
