//! Per-request authentication context.
//!
//! Credentials are carried in an explicit [`AuthContext`] built by the
//! caller for each request and passed down to the source, never read from
//! ambient state. Token acquisition (OAuth/AuthSub exchange) is out of
//! scope; tokens arrive here as opaque strings.

use reqwest::RequestBuilder;

/// Credentials for one upstream request.
///
/// Both fields are optional: public feeds and video lookups work
/// anonymously, while `default`-user resolution and friend feeds require
/// an access token.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    /// Bearer token representing the authenticated principal.
    pub access_token: Option<String>,
    /// Developer key identifying the calling application.
    pub developer_key: Option<String>,
}

impl AuthContext {
    /// Creates a context with no credentials.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Builder method to set the access token.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Builder method to set the developer key.
    pub fn with_developer_key(mut self, key: impl Into<String>) -> Self {
        self.developer_key = Some(key.into());
        self
    }

    /// Returns true if the context carries an access token.
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    /// Applies the credentials to an outgoing request.
    pub(crate) fn apply(&self, mut request: RequestBuilder) -> RequestBuilder {
        if let Some(ref token) = self.access_token {
            request = request.bearer_auth(token);
        }
        if let Some(ref key) = self.developer_key {
            request = request.header("X-GData-Key", format!("key={}", key));
        }
        request
    }
}
