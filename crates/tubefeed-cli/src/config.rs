//! CLI configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/tubefeed/config.toml` by default:
//!
//! ```toml
//! [upstream]
//! developer_key = "AI39..."
//! access_token = "ya29..."
//! timeout_secs = 10
//!
//! [server]
//! bind = "127.0.0.1:8080"
//! metadata_ttl_secs = 86400
//! feed_ttl_secs = 300
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use tubefeed_server::ServerConfig;
use tubefeed_upstream::{AuthContext, UpstreamResult, YouTubeConfig};

/// Configuration for the tubefeed CLI and server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Upstream API settings.
    #[serde(default)]
    pub upstream: UpstreamSettings,

    /// Server settings.
    #[serde(default)]
    pub server: ServerSettings,
}

/// Upstream API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamSettings {
    /// Base URL of the upstream API (defaults to the production API).
    pub api_base: Option<String>,

    /// Developer key identifying this application.
    pub developer_key: Option<String>,

    /// Access token for the authenticated user.
    pub access_token: Option<String>,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    /// Cap on the number of feed items requested per fetch.
    pub max_results: Option<usize>,
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            api_base: None,
            developer_key: None,
            access_token: None,
            timeout_secs: 10,
            max_results: None,
        }
    }
}

/// Server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Address to bind the HTTP listener to.
    pub bind: SocketAddr,

    /// How long resolved metadata stays cached, in seconds.
    pub metadata_ttl_secs: u64,

    /// How long a whole enriched feed stays cached, in seconds.
    pub feed_ttl_secs: u64,

    /// Bound on entries per cache.
    pub cache_capacity: usize,

    /// How many metadata lookups may run concurrently per request.
    pub lookup_concurrency: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        let defaults = ServerConfig::default();
        Self {
            bind: defaults.bind_addr,
            metadata_ttl_secs: defaults.metadata_ttl.as_secs(),
            feed_ttl_secs: defaults.feed_ttl.as_secs(),
            cache_capacity: defaults.cache_capacity,
            lookup_concurrency: defaults.lookup_concurrency,
        }
    }
}

impl AppConfig {
    /// Loads configuration from the default path.
    pub fn load() -> Result<Self, String> {
        let path = Self::default_path();
        if path.exists() {
            let content = std::fs::read_to_string(&path)
                .map_err(|e| format!("failed to read config: {}", e))?;
            toml::from_str(&content).map_err(|e| format!("failed to parse config: {}", e))
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &PathBuf) -> Result<Self, String> {
        let content =
            std::fs::read_to_string(path).map_err(|e| format!("failed to read config: {}", e))?;
        toml::from_str(&content).map_err(|e| format!("failed to parse config: {}", e))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tubefeed")
    }

    /// Builds the server configuration from these settings.
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig::new(self.server.bind)
            .with_metadata_ttl(Duration::from_secs(self.server.metadata_ttl_secs))
            .with_feed_ttl(Duration::from_secs(self.server.feed_ttl_secs))
            .with_cache_capacity(self.server.cache_capacity)
            .with_lookup_concurrency(self.server.lookup_concurrency)
    }

    /// Builds the upstream client configuration from these settings.
    pub fn youtube_config(&self) -> UpstreamResult<YouTubeConfig> {
        let mut config =
            YouTubeConfig::new().with_timeout(Duration::from_secs(self.upstream.timeout_secs));
        if let Some(ref base) = self.upstream.api_base {
            config = config.with_api_base_str(base)?;
        }
        if let Some(max) = self.upstream.max_results {
            config = config.with_max_results(max);
        }
        Ok(config)
    }

    /// Builds the server's own upstream credentials.
    pub fn credentials(&self) -> AuthContext {
        let mut ctx = AuthContext::anonymous();
        if let Some(ref token) = self.upstream.access_token {
            ctx = ctx.with_access_token(token);
        }
        if let Some(ref key) = self.upstream.developer_key {
            ctx = ctx.with_developer_key(key);
        }
        ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config() {
        let config = AppConfig::default();
        assert_eq!(config.upstream.timeout_secs, 10);
        assert!(config.upstream.access_token.is_none());
        assert_eq!(config.server.bind.port(), 8080);
        assert_eq!(config.server.metadata_ttl_secs, 86400);
        assert_eq!(config.server.feed_ttl_secs, 300);
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"
[upstream]
developer_key = "dev-123"
access_token = "tok-456"
timeout_secs = 5

[server]
bind = "0.0.0.0:9000"
feed_ttl_secs = 60
"#
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.upstream.developer_key.as_deref(), Some("dev-123"));
        assert_eq!(config.upstream.timeout_secs, 5);
        assert_eq!(config.server.bind.port(), 9000);
        assert_eq!(config.server.feed_ttl_secs, 60);
        // Unset fields keep their defaults
        assert_eq!(config.server.metadata_ttl_secs, 86400);
    }

    #[test]
    fn load_from_missing_file_fails() {
        let path = PathBuf::from("/definitely/not/here/config.toml");
        assert!(AppConfig::load_from(&path).is_err());
    }

    #[test]
    fn server_config_conversion() {
        let mut config = AppConfig::default();
        config.server.feed_ttl_secs = 42;
        config.server.lookup_concurrency = 3;

        let server = config.server_config();
        assert_eq!(server.feed_ttl, Duration::from_secs(42));
        assert_eq!(server.lookup_concurrency, 3);
    }

    #[test]
    fn youtube_config_conversion() {
        let mut config = AppConfig::default();
        config.upstream.api_base = Some("http://localhost:9999".to_string());
        config.upstream.max_results = Some(25);

        let yt = config.youtube_config().unwrap();
        assert_eq!(yt.api_base.as_str(), "http://localhost:9999/");
        assert_eq!(yt.max_results, Some(25));

        config.upstream.api_base = Some("not a url".to_string());
        assert!(config.youtube_config().is_err());
    }

    #[test]
    fn credentials_conversion() {
        let mut config = AppConfig::default();
        assert!(!config.credentials().is_authenticated());

        config.upstream.access_token = Some("tok".to_string());
        config.upstream.developer_key = Some("key".to_string());
        let ctx = config.credentials();
        assert!(ctx.is_authenticated());
        assert_eq!(ctx.developer_key.as_deref(), Some("key"));
    }
}
