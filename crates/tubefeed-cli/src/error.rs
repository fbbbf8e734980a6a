//! CLI error types.

use thiserror::Error;

use tubefeed_server::ServerError;
use tubefeed_upstream::UpstreamError;

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An upstream API call failed.
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// The server failed to start or run.
    #[error(transparent)]
    Server(#[from] ServerError),

    /// Output serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
