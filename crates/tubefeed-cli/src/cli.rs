//! Command-line interface definition.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// tubefeed - activity feeds with the metadata filled in
#[derive(Debug, Parser)]
#[command(name = "tubefeed")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "TUBEFEED_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the enrichment server in the foreground
    Serve {
        /// Address to bind (overrides the config file)
        #[arg(long, env = "TUBEFEED_BIND")]
        bind: Option<SocketAddr>,
    },

    /// Fetch and enrich one feed, printing JSON to stdout
    Feed {
        /// Username whose activity to fetch (defaults to the
        /// authenticated user)
        #[arg(long)]
        who: Option<String>,

        /// Fetch the friend activity feed instead
        #[arg(long, conflicts_with = "who")]
        friends: bool,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Show configuration file path
    Path,
}
