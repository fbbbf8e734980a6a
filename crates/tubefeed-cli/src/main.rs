//! tubefeed CLI entry point.

use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use tubefeed_cli::cli::{Cli, Command, ConfigAction};
use tubefeed_cli::config::AppConfig;
use tubefeed_cli::error::{CliError, CliResult};
use tubefeed_core::{TracingConfig, init_tracing};
use tubefeed_server::{AppState, FeedEnricher};
use tubefeed_upstream::{ActivitySource, FeedTarget, YouTubeSource};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing: the server logs JSON, one-shot commands stay
    // human-readable.
    let tracing_config = if cli.debug {
        TracingConfig::cli_debug()
    } else if matches!(cli.command, Command::Serve { .. }) {
        TracingConfig::server()
    } else {
        TracingConfig::default()
    };
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("warning: failed to initialize tracing: {}", e);
    }

    // Run the command
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    // Load configuration
    let config = if let Some(ref path) = cli.config {
        AppConfig::load_from(path).map_err(CliError::Config)?
    } else {
        AppConfig::load().unwrap_or_default()
    };

    match cli.command {
        Command::Serve { bind } => serve(config, bind).await,
        Command::Feed {
            who,
            friends,
            pretty,
        } => feed(config, who, friends, pretty).await,
        Command::Config { action } => match action {
            ConfigAction::Dump => {
                let rendered =
                    toml::to_string_pretty(&config).map_err(|e| CliError::Config(e.to_string()))?;
                println!("{}", rendered);
                Ok(())
            }
            ConfigAction::Path => {
                println!("{}", AppConfig::default_path().display());
                Ok(())
            }
        },
    }
}

/// Runs the enrichment server in the foreground.
async fn serve(config: AppConfig, bind: Option<SocketAddr>) -> CliResult<()> {
    let mut server_config = config.server_config();
    if let Some(bind) = bind {
        server_config.bind_addr = bind;
    }

    let source: Arc<dyn ActivitySource> = Arc::new(YouTubeSource::new(config.youtube_config()?));
    let state = AppState::new(source, config.credentials(), &server_config);

    tubefeed_server::serve(&server_config, state).await?;
    Ok(())
}

/// Fetches and enriches one feed, printing JSON to stdout.
async fn feed(
    config: AppConfig,
    who: Option<String>,
    friends: bool,
    pretty: bool,
) -> CliResult<()> {
    let source: Arc<dyn ActivitySource> = Arc::new(YouTubeSource::new(config.youtube_config()?));
    let ctx = config.credentials();

    let target = if friends {
        FeedTarget::Friends
    } else {
        match who {
            Some(who) => FeedTarget::User(who),
            None => FeedTarget::User(source.fetch_profile_username(ctx.clone()).await?),
        }
    };

    let entries = source.fetch_activity(ctx.clone(), target).await?;
    let enricher = FeedEnricher::new(source, config.server_config().enrich_config());
    let enriched = enricher.enrich(&ctx, entries).await;

    let output = if pretty {
        serde_json::to_string_pretty(&enriched)?
    } else {
        serde_json::to_string(&enriched)?
    };
    println!("{}", output);
    Ok(())
}
