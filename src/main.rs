use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use lotus_gateway::api::ApiServer;
use lotus_gateway::{Config, ContextCache, Dispatcher, GeminiClient, LineClient};

/// Lotus - LINE messaging webhook gateway for Gemini-backed chat
#[derive(Parser)]
#[command(name = "lotus", version, about)]
struct Cli {
    /// Port to listen on (overrides LOTUS_PORT / PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,lotus_gateway=info",
        1 => "info,lotus_gateway=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let port = cli.port.unwrap_or(config.port);

    tracing::info!(
        model = %config.model,
        ttl_secs = config.cache_ttl.as_secs(),
        "lotus gateway starting"
    );

    let generator = Arc::new(GeminiClient::new(config.gemini_api_key, config.model));
    let messenger = Arc::new(LineClient::new(config.channel_access_token));
    let cache = ContextCache::new(config.cache_ttl);

    let dispatcher = Dispatcher::new(generator, messenger, cache);

    ApiServer::new(dispatcher, port).run().await?;

    Ok(())
}
