use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use trendproxy::api::{AppState, create_router};
use trendproxy::config::Config;
use trendproxy::upstream::{GoogleTrendsClient, TrendSource, UnavailableSource};

#[derive(Parser)]
#[command(name = "trendproxy")]
#[command(about = "Related-search-queries proxy with synthetic fallback", long_about = None)]
struct Cli {
    #[arg(short = 'H', long)]
    host: Option<String>,
    #[arg(short, long)]
    port: Option<u16>,
    #[arg(long)]
    upstream_url: Option<String>,
    #[arg(long)]
    timeout_secs: Option<u64>,
    /// Seed for synthetic fallback data
    #[arg(long)]
    seed: Option<u64>,
}

impl Cli {
    fn apply(self, config: &mut Config) {
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(url) = self.upstream_url {
            config.upstream_url = url.trim_end_matches('/').to_string();
        }
        if let Some(secs) = self.timeout_secs {
            config.upstream_timeout = Duration::from_secs(secs);
        }
        if self.seed.is_some() {
            config.fallback_seed = self.seed;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    cli.apply(&mut config);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.log_filter)?)
        .with_target(true)
        .init();

    let source: Arc<dyn TrendSource> = match GoogleTrendsClient::new(&config) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            tracing::error!("could not build upstream client, serving synthetic data only: {e}");
            Arc::new(UnavailableSource::new(e.to_string()))
        }
    };

    let addr = config.bind_addr();
    let app = create_router(Arc::new(AppState::new(config, source)));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
